use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sheet_engine::DxfError;
use sheet_store::StoreError;
use thiserror::Error;

use crate::payments::PaymentError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Dxf(#[from] DxfError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Dxf(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Payment(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(e) => match e {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::AlreadyExists { .. } | StoreError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
                StoreError::Invalid(_) | StoreError::InvalidKey(_) => StatusCode::BAD_REQUEST,
                StoreError::Serialization(_) | StoreError::Io(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("request failed: {self}");
            match self {
                ApiError::Payment(_) => "payment provider error".to_string(),
                _ => "internal error".to_string(),
            }
        } else {
            self.to_string()
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// `{"error": message}` with the given status, for handlers that answer outside `ApiError`.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(StoreError::not_found("orders", "x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::InvalidTransition {
                from: "paid".into(),
                to: "pending".into()
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::Invalid("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(DxfError::NoEntities).status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
