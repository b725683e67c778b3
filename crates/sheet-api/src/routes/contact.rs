use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::json;
use sheet_store::contact::save_contact_message;
use sheet_types::{contact_reason_label, ContactRequest};

use super::auth::looks_like_email;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const MAX_MESSAGE_CHARS: usize = 5000;

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new().route("/api/v1/contact", post(post_contact))
}

pub fn validate_contact(request: &ContactRequest) -> Result<(), String> {
    if request.reason.trim().is_empty() {
        return Err("reason is required".into());
    }
    if request.name.trim().is_empty() {
        return Err("name is required".into());
    }
    if !looks_like_email(request.email.trim()) {
        return Err("a valid email is required".into());
    }
    let message = request.message.trim();
    if message.is_empty() {
        return Err("message is required".into());
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(format!("message is longer than {MAX_MESSAGE_CHARS} characters"));
    }
    Ok(())
}

async fn post_contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    validate_contact(&body).map_err(ApiError::BadRequest)?;
    let saved = save_contact_message(&state.store.docs, body).await?;
    tracing::info!(
        "contact message {} ({}) from {}",
        saved.id,
        contact_reason_label(&saved.reason),
        saved.email
    );
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": saved.id }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            reason: "quote".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            order_reference: None,
            message: "Forty brackets in 3mm steel please".into(),
        }
    }

    #[test]
    fn accepts_complete_request() {
        assert!(validate_contact(&request()).is_ok());
    }

    #[test]
    fn rejects_missing_fields() {
        let blankName = ContactRequest {
            name: "  ".into(),
            ..request()
        };
        assert!(validate_contact(&blankName).is_err());

        let badEmail = ContactRequest {
            email: "not-an-email".into(),
            ..request()
        };
        assert!(validate_contact(&badEmail).is_err());
    }
}
