use axum::{extract::State, middleware, routing::post, Extension, Json, Router};
use sheet_store::orders::update_order;
use sheet_types::{CheckoutRequest, CheckoutResponse, CurrentUser, OrderStatus, OrderUpdate};

use super::orders::visible_order;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::require_api_auth;
use crate::payments::PaymentError;
use crate::state::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/checkout", post(post_checkout))
        .route_layer(middleware::from_fn(require_api_auth))
}

/// Opens a payment session for one of the caller's pending orders and returns its URL.
pub async fn start_checkout(
    state: &AppState,
    user: &CurrentUser,
    request: &CheckoutRequest,
) -> ApiResult<CheckoutResponse> {
    let order = visible_order(state, user, &request.order_id).await?;
    if order.user_id != user.uid {
        return Err(ApiError::Forbidden);
    }
    if order.status != OrderStatus::Pending {
        return Err(ApiError::Conflict(format!(
            "order is already {}",
            order.status.as_str()
        )));
    }

    let payments = &state.payments;
    let stripe = payments.stripe.as_ref().ok_or(PaymentError::NotConfigured)?;
    let session = stripe
        .create_checkout_session(
            &order,
            &payments.currency,
            &payments.app_url,
            request.locale,
        )
        .await?;

    update_order(
        &state.store.docs,
        &order.id,
        &OrderUpdate {
            stripe_session_id: Some(session.id),
            ..OrderUpdate::default()
        },
    )
    .await?;
    Ok(CheckoutResponse { url: session.url })
}

async fn post_checkout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    Ok(Json(start_checkout(&state, &user, &body).await?))
}
