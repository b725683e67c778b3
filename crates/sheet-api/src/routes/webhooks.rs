use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sheet_store::orders::{mark_order_paid, PaymentOutcome};

use crate::error::json_error;
use crate::payments::verify_signature;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "stripe-signature";
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new().route("/api/webhooks/stripe", post(handle_stripe_event))
}

#[derive(Deserialize)]
struct StripeEvent {
    #[serde(rename = "type")]
    kind: String,
    data: EventData,
}

#[derive(Deserialize)]
struct EventData {
    object: EventObject,
}

#[derive(Deserialize)]
struct EventObject {
    id: Option<String>,
    #[serde(default)]
    metadata: EventMetadata,
}

#[derive(Deserialize, Default)]
struct EventMetadata {
    #[serde(rename = "orderId")]
    order_id: Option<String>,
}

async fn handle_stripe_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let (Some(signature), Some(secret)) = (signature, state.payments.webhook_secret.as_deref())
    else {
        return json_error(StatusCode::BAD_REQUEST, "Missing signature");
    };

    if let Err(e) = verify_signature(signature, &body, secret, Utc::now()) {
        tracing::warn!("rejected webhook: {e}");
        return json_error(StatusCode::BAD_REQUEST, "Invalid signature");
    }

    let event: StripeEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("unreadable webhook payload: {e}");
            return json_error(StatusCode::BAD_REQUEST, "Invalid payload");
        }
    };

    if event.kind == CHECKOUT_COMPLETED {
        let object = event.data.object;
        if let Some(orderId) = object.metadata.order_id {
            let sessionId = object.id.unwrap_or_default();
            match mark_order_paid(&state.store.docs, &orderId, &sessionId).await {
                Ok(PaymentOutcome::MarkedPaid(_)) => {
                    tracing::info!("order {orderId} paid (session {sessionId})");
                }
                Ok(PaymentOutcome::Unchanged(status)) => {
                    tracing::info!("order {orderId} already {}, ignoring repeat", status.as_str());
                }
                Err(e) if e.is_not_found() => {
                    tracing::warn!("payment for unknown order {orderId}");
                }
                Err(e) => {
                    tracing::error!("failed to mark order {orderId} paid: {e}");
                    return json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
                }
            }
        }
    } else {
        tracing::debug!("ignoring webhook event {}", event.kind);
    }

    Json(json!({ "received": true })).into_response()
}
