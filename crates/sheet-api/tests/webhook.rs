#![allow(non_snake_case)]

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use common::*;
use serde_json::json;
use sheet_api::payments::signature_header;
use sheet_store::orders::{create_order, get_order, NewOrder};
use sheet_types::{Order, OrderItem, OrderStatus};

async fn pending_order(state: &sheet_api::AppState) -> Order {
    create_order(
        &state.store.docs,
        NewOrder {
            user_id: "u1".into(),
            items: vec![OrderItem {
                part_id: "p1".into(),
                file_name: "bracket.dxf".into(),
                quantity: 2,
                price_per_unit: 10.0,
                total: 20.0,
            }],
            subtotal: 20.0,
            vat: 4.2,
            total: 24.2,
            vat_rate: 0.21,
        },
    )
    .await
    .unwrap()
}

fn completed_event(orderId: &str) -> String {
    json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": { "object": { "id": "cs_test_1", "metadata": { "orderId": orderId } } }
    })
    .to_string()
}

fn webhook(body: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/stripe")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("stripe-signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn unsigned_request_is_rejected() {
    let state = test_state(Some(WEBHOOK_SECRET));
    let order = pending_order(&state).await;

    let response = send(&app(&state), webhook(&completed_event(&order.id), None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Missing signature" }));

    let stored = get_order(&state.store.docs, &order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn unconfigured_secret_is_treated_as_missing() {
    let state = test_state(None);
    let body = completed_event("o1");
    let signature = signature_header(body.as_bytes(), WEBHOOK_SECRET, Utc::now().timestamp());

    let response = send(&app(&state), webhook(&body, Some(signature))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Missing signature" }));
}

#[tokio::test]
async fn bad_signature_is_rejected() {
    let state = test_state(Some(WEBHOOK_SECRET));
    let order = pending_order(&state).await;
    let body = completed_event(&order.id);
    let forged = signature_header(body.as_bytes(), "whsec_wrong", Utc::now().timestamp());

    let response = send(&app(&state), webhook(&body, Some(forged))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid signature" }));

    let stored = get_order(&state.store.docs, &order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn signed_completion_marks_order_paid() {
    let state = test_state(Some(WEBHOOK_SECRET));
    let order = pending_order(&state).await;
    let body = completed_event(&order.id);
    let router = app(&state);

    for _ in 0..2 {
        let signature = signature_header(body.as_bytes(), WEBHOOK_SECRET, Utc::now().timestamp());
        let response = send(&router, webhook(&body, Some(signature))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "received": true }));
    }

    let stored = get_order(&state.store.docs, &order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);
    assert_eq!(stored.stripe_session_id.as_deref(), Some("cs_test_1"));
}

#[tokio::test]
async fn other_events_are_acknowledged_without_changes() {
    let state = test_state(Some(WEBHOOK_SECRET));
    let order = pending_order(&state).await;
    let body = json!({
        "type": "payment_intent.created",
        "data": { "object": { "id": "pi_1", "metadata": { "orderId": order.id } } }
    })
    .to_string();
    let signature = signature_header(body.as_bytes(), WEBHOOK_SECRET, Utc::now().timestamp());

    let response = send(&app(&state), webhook(&body, Some(signature))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = get_order(&state.store.docs, &order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn completion_for_unknown_order_is_acknowledged() {
    let state = test_state(Some(WEBHOOK_SECRET));
    let order = pending_order(&state).await;
    let body = completed_event("no-such-order");
    let signature = signature_header(body.as_bytes(), WEBHOOK_SECRET, Utc::now().timestamp());

    let response = send(&app(&state), webhook(&body, Some(signature))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "received": true }));

    assert!(get_order(&state.store.docs, "no-such-order").await.unwrap().is_none());
    let stored = get_order(&state.store.docs, &order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn stale_signature_is_rejected() {
    let state = test_state(Some(WEBHOOK_SECRET));
    let order = pending_order(&state).await;
    let body = completed_event(&order.id);
    // correctly signed, but outside the five minute tolerance
    let stale = signature_header(body.as_bytes(), WEBHOOK_SECRET, Utc::now().timestamp() - 301);

    let response = send(&app(&state), webhook(&body, Some(stale))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid signature" }));

    let stored = get_order(&state.store.docs, &order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}
