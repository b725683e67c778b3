#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use chrono::Utc;
use sheet_api::session::SessionKeys;
use sheet_api::{api_router, with_site_layers, AppState, PaymentSettings};
use sheet_store::users::{create_user_doc, update_user_doc, UserUpdate};
use sheet_store::{DocumentStore, ObjectStorage, Store};
use sheet_types::Role;
use tower::ServiceExt;

pub const WEBHOOK_SECRET: &str = "whsec_test";

pub fn test_state(webhookSecret: Option<&str>) -> AppState {
    let root = std::env::temp_dir().join(format!("sheetmates-test-{}", uuid::Uuid::new_v4()));
    AppState {
        store: Store::new(DocumentStore::in_memory(), ObjectStorage::new(root, "/files")),
        sessions: SessionKeys::new("test-session-secret", 24),
        admin_emails: Arc::new(vec!["boss@sheetmates.test".to_string()]),
        payments: Arc::new(PaymentSettings {
            webhook_secret: webhookSecret.map(str::to_string),
            ..PaymentSettings::default()
        }),
        site_url: "https://sheetmates.test".into(),
    }
}

/// The API plus a stand-in page handler, behind the same layers as the real site.
pub fn app(state: &AppState) -> Router {
    let router = api_router(state.clone()).fallback(|| async { "page" });
    with_site_layers(router, state.clone())
}

/// Creates a profile directly and returns a `Cookie` header value for it.
pub async fn session_for(state: &AppState, uid: &str, role: Role) -> String {
    let email = format!("{uid}@example.com");
    create_user_doc(&state.store.docs, uid, &email, uid).await.unwrap();
    if role == Role::Admin {
        update_user_doc(
            &state.store.docs,
            uid,
            UserUpdate {
                role: Some(role),
                ..UserUpdate::default()
            },
        )
        .await
        .unwrap();
    }
    format!("session_token={}", state.sessions.issue(uid, Utc::now()))
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}
