mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::*;
use sheet_types::Role;

#[tokio::test]
async fn anonymous_visitor_is_sent_to_login() {
    let state = test_state(None);
    let router = app(&state);

    let response = send(&router, get("/fr/upload", None)).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/fr/login"));

    let response = send(&router, get("/cs/admin/queue", None)).await;
    assert_eq!(location(&response), Some("/cs/login"));
}

#[tokio::test]
async fn customer_is_sent_home_from_admin_pages() {
    let state = test_state(None);
    let cookie = session_for(&state, "u1", Role::User).await;
    let router = app(&state);

    let response = send(&router, get("/en/admin", Some(&cookie))).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/en"));

    let response = send(&router, get("/en/upload", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "page");
}

#[tokio::test]
async fn admin_reaches_admin_pages() {
    let state = test_state(None);
    let cookie = session_for(&state, "boss", Role::Admin).await;

    let response = send(&app(&state), get("/fr/admin/orders", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn forged_session_counts_as_anonymous() {
    let state = test_state(None);
    let response = send(
        &app(&state),
        get("/en/account/orders", Some("session_token=abc.def")),
    )
    .await;
    assert_eq!(location(&response), Some("/en/login"));
}

#[tokio::test]
async fn public_pages_are_open() {
    let state = test_state(None);
    let response = send(&app(&state), get("/cs/pricing", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("locale=cs"));
}

#[tokio::test]
async fn unprefixed_paths_redirect_to_detected_locale() {
    let state = test_state(None);
    let router = app(&state);

    let request = Request::builder()
        .uri("/")
        .header(header::ACCEPT_LANGUAGE, "de-DE,fr;q=0.8,en;q=0.5")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/fr"));

    let response = send(&router, get("/pricing?material=steel", Some("locale=cs"))).await;
    assert_eq!(location(&response), Some("/cs/pricing?material=steel"));

    let response = send(&router, get("/upload", None)).await;
    assert_eq!(location(&response), Some("/en/upload"));
}

#[tokio::test]
async fn crawler_files_skip_locale_handling() {
    let state = test_state(None);
    let router = app(&state);

    let response = send(&router, get("/robots.txt", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let robots = body_text(response).await;
    assert!(robots.contains("User-agent: CCBot"));
    assert!(robots.contains("Sitemap: https://sheetmates.test/sitemap.xml"));

    let response = send(&router, get("/sitemap.xml", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<loc>https://sheetmates.test/fr/sheets</loc>"));
}
