mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::*;
use serde_json::json;
use sheet_store::parts::{create_part, NewPart};
use sheet_types::{PartSize, Role};

const SQUARE: &str = "0\nSECTION\n2\nENTITIES\n\
0\nLWPOLYLINE\n8\n0\n90\n4\n70\n1\n10\n0\n20\n0\n10\n100\n20\n0\n10\n100\n20\n50\n10\n0\n20\n50\n\
0\nENDSEC\n0\nEOF\n";

fn set_cookie(response: &axum::http::Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|c| c.split(';').next())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn signup_login_and_me() {
    let state = test_state(None);
    let router = app(&state);

    let signup = json!({ "email": "Ada@Example.com", "password": "difference-engine", "display_name": "Ada" });
    let response = send(&router, json_request("POST", "/api/v1/auth/signup", signup.clone(), None)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(set_cookie(&response).starts_with("session_token="));
    assert_eq!(body_json(response).await["role"], "user");

    let response = send(&router, json_request("POST", "/api/v1/auth/signup", signup, None)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let wrong = json!({ "email": "ada@example.com", "password": "analytical" });
    let response = send(&router, json_request("POST", "/api/v1/auth/login", wrong, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let right = json!({ "email": "ada@example.com", "password": "difference-engine" });
    let response = send(&router, json_request("POST", "/api/v1/auth/login", right, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);

    let response = send(&router, get("/api/v1/auth/me", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "ada@example.com");
}

#[tokio::test]
async fn short_passwords_are_refused() {
    let state = test_state(None);
    let body = json!({ "email": "ada@example.com", "password": "short", "display_name": "Ada" });
    let response = send(&app(&state), json_request("POST", "/api/v1/auth/signup", body, None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn configured_admin_email_gets_admin_role() {
    let state = test_state(None);
    let body = json!({ "email": "boss@sheetmates.test", "password": "production-floor", "display_name": "Boss" });
    let response = send(&app(&state), json_request("POST", "/api/v1/auth/signup", body, None)).await;
    assert_eq!(body_json(response).await["role"], "admin");
}

#[tokio::test]
async fn api_routes_need_a_session_and_admin_routes_the_role() {
    let state = test_state(None);
    let router = app(&state);

    let response = send(&router, get("/api/v1/orders", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "unauthorized" }));

    let response = send(&router, get("/api/v1/admin/queue", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let customer = session_for(&state, "u1", Role::User).await;
    let response = send(&router, get("/api/v1/admin/queue", Some(&customer))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = session_for(&state, "boss", Role::Admin).await;
    let response = send(&router, get("/api/v1/admin/queue", Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn analyze_returns_geometry() {
    let state = test_state(None);
    let cookie = session_for(&state, "u1", Role::User).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/parts/analyze?thickness=3")
        .header(header::COOKIE, cookie)
        .body(Body::from(SQUARE))
        .unwrap();

    let response = send(&app(&state), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let analysis = body_json(response).await;
    assert_eq!(analysis["width"], 100.0);
    assert_eq!(analysis["height"], 50.0);
    assert_eq!(analysis["area"], 5000.0);
    assert_eq!(analysis["summary"]["passed"], true);
}

#[tokio::test]
async fn analyze_reports_empty_drawings() {
    let state = test_state(None);
    let cookie = session_for(&state, "u1", Role::User).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/parts/analyze")
        .header(header::COOKIE, cookie)
        .body(Body::from("0\nSECTION\n2\nENTITIES\n0\nENDSEC\n0\nEOF\n"))
        .unwrap();

    let response = send(&app(&state), request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"], "No entities found in DXF file");
}

#[tokio::test]
async fn multipart_upload_creates_pending_part() {
    let state = test_state(None);
    let cookie = session_for(&state, "u1", Role::User).await;
    let boundary = "sheetmatesboundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"quantity\"\r\n\r\n4\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"plate.dxf\"\r\n\
         Content-Type: application/dxf\r\n\r\n{SQUARE}\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/parts")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();

    let response = send(&app(&state), request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let upload = body_json(response).await;
    assert_eq!(upload["part"]["quantity"], 4);
    assert_eq!(upload["part"]["status"], "pending");
    let fileUrl = upload["part"]["file_url"].as_str().unwrap().to_string();
    assert!(fileUrl.starts_with("/files/dxf/u1/"));

    let response = send(&app(&state), get("/api/v1/parts", Some(&cookie))).await;
    assert_eq!(body_json(response).await.as_array().map(Vec::len), Some(1));

    let response = send(&app(&state), get(&fileUrl, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, SQUARE);

    let stranger = session_for(&state, "u2", Role::User).await;
    let response = send(&app(&state), get(&fileUrl, Some(&stranger))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app(&state), get(&fileUrl, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app(&state), get("/files/dxf/u1/missing.dxf", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_are_priced_on_the_server() {
    let state = test_state(None);
    let cookie = session_for(&state, "u1", Role::User).await;
    let part = create_part(
        &state.store.docs,
        NewPart {
            user_id: "u1".into(),
            file_name: "plate.dxf".into(),
            file_url: "/files/dxf/u1/plate.dxf".into(),
            bounding_box: PartSize { width: 100.0, height: 100.0 },
            svg_path: String::new(),
            area: 10_000.0,
            cut_length: 400.0,
            quantity: 1,
        },
    )
    .await
    .unwrap();

    // 100 cm2 * 0.05 + 400 mm * 0.01 = 9.00 per unit, 2 units, 21% VAT
    let body = json!({ "items": [{ "part_id": part.id, "quantity": 2 }], "material": "steel", "thickness": "1" });
    let response = send(&app(&state), json_request("POST", "/api/v1/orders", body, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["subtotal"], 18.0);
    assert_eq!(order["vat"], 3.78);
    assert_eq!(order["total"], 21.78);
    assert_eq!(order["vat_rate"], 0.21);

    let other = session_for(&state, "u2", Role::User).await;
    let uri = format!("/api/v1/orders/{}", order["id"].as_str().unwrap());
    let response = send(&app(&state), get(&uri, Some(&other))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_without_payment_provider_is_a_gateway_error() {
    let state = test_state(None);
    let cookie = session_for(&state, "u1", Role::User).await;
    let order = sheet_store::orders::create_order(
        &state.store.docs,
        sheet_store::orders::NewOrder {
            user_id: "u1".into(),
            items: vec![],
            subtotal: 0.0,
            vat: 0.0,
            total: 0.0,
            vat_rate: 0.21,
        },
    )
    .await
    .unwrap();

    let body = json!({ "order_id": order.id });
    let response = send(&app(&state), json_request("POST", "/api/v1/checkout", body, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn sheet_locks_are_exclusive() {
    let state = test_state(None);
    let admin = session_for(&state, "boss", Role::Admin).await;
    let alice = session_for(&state, "alice", Role::User).await;
    let bob = session_for(&state, "bob", Role::User).await;
    let router = app(&state);

    let inject = json!({
        "width": 3000.0, "height": 1500.0, "material": "steel", "thickness": 2.0,
        "quantity": 1, "initial_price": 120.0, "floor_price": 40.0, "qr_code_prefix": null
    });
    let response = send(&router, json_request("POST", "/api/v1/admin/sheets/inject", inject, Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sheetId = body_json(response).await[0]["id"].as_str().unwrap().to_string();

    let response = send(&router, get("/api/v1/sheets", None)).await;
    let listings = body_json(response).await;
    assert_eq!(listings[0]["auction"]["current_price"], 120.0);
    // an empty sheet sent to the cutter now costs its full base price plus 20%
    assert_eq!(listings[0]["premium"], 144.0);

    let lockUri = format!("/api/v1/sheets/{sheetId}/lock");
    let response = send(&router, json_request("POST", &lockUri, json!({}), Some(&alice))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, json_request("POST", &lockUri, json!({}), Some(&bob))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "ALREADY_LOCKED");

    let response = send(&router, json_request("DELETE", &lockUri, json!({}), Some(&alice))).await;
    assert_eq!(body_json(response).await["released"], true);

    let response = send(&router, json_request("POST", &lockUri, json!({}), Some(&bob))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn contact_form_is_validated() {
    let state = test_state(None);
    let router = app(&state);

    let bad = json!({ "reason": "quote", "name": "Ada", "email": "nope", "message": "hi" });
    let response = send(&router, json_request("POST", "/api/v1/contact", bad, None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let good = json!({ "reason": "quote", "name": "Ada", "email": "ada@example.com", "message": "40 brackets" });
    let response = send(&router, json_request("POST", "/api/v1/contact", good, None)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
