use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use sheet_store::users::get_user_doc;
use sheet_types::{CurrentUser, Locale, SESSION_COOKIE};

use crate::error::json_error;
use crate::state::AppState;

/// Page sections that need a signed-in user.
pub const PROTECTED_SECTIONS: [&str; 8] = [
    "upload",
    "checkout",
    "queue",
    "sheets",
    "account",
    "export",
    "playground",
    "admin",
];

pub const ADMIN_SECTIONS: [&str; 1] = ["admin"];

fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());
    if bearer.is_some() {
        return bearer;
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// The user behind the request's session cookie or bearer token, if any.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = session_token(headers)?;
    let uid = state.sessions.verify(&token, Utc::now())?;
    match get_user_doc(&state.store.docs, &uid).await {
        Ok(Some(profile)) => Some(CurrentUser::from(&profile)),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("failed to load session user {uid}: {e}");
            None
        }
    }
}

/// Runs on every request: attaches `CurrentUser` to the extensions when the session is valid.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(user) = current_user(&state, request.headers()).await {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

/// Middleware for API routes: 401 without a session.
pub async fn require_api_auth(request: Request<Body>, next: Next) -> Response {
    if request.extensions().get::<CurrentUser>().is_none() {
        return json_error(StatusCode::UNAUTHORIZED, "unauthorized");
    }
    next.run(request).await
}

/// Middleware for admin API routes: 401 without a session, 403 without the admin role.
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<CurrentUser>() {
        None => json_error(StatusCode::UNAUTHORIZED, "unauthorized"),
        Some(user) if !user.is_admin() => json_error(StatusCode::FORBIDDEN, "forbidden"),
        Some(_) => next.run(request).await,
    }
}

/// Where a page request must be sent instead, if anywhere.
pub fn page_redirect(path: &str, user: Option<&CurrentUser>) -> Option<String> {
    let (locale, rest) = Locale::split_path(path)?;
    let section = rest.trim_start_matches('/').split('/').next().unwrap_or("");

    if !PROTECTED_SECTIONS.contains(&section) {
        return None;
    }
    let Some(user) = user else {
        return Some(locale.href("/login"));
    };
    if ADMIN_SECTIONS.contains(&section) && !user.is_admin() {
        return Some(locale.href("/"));
    }
    None
}

/// Middleware for page routes: anonymous visitors go to the locale's login page,
/// non-admins asking for admin pages go to the locale's home page.
pub async fn require_page_auth(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if path.starts_with("/api/") || path.starts_with("/pkg/") || path.starts_with("/files/") {
        return next.run(request).await;
    }

    let user = request.extensions().get::<CurrentUser>();
    if let Some(target) = page_redirect(&path, user) {
        tracing::debug!("page guard: {path} -> {target}");
        return Redirect::to(&target).into_response();
    }

    next.run(request).await
}
