//! Request context for server functions: shared state and the signed-in user.

use axum::Extension;
use leptos::prelude::*;
use sheet_api::{ApiError, AppState};
use sheet_types::CurrentUser;

pub fn app_state() -> Result<AppState, ServerFnError> {
    use_context::<AppState>().ok_or_else(|| ServerFnError::new("app state unavailable"))
}

/// The user the session layer attached to this request, if any.
pub async fn current_user() -> Result<Option<CurrentUser>, ServerFnError> {
    let user: Option<Extension<CurrentUser>> = leptos_axum::extract().await?;
    Ok(user.map(|Extension(user)| user))
}

pub async fn require_user() -> Result<CurrentUser, ServerFnError> {
    current_user()
        .await?
        .ok_or_else(|| ServerFnError::new("please sign in first"))
}

pub async fn require_admin() -> Result<CurrentUser, ServerFnError> {
    let user = require_user().await?;
    if !user.is_admin() {
        return Err(ServerFnError::new("admin access required"));
    }
    Ok(user)
}

/// Client-safe message for an API error; server faults are logged and hidden.
pub fn api_error(error: impl Into<ApiError>) -> ServerFnError {
    let error = error.into();
    if error.status().is_server_error() {
        tracing::error!("server function failed: {error}");
        return ServerFnError::new("something went wrong, please try again");
    }
    ServerFnError::new(error.to_string())
}
