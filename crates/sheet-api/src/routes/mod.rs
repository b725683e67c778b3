pub mod admin;
pub mod auth;
pub mod checkout;
pub mod contact;
pub mod orders;
pub mod parts;
pub mod pricing;
pub mod seo;
pub mod sheets;
pub mod users;
pub mod webhooks;

use axum::{
    http::{header, HeaderValue},
    response::Response,
    Router,
};

use crate::state::AppState;

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth::routes(state.clone()))
        .merge(users::routes(state.clone()))
        .merge(parts::routes(state.clone()))
        .merge(pricing::routes(state.clone()))
        .merge(orders::routes(state.clone()))
        .merge(checkout::routes(state.clone()))
        .merge(sheets::routes(state.clone()))
        .merge(admin::routes(state.clone()))
        .merge(contact::routes(state.clone()))
        .merge(webhooks::routes(state))
}

pub(crate) fn set_cookie(mut response: Response, cookie: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
