#![allow(non_snake_case)]

pub mod error;
pub mod middleware;
pub mod payments;
pub mod routes;
pub mod session;
pub mod state;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};

pub use error::{ApiError, ApiResult};
pub use state::{AppState, PaymentSettings};

/// REST API, webhook and crawler routes. Session resolution comes from [`with_site_layers`]
/// so that pages see the same `CurrentUser`.
pub fn api_router(state: AppState) -> Router {
    let apiRoutes = routes::api_routes(state.clone());
    let seoRoutes = routes::seo::routes();

    Router::new()
        .merge(apiRoutes)
        .merge(seoRoutes)
        .with_state(state)
}

/// Wraps the whole site: locale redirects outermost, then session resolution,
/// then the page guard.
pub fn with_site_layers(router: Router, state: AppState) -> Router {
    router
        .layer(from_fn(middleware::auth::require_page_auth))
        .layer(from_fn_with_state(state, middleware::auth::resolve_session))
        .layer(from_fn(middleware::locale::locale_redirect))
}
