use axum::{
    extract::State,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use sheet_engine::pricing::calculate_part_price;
use sheet_store::pricing_config::{get_pricing_config, save_pricing_config};
use sheet_types::{PartPriceInput, PriceBreakdown, PricingConfig};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::require_admin;
use crate::state::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/v1/pricing/config", get(get_config))
        .route("/api/v1/pricing/quote", post(post_quote));

    let admin = Router::new()
        .route("/api/v1/admin/pricing", put(put_config))
        .route_layer(middleware::from_fn(require_admin));

    public.merge(admin)
}

async fn get_config(State(state): State<AppState>) -> ApiResult<Json<PricingConfig>> {
    Ok(Json(get_pricing_config(&state.store.docs).await?))
}

async fn post_quote(
    State(state): State<AppState>,
    Json(input): Json<PartPriceInput>,
) -> ApiResult<Json<PriceBreakdown>> {
    if input.quantity == 0 || input.area_mm2 < 0.0 || input.cut_length_mm < 0.0 {
        return Err(ApiError::BadRequest(
            "quantity must be positive and dimensions non-negative".into(),
        ));
    }
    let config = get_pricing_config(&state.store.docs).await?;
    Ok(Json(calculate_part_price(&input, &config)))
}

async fn put_config(
    State(state): State<AppState>,
    Json(config): Json<PricingConfig>,
) -> ApiResult<Json<PricingConfig>> {
    save_pricing_config(&state.store.docs, &config).await?;
    Ok(Json(config))
}
