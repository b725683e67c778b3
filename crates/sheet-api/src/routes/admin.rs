use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use chrono::Utc;
use sheet_store::autonest::auto_nest_parts;
use sheet_store::inject::inject_sheets;
use sheet_store::orders::{advance_order_status, get_all_orders};
use sheet_store::production::{get_production_queue, update_sheet_status};
use sheet_types::{
    AutoNestResult, CurrentUser, InjectSheetRequest, InjectedSheet, NestRequest, Order, Sheet,
    UpdateOrderStatusRequest, UpdateSheetStatusRequest,
};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::require_admin;
use crate::state::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/admin/orders", get(list_orders))
        .route("/api/v1/admin/orders/:id", patch(patch_order_status))
        .route("/api/v1/admin/queue", get(get_queue))
        .route("/api/v1/admin/sheets/:id/status", patch(patch_sheet_status))
        .route("/api/v1/admin/sheets/inject", post(post_inject))
        .route("/api/v1/admin/nest", post(post_nest))
        .route_layer(middleware::from_fn(require_admin))
}

async fn list_orders(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(get_all_orders(&state.store.docs).await?))
}

async fn patch_order_status(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateOrderStatusRequest>,
) -> ApiResult<Json<Order>> {
    let order = advance_order_status(&state.store.docs, &id, body.status).await?;
    tracing::info!("{} moved order {id} to {}", admin.email, body.status.as_str());
    Ok(Json(order))
}

async fn get_queue(State(state): State<AppState>) -> ApiResult<Json<Vec<Sheet>>> {
    Ok(Json(get_production_queue(&state.store.docs).await?))
}

async fn patch_sheet_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSheetStatusRequest>,
) -> ApiResult<Json<Sheet>> {
    Ok(Json(update_sheet_status(&state.store.docs, &id, body.status).await?))
}

async fn post_inject(
    State(state): State<AppState>,
    Json(body): Json<InjectSheetRequest>,
) -> ApiResult<(StatusCode, Json<Vec<InjectedSheet>>)> {
    let injected = inject_sheets(&state.store.docs, &body, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(injected)))
}

async fn post_nest(
    State(state): State<AppState>,
    Json(body): Json<NestRequest>,
) -> ApiResult<Json<AutoNestResult>> {
    if body.part_ids.is_empty() {
        return Err(ApiError::BadRequest("no parts to nest".into()));
    }
    if body.material.trim().is_empty() || !(body.thickness > 0.0) {
        return Err(ApiError::BadRequest("material and a positive thickness are required".into()));
    }
    let result = auto_nest_parts(&state.store.docs, &body.part_ids, &body.material, body.thickness).await?;
    Ok(Json(result))
}
