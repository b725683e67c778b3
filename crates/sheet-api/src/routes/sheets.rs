use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use sheet_engine::auction::{bus_driver_premium, calculate_auction_price, AuctionConfig};
use sheet_engine::export::nesting_dxf;
use sheet_store::locks::{acquire_sheet_lock, extend_sheet_lock, release_sheet_lock};
use sheet_store::sheets::{available_inventory, get_open_sheets, get_sheet};
use sheet_types::{
    AuctionPrice, AvailableInventory, CurrentUser, LockError, LockResult, Sheet, SheetListing,
};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::require_api_auth;
use crate::state::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/v1/sheets", get(list_sheets))
        .route("/api/v1/sheets/inventory", get(get_inventory))
        .route("/api/v1/sheets/:id", get(get_one));

    let guarded = Router::new()
        .route(
            "/api/v1/sheets/:id/lock",
            post(acquire_lock).put(extend_lock).delete(release_lock),
        )
        .route("/api/v1/sheets/:id/export.dxf", get(export_dxf))
        .route_layer(middleware::from_fn(require_api_auth));

    public.merge(guarded)
}

/// Live auction price of a sheet, if it runs a valid auction.
pub fn auction_for(sheet: &Sheet, now: DateTime<Utc>) -> Option<AuctionPrice> {
    let config = AuctionConfig::from_sheet(sheet)?;
    match calculate_auction_price(&config, now) {
        Ok(price) => Some(price),
        Err(e) => {
            tracing::warn!("sheet {} has an invalid auction: {e}", sheet.id);
            None
        }
    }
}

pub fn listing(sheet: Sheet, now: DateTime<Utc>) -> SheetListing {
    SheetListing {
        auction: auction_for(&sheet, now),
        premium: sheet
            .initial_price
            .map(|base| bus_driver_premium(sheet.utilization, base)),
        sheet,
    }
}

pub async fn sheet_listings(state: &AppState, now: DateTime<Utc>) -> ApiResult<Vec<SheetListing>> {
    Ok(get_open_sheets(&state.store.docs)
        .await?
        .into_iter()
        .map(|sheet| listing(sheet, now))
        .collect())
}

async fn list_sheets(State(state): State<AppState>) -> ApiResult<Json<Vec<SheetListing>>> {
    Ok(Json(sheet_listings(&state, Utc::now()).await?))
}

async fn get_inventory(State(state): State<AppState>) -> ApiResult<Json<AvailableInventory>> {
    Ok(Json(available_inventory(&state.store.docs).await?))
}

async fn load_sheet(state: &AppState, id: &str) -> ApiResult<Sheet> {
    get_sheet(&state.store.docs, id)
        .await?
        .ok_or(ApiError::NotFound("sheet"))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SheetListing>> {
    let sheet = load_sheet(&state, &id).await?;
    Ok(Json(listing(sheet, Utc::now())))
}

fn lock_response(result: LockResult) -> Response {
    let status = match result.error {
        None => StatusCode::OK,
        Some(LockError::SheetNotFound) => StatusCode::NOT_FOUND,
        Some(LockError::AlreadyLocked) | Some(LockError::SheetFull) => StatusCode::CONFLICT,
    };
    (status, Json(result)).into_response()
}

async fn acquire_lock(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let result = acquire_sheet_lock(&state.store.docs, &id, &user.uid, Utc::now()).await?;
    if result.success {
        tracing::info!("{} locked sheet {id}", user.uid);
    }
    Ok(lock_response(result))
}

async fn extend_lock(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let result = extend_sheet_lock(&state.store.docs, &id, &user.uid, Utc::now()).await?;
    Ok(lock_response(result))
}

async fn release_lock(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let released = release_sheet_lock(&state.store.docs, &id, &user.uid).await?;
    Ok(Json(json!({ "released": released })))
}

async fn export_dxf(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let sheet = load_sheet(&state, &id).await?;
    let dxf = nesting_dxf(&sheet.placements, sheet.width, sheet.height);
    let disposition = format!("attachment; filename=\"sheet-{}.dxf\"", sheet.id);
    Ok((
        [
            (header::CONTENT_TYPE, "application/dxf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        dxf,
    )
        .into_response())
}
