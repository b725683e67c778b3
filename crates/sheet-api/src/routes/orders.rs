use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use sheet_engine::pricing::calculate_part_price;
use sheet_store::orders::{create_order, get_order, get_orders_by_user, NewOrder};
use sheet_store::pricing_config::get_pricing_config;
use sheet_types::{CreateOrderRequest, CurrentUser, Order, OrderItem, PartPriceInput};

use super::parts::visible_part;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::require_api_auth;
use crate::state::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/orders", get(list_orders).post(post_order))
        .route("/api/v1/orders/:id", get(get_one))
        .route_layer(middleware::from_fn(require_api_auth))
}

fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prices every line server-side from the stored part geometry and creates a pending order.
pub async fn place_order(
    state: &AppState,
    user: &CurrentUser,
    request: CreateOrderRequest,
) -> ApiResult<Order> {
    if request.items.is_empty() {
        return Err(ApiError::BadRequest("an order needs at least one part".into()));
    }
    let config = get_pricing_config(&state.store.docs).await?;

    let mut items = Vec::with_capacity(request.items.len());
    let mut subtotal = 0.0;
    let mut vat = 0.0;
    for line in &request.items {
        if line.quantity == 0 {
            return Err(ApiError::BadRequest("quantities must be positive".into()));
        }
        let part = visible_part(state, user, &line.part_id).await?;
        if part.user_id != user.uid {
            return Err(ApiError::Forbidden);
        }
        let price = calculate_part_price(
            &PartPriceInput {
                area_mm2: part.area,
                cut_length_mm: part.cut_length,
                material: request.material.clone(),
                thickness: request.thickness.clone(),
                quantity: line.quantity,
            },
            &config,
        );
        subtotal += price.total_before_vat;
        vat += price.vat;
        items.push(OrderItem {
            part_id: part.id,
            file_name: part.file_name,
            quantity: line.quantity,
            price_per_unit: cents(price.price_per_unit),
            total: cents(price.total_before_vat),
        });
    }

    let subtotal = cents(subtotal);
    let vat = cents(vat);
    let order = create_order(
        &state.store.docs,
        NewOrder {
            user_id: user.uid.clone(),
            items,
            subtotal,
            vat,
            total: cents(subtotal + vat),
            vat_rate: config.vat_rate,
        },
    )
    .await?;
    Ok(order)
}

/// An order the caller may see: their own, or any order for admins.
pub(crate) async fn visible_order(state: &AppState, user: &CurrentUser, id: &str) -> ApiResult<Order> {
    let order = get_order(&state.store.docs, id)
        .await?
        .ok_or(ApiError::NotFound("order"))?;
    if order.user_id != user.uid && !user.is_admin() {
        return Err(ApiError::NotFound("order"));
    }
    Ok(order)
}

async fn post_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = place_order(&state, &user, body).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(get_orders_by_user(&state.store.docs, &user.uid).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    Ok(Json(visible_order(&state, &user, &id).await?))
}
