use axum::{
    extract::{Path, State},
    middleware,
    routing::patch,
    Extension, Json, Router,
};
use sheet_store::users::{update_user_doc, UserUpdate};
use sheet_types::{CurrentUser, UpdateProfileRequest, UpdateRoleRequest, UserProfile};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{require_admin, require_api_auth};
use crate::state::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    let own = Router::new()
        .route("/api/v1/users/me", patch(patch_me))
        .route_layer(middleware::from_fn(require_api_auth));

    let admin = Router::new()
        .route("/api/v1/admin/users/:uid", patch(patch_role))
        .route_layer(middleware::from_fn(require_admin));

    own.merge(admin)
}

async fn patch_me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let name = body.display_name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("display name cannot be empty".into()));
    }
    let update = UserUpdate {
        display_name: Some(name.to_string()),
        ..UserUpdate::default()
    };
    Ok(Json(update_user_doc(&state.store.docs, &user.uid, update).await?))
}

async fn patch_role(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    Path(uid): Path<String>,
    Json(body): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UserProfile>> {
    let update = UserUpdate {
        role: Some(body.role),
        ..UserUpdate::default()
    };
    let profile = update_user_doc(&state.store.docs, &uid, update).await?;
    tracing::info!("{} set role of {uid} to {}", admin.email, body.role.as_str());
    Ok(Json(profile))
}
