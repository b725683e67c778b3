use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use sheet_engine::analyze_dxf;
use sheet_store::parts::{
    create_part, delete_pending_part, get_part, get_parts_by_user, storage_key, NewPart,
};
use sheet_types::{CurrentUser, Part, PartAnalysis, PartSize, UploadResponse};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::require_api_auth;
use crate::state::AppState;

pub const DEFAULT_THICKNESS_MM: f64 = 2.0;
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/parts", get(list_parts).post(upload_part))
        .route("/api/v1/parts/analyze", post(analyze_part))
        .route("/api/v1/parts/:id", get(get_one).delete(delete_part))
        .route("/files/*key", get(get_file))
        .route_layer(middleware::from_fn(require_api_auth))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[derive(Deserialize)]
struct AnalyzeQuery {
    thickness: Option<f64>,
    name: Option<String>,
}

fn parse_thickness(raw: Option<f64>) -> ApiResult<f64> {
    match raw {
        None => Ok(DEFAULT_THICKNESS_MM),
        Some(t) if t.is_finite() && t > 0.0 => Ok(t),
        Some(_) => Err(ApiError::BadRequest("thickness must be positive".into())),
    }
}

/// Only same-site paths are followed after an upload.
fn local_redirect(target: &str) -> Option<&str> {
    (target.starts_with('/') && !target.starts_with("//") && !target.contains('\\'))
        .then_some(target)
}

async fn analyze_part(
    Query(query): Query<AnalyzeQuery>,
    body: Bytes,
) -> ApiResult<Json<PartAnalysis>> {
    let thickness = parse_thickness(query.thickness)?;
    let content = String::from_utf8_lossy(&body);
    let fileName = query.name.unwrap_or_else(|| "drawing.dxf".into());
    Ok(Json(analyze_dxf(&fileName, &content, thickness)?))
}

async fn upload_part(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let mut file: Option<(String, Bytes)> = None;
    let mut quantity: u32 = 1;
    let mut thickness: Option<f64> = None;
    let mut redirect: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let fileName = field.file_name().unwrap_or("drawing.dxf").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                file = Some((fileName, bytes));
            }
            "quantity" | "thickness" | "redirect" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                let text = text.trim();
                match name.as_str() {
                    "quantity" => {
                        quantity = text
                            .parse()
                            .ok()
                            .filter(|q| *q > 0)
                            .ok_or_else(|| ApiError::BadRequest("quantity must be a positive integer".into()))?;
                    }
                    "thickness" if !text.is_empty() => {
                        thickness = Some(text.parse().map_err(|_| {
                            ApiError::BadRequest("thickness must be a number".into())
                        })?);
                    }
                    "redirect" => redirect = Some(text.to_string()),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    let (fileName, bytes) = file.ok_or_else(|| ApiError::BadRequest("missing file".into()))?;
    if !fileName.to_ascii_lowercase().ends_with(".dxf") {
        return Err(ApiError::BadRequest("only .dxf files are accepted".into()));
    }
    let thickness = parse_thickness(thickness)?;
    let analysis = analyze_dxf(&fileName, &String::from_utf8_lossy(&bytes), thickness)?;

    let key = storage_key(&user.uid, Utc::now().timestamp_millis(), &fileName);
    let fileUrl = state
        .store
        .objects
        .upload(&key, &bytes, "application/dxf")
        .await?;

    let part = create_part(
        &state.store.docs,
        NewPart {
            user_id: user.uid.clone(),
            file_name: fileName,
            file_url: fileUrl,
            bounding_box: PartSize {
                width: analysis.width,
                height: analysis.height,
            },
            svg_path: analysis.svg_path.clone(),
            area: analysis.area,
            cut_length: analysis.cut_length,
            quantity,
        },
    )
    .await?;
    tracing::info!(
        "part {} uploaded by {} ({:.1}x{:.1}mm, {} dfm errors)",
        part.id,
        user.uid,
        analysis.width,
        analysis.height,
        analysis.summary.errors
    );

    if let Some(target) = redirect.as_deref().and_then(local_redirect) {
        return Ok(Redirect::to(target).into_response());
    }
    Ok((StatusCode::CREATED, Json(UploadResponse { part, analysis })).into_response())
}

async fn list_parts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Part>>> {
    Ok(Json(get_parts_by_user(&state.store.docs, &user.uid).await?))
}

/// A part the caller may see: their own, or any part for admins.
pub(crate) async fn visible_part(state: &AppState, user: &CurrentUser, id: &str) -> ApiResult<Part> {
    let part = get_part(&state.store.docs, id)
        .await?
        .ok_or(ApiError::NotFound("part"))?;
    if part.user_id != user.uid && !user.is_admin() {
        return Err(ApiError::NotFound("part"));
    }
    Ok(part)
}

/// Uploaded drawings are served to their owner and to admins.
async fn get_file(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    let owner = key.strip_prefix("dxf/").and_then(|rest| rest.split('/').next());
    if owner != Some(user.uid.as_str()) && !user.is_admin() {
        return Err(ApiError::NotFound("file"));
    }
    let bytes = state.store.objects.read(&key).await?;
    Ok(([(header::CONTENT_TYPE, "application/dxf")], bytes).into_response())
}

async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Part>> {
    Ok(Json(visible_part(&state, &user, &id).await?))
}

async fn delete_part(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let part = visible_part(&state, &user, &id).await?;
    if part.user_id != user.uid {
        return Err(ApiError::Forbidden);
    }
    let removed = delete_pending_part(&state.store.docs, &id).await?;
    if let Err(e) = state.store.objects.delete_url(&removed.file_url).await {
        tracing::warn!("part {id} deleted but its file was not: {e}");
    }
    Ok(StatusCode::NO_CONTENT)
}
