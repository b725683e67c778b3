use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use sheet_store::credentials::{create_credential, get_credential, normalize_email, Credential};
use sheet_store::users::{create_user_doc, get_user_doc, update_user_doc, UserUpdate};
use sheet_store::{new_id, StoreError};
use sheet_types::{CurrentUser, LoginRequest, Role, SignupRequest};

use super::set_cookie;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::require_api_auth;
use crate::session::{hash_password, verify_password};
use crate::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn routes(_state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/api/v1/auth/signup", post(handle_signup))
        .route("/api/v1/auth/login", post(handle_login))
        .route("/api/v1/auth/logout", post(handle_logout));

    let guarded = Router::new()
        .route("/api/v1/auth/me", get(get_me))
        .route_layer(middleware::from_fn(require_api_auth));

    open.merge(guarded)
}

/// Creates credentials and a profile, returning the new user and a fresh session token.
pub async fn sign_up(state: &AppState, request: SignupRequest) -> ApiResult<(CurrentUser, String)> {
    let email = normalize_email(&request.email);
    if !looks_like_email(&email) {
        return Err(ApiError::BadRequest("a valid email is required".into()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let displayName = match request.display_name.trim() {
        "" => email.split('@').next().unwrap_or_default().to_string(),
        name => name.to_string(),
    };

    let passwordHash =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let uid = new_id();
    let credential = Credential {
        uid: uid.clone(),
        email: email.clone(),
        password_hash: passwordHash,
        created_at: Utc::now(),
    };
    match create_credential(&state.store.docs, &credential).await {
        Err(StoreError::AlreadyExists { .. }) => {
            return Err(ApiError::Conflict("email already registered".into()))
        }
        other => other?,
    }

    let mut profile = create_user_doc(&state.store.docs, &uid, &email, &displayName).await?;
    if state.is_admin_email(&email) {
        profile = update_user_doc(
            &state.store.docs,
            &uid,
            UserUpdate {
                role: Some(Role::Admin),
                ..UserUpdate::default()
            },
        )
        .await?;
        tracing::info!("{email} signed up with the admin role");
    } else {
        tracing::info!("{email} signed up");
    }

    let token = state.sessions.issue(&uid, Utc::now());
    Ok((CurrentUser::from(&profile), token))
}

/// Checks the password and returns the user with a fresh session token.
pub async fn log_in(state: &AppState, request: LoginRequest) -> ApiResult<(CurrentUser, String)> {
    let credential = get_credential(&state.store.docs, &request.email)
        .await?
        .filter(|c| verify_password(&request.password, &c.password_hash))
        .ok_or(ApiError::Unauthorized)?;

    let profile = get_user_doc(&state.store.docs, &credential.uid)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    tracing::info!("{} logged in", profile.email);
    let token = state.sessions.issue(&profile.uid, Utc::now());
    Ok((CurrentUser::from(&profile), token))
}

pub(crate) fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

async fn handle_signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> ApiResult<Response> {
    let (user, token) = sign_up(&state, body).await?;
    let response = (StatusCode::CREATED, Json(user)).into_response();
    Ok(set_cookie(response, &state.sessions.cookie(&token)))
}

async fn handle_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Response> {
    let (user, token) = log_in(&state, body).await?;
    Ok(set_cookie(Json(user).into_response(), &state.sessions.cookie(&token)))
}

async fn handle_logout(State(state): State<AppState>) -> Response {
    set_cookie(StatusCode::NO_CONTENT.into_response(), &state.sessions.clear_cookie())
}

async fn get_me(Extension(user): Extension<CurrentUser>) -> Json<CurrentUser> {
    Json(user)
}
