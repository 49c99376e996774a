//! Authentication routes
//!
//! Registration, login, current-account resolution, the three existence
//! checks and the avatar upload.
//!
//! # Performance
//!
//! - Pre-computed token keys from AppState (no per-request allocation)
//! - Password hashing runs on the blocking thread pool

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::upload;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use hookah_shared::types::{
    AccountResponse, CreatedId, Envelope, ExistsResponse, LoginData, LoginRequest, RegisterRequest,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(current_account))
        .route("/avatar", put(save_avatar))
        .route("/login-exists/:login", get(login_exists))
        .route("/email-exists/:email", get(email_exists))
        .route("/ref-code-exists/:code", get(ref_code_exists))
}

/// Register a new account
///
/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<CreatedId>>)> {
    let id = UserService::register(state.db(), &req).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::body(CreatedId { id }).with_message("Account registered")),
    ))
}

/// Login with login and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<LoginData>>> {
    let data = UserService::login(state.db(), state.tokens(), &req.login, &req.password).await?;
    Ok(Json(Envelope::data(data)))
}

/// Resolve the current account from the session token
///
/// GET /api/v1/auth/me
async fn current_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Envelope<AccountResponse>>> {
    let account = UserService::get_account(state.db(), auth.account_id).await?;
    Ok(Json(Envelope::body(account)))
}

/// Replace the current account's avatar (multipart `photo` part)
///
/// PUT /api/v1/auth/avatar
async fn save_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<Envelope<AccountResponse>>> {
    let (file_name, bytes) = upload::read_photo(multipart).await?;
    let account = UserService::save_avatar(
        state.db(),
        state.storage(),
        auth.account_id,
        &file_name,
        &bytes,
    )
    .await?;
    Ok(Json(Envelope::body(account)))
}

/// GET /api/v1/auth/login-exists/:login
async fn login_exists(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> ApiResult<Json<Envelope<ExistsResponse>>> {
    let is_exists = UserService::login_exists(state.db(), &login).await?;
    Ok(Json(Envelope::body(ExistsResponse { is_exists })))
}

/// GET /api/v1/auth/email-exists/:email
async fn email_exists(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Envelope<ExistsResponse>>> {
    let is_exists = UserService::email_exists(state.db(), &email).await?;
    Ok(Json(Envelope::body(ExistsResponse { is_exists })))
}

/// GET /api/v1/auth/ref-code-exists/:code
async fn ref_code_exists(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Envelope<ExistsResponse>>> {
    let is_exists = UserService::ref_code_exists(state.db(), &code).await?;
    Ok(Json(Envelope::body(ExistsResponse { is_exists })))
}
