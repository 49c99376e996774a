//! Tobacco catalog routes
//!
//! Reads are public; mutations require a moderator role, checked before
//! the multipart body is consumed so no file is written on a deny.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::upload;
use crate::services::{TobaccoService, UserService};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use hookah_shared::types::{CreatedId, Envelope, ProductResponse};
use hookah_shared::Role;
use uuid::Uuid;

/// Create tobacco routes
pub fn tobacco_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
}

/// GET /api/v1/tobaccos
async fn get_all(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<ProductResponse>>>> {
    let products = TobaccoService::get_all(state.db()).await?;
    Ok(Json(Envelope::body(products)))
}

/// GET /api/v1/tobaccos/:id
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<ProductResponse>>> {
    let product = TobaccoService::get_by_id(state.db(), id).await?;
    Ok(Json(Envelope::body(product)))
}

/// POST /api/v1/tobaccos (moderator, multipart with required photo)
async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Envelope<CreatedId>>)> {
    UserService::require_role(state.db(), auth.account_id, Role::Moderator).await?;

    let input = upload::read_product_form(multipart).await?;
    let id = TobaccoService::create(state.db(), state.storage(), auth.account_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::body(CreatedId { id }).with_message("New tobacco saved")),
    ))
}

/// PUT /api/v1/tobaccos/:id (moderator, multipart with optional photo)
async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<Envelope<ProductResponse>>> {
    UserService::require_role(state.db(), auth.account_id, Role::Moderator).await?;

    let input = upload::read_product_form(multipart).await?;
    let product = TobaccoService::update(state.db(), state.storage(), id, input).await?;
    Ok(Json(Envelope::body(product).with_message("Tobacco updated")))
}

/// DELETE /api/v1/tobaccos/:id (moderator)
async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<()>>> {
    UserService::require_role(state.db(), auth.account_id, Role::Moderator).await?;

    TobaccoService::remove(state.db(), state.storage(), id).await?;
    Ok(Json(Envelope::message("Tobacco deleted")))
}
