//! Public account routes: profile view and favorites lookups

use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use hookah_shared::types::{AccountResponse, Envelope, ProductResponse};
use uuid::Uuid;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_by_id))
        .route("/:id/favorites/tobaccos", get(favorite_tobaccos))
        .route("/:id/favorites/coals", get(favorite_coals))
}

/// GET /api/v1/users/:id - public account view
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<AccountResponse>>> {
    let account = UserService::get_account(state.db(), id).await?;
    Ok(Json(Envelope::body(account)))
}

/// GET /api/v1/users/:id/favorites/tobaccos
async fn favorite_tobaccos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Vec<ProductResponse>>>> {
    let products = UserService::favorite_tobaccos(state.db(), id).await?;
    Ok(Json(Envelope::body(products).with_message("Favorites list retrieved")))
}

/// GET /api/v1/users/:id/favorites/coals
async fn favorite_coals(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Vec<ProductResponse>>>> {
    let products = UserService::favorite_coals(state.db(), id).await?;
    Ok(Json(Envelope::body(products).with_message("Favorites list retrieved")))
}
