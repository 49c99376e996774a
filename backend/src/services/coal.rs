//! Coal catalog service
//!
//! Mirrors the tobacco flow: role gate in the handler, then photo store,
//! row persist, best-effort unlink of replaced files.

use super::tobacco::ProductInput;
use crate::error::ApiError;
use crate::repositories::{CoalRepository, CreateProduct, UpdateProduct};
use crate::storage::{Storage, COALS_DIR};
use hookah_shared::types::ProductResponse;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Coal catalog operations
pub struct CoalService;

impl CoalService {
    /// Create a coal; the photo is required
    pub async fn create(
        pool: &PgPool,
        storage: &Storage,
        user_id: Uuid,
        input: ProductInput,
    ) -> Result<Uuid, ApiError> {
        let (file_name, bytes) = input.photo.as_ref().ok_or_else(|| {
            ApiError::Forbidden("Photo is missing or has an unsupported format".to_string())
        })?;
        let extension = Storage::image_extension(file_name).ok_or_else(|| {
            ApiError::Forbidden("Photo is missing or has an unsupported format".to_string())
        })?;

        let photo_url = storage
            .save(COALS_DIR, extension, bytes)
            .await
            .map_err(ApiError::Internal)?;

        let create = CreateProduct {
            name: input.name,
            fabricator_id: input.fabricator_id,
            description: input.description,
            photo_url: photo_url.clone(),
            user_id,
        };

        match CoalRepository::create(pool, &create).await {
            Ok(product) => {
                info!(coal_id = %product.id, "Coal created");
                Ok(product.id)
            }
            Err(e) => {
                // The row never landed; drop the freshly written file
                storage.remove(&photo_url).await;
                Err(ApiError::Database(e))
            }
        }
    }

    /// All coals
    pub async fn get_all(pool: &PgPool) -> Result<Vec<ProductResponse>, ApiError> {
        let products = CoalRepository::list(pool)
            .await
            .map_err(ApiError::Internal)?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    /// One coal by id; reads are public
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<ProductResponse, ApiError> {
        let product = CoalRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Coal not found".to_string()))?;
        Ok(product.into())
    }

    /// Update a coal; a new photo replaces and unlinks the old one
    pub async fn update(
        pool: &PgPool,
        storage: &Storage,
        id: Uuid,
        input: ProductInput,
    ) -> Result<ProductResponse, ApiError> {
        let mut old_photo = None;
        let mut new_photo = None;

        if let Some((file_name, bytes)) = input.photo.as_ref() {
            let extension = Storage::image_extension(file_name).ok_or_else(|| {
                ApiError::Forbidden("Photo has an unsupported format".to_string())
            })?;
            old_photo = CoalRepository::photo_url(pool, id)
                .await
                .map_err(ApiError::Internal)?;
            let stored = storage
                .save(COALS_DIR, extension, bytes)
                .await
                .map_err(ApiError::Internal)?;
            new_photo = Some(stored);
        }

        let update = UpdateProduct {
            name: input.name,
            fabricator_id: input.fabricator_id,
            description: input.description,
            photo_url: new_photo.clone(),
        };

        match CoalRepository::update(pool, id, &update)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(product) => {
                if let Some(old_path) = old_photo {
                    storage.remove(&old_path).await;
                }
                info!(coal_id = %id, "Coal updated");
                Ok(product.into())
            }
            None => {
                if let Some(stored) = new_photo {
                    storage.remove(&stored).await;
                }
                Err(ApiError::NotFound("Coal not found".to_string()))
            }
        }
    }

    /// Delete a coal and unlink its photo
    pub async fn remove(pool: &PgPool, storage: &Storage, id: Uuid) -> Result<(), ApiError> {
        let product = CoalRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Coal not found".to_string()))?;

        storage.remove(&product.photo_url).await;
        info!(coal_id = %id, "Coal deleted");
        Ok(())
    }
}
