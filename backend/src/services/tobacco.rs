//! Tobacco catalog service
//!
//! The role gate runs in the handler before the request body is even
//! consumed; this service sequences the remaining effects: store the
//! photo, persist the row, then unlink any replaced file best-effort.

use crate::error::ApiError;
use crate::repositories::{CreateProduct, TobaccoRepository, UpdateProduct};
use crate::storage::{Storage, TOBACCOS_DIR};
use hookah_shared::types::ProductResponse;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// A parsed product form: text fields plus the uploaded photo, if any
#[derive(Debug)]
pub struct ProductInput {
    pub name: String,
    pub fabricator_id: Uuid,
    pub description: String,
    /// Original file name and raw bytes of the uploaded photo
    pub photo: Option<(String, Vec<u8>)>,
}

/// Tobacco catalog operations
pub struct TobaccoService;

impl TobaccoService {
    /// Create a tobacco; the photo is required
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
            .save(TOBACCOS_DIR, extension, bytes)
            .await
            .map_err(ApiError::Internal)?;

        let create = CreateProduct {
            name: input.name,
            fabricator_id: input.fabricator_id,
            description: input.description,
            photo_url: photo_url.clone(),
            user_id,
        };

        match TobaccoRepository::create(pool, &create).await {
            Ok(product) => {
                info!(tobacco_id = %product.id, "Tobacco created");
                Ok(product.id)
            }
            Err(e) => {
                // The row never landed; drop the freshly written file
                storage.remove(&photo_url).await;
                Err(ApiError::Database(e))
            }
        }
    }

    /// All tobaccos
    pub async fn get_all(pool: &PgPool) -> Result<Vec<ProductResponse>, ApiError> {
        let products = TobaccoRepository::list(pool)
            .await
            .map_err(ApiError::Internal)?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    /// One tobacco by id; reads are public
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<ProductResponse, ApiError> {
        let product = TobaccoRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Tobacco not found".to_string()))?;
        Ok(product.into())
    }

    /// Update a tobacco; a new photo replaces and unlinks the old one
    pub async fn update(
        pool: &PgPool,
        storage: &Storage,
        id: Uuid,
        input: ProductInput,
    ) -> Result<ProductResponse, ApiError> {
        // When a photo was sent, remember what it replaces before the row
        // changes.
        let mut old_photo = None;
        let mut new_photo = None;

        if let Some((file_name, bytes)) = input.photo.as_ref() {
            let extension = Storage::image_extension(file_name).ok_or_else(|| {
                ApiError::Forbidden("Photo has an unsupported format".to_string())
            })?;
            old_photo = TobaccoRepository::photo_url(pool, id)
                .await
                .map_err(ApiError::Internal)?;
            let stored = storage
                .save(TOBACCOS_DIR, extension, bytes)
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

        match TobaccoRepository::update(pool, id, &update)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(product) => {
                if let Some(old_path) = old_photo {
                    storage.remove(&old_path).await;
                }
                info!(tobacco_id = %id, "Tobacco updated");
                Ok(product.into())
            }
            None => {
                if let Some(stored) = new_photo {
                    storage.remove(&stored).await;
                }
                Err(ApiError::NotFound("Tobacco not found".to_string()))
            }
        }
    }

    /// Delete a tobacco and unlink its photo
    pub async fn remove(pool: &PgPool, storage: &Storage, id: Uuid) -> Result<(), ApiError> {
        let product = TobaccoRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Tobacco not found".to_string()))?;

        storage.remove(&product.photo_url).await;
        info!(tobacco_id = %id, "Tobacco deleted");
        Ok(())
    }
}
