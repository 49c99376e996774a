//! Tobacco repository for database operations

use super::{CreateProduct, ProductRecord, UpdateProduct};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

const PRODUCT_COLUMNS: &str =
    "id, name, fabricator_id, description, photo_url, user_id, created_at, updated_at";

/// Tobacco repository for database operations
pub struct TobaccoRepository;

impl TobaccoRepository {
    /// Insert a new tobacco row
    pub async fn create(
        pool: &PgPool,
        input: &CreateProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            INSERT INTO tobaccos (name, fabricator_id, description, photo_url, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(&input.name)
        .bind(input.fabricator_id)
        .bind(&input.description)
        .bind(&input.photo_url)
        .bind(input.user_id)
        .fetch_one(pool)
        .await
    }

    /// All tobaccos, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<ProductRecord>> {
        let products = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM tobaccos
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Find a tobacco by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ProductRecord>> {
        let product = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM tobaccos
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Current photo path of a tobacco, if the row exists
    pub async fn photo_url(pool: &PgPool, id: Uuid) -> Result<Option<String>> {
        let photo = sqlx::query_scalar::<_, String>(
            r#"
            SELECT photo_url FROM tobaccos WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(photo)
    }

    /// Update a tobacco; `None` when the row does not exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &UpdateProduct,
    ) -> Result<Option<ProductRecord>> {
        let product = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            UPDATE tobaccos SET
                name = $2,
                fabricator_id = $3,
                description = $4,
                photo_url = COALESCE($5, photo_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.fabricator_id)
        .bind(&input.description)
        .bind(&input.photo_url)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Delete a tobacco, returning the removed row for photo cleanup
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<ProductRecord>> {
        let product = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            DELETE FROM tobaccos
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }
}
