//! Database repositories
//!
//! Provides the data access layer. Catalog products (tobaccos and coals)
//! share one row shape, so the record and input types live here and the
//! per-table repositories reuse them.

pub mod coal;
pub mod tobacco;
pub mod user;

pub use coal::CoalRepository;
pub use tobacco::TobaccoRepository;
pub use user::{AccountRecord, UserRepository};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Catalog product row (tobaccos and coals tables share this shape)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub fabricator_id: Uuid,
    pub description: String,
    pub photo_url: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRecord> for hookah_shared::types::ProductResponse {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            fabricator_id: record.fabricator_id,
            description: record.description,
            photo_url: record.photo_url,
            user_id: record.user_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for creating a catalog product
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub fabricator_id: Uuid,
    pub description: String,
    pub photo_url: String,
    pub user_id: Uuid,
}

/// Input for updating a catalog product
///
/// `photo_url` is `None` when the photo is unchanged; the UPDATE keeps
/// the existing value via COALESCE.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub name: String,
    pub fabricator_id: Uuid,
    pub description: String,
    pub photo_url: Option<String>,
}
