//! Hookah Catalog Shared Library
//!
//! This crate contains the API types and the uniform response envelope
//! shared between the backend and any future clients.

pub mod models;
pub mod types;

// Re-export commonly used items
pub use models::Role;
pub use types::*;
