//! Role-based authorization gate
//!
//! Maps a verified identity's role against the minimum role an action
//! declares. Callers run this before any mutating side effect - before a
//! file is written and before a row is changed.

use crate::error::ApiError;
use hookah_shared::Role;

/// Permit or deny an action for the given account role.
///
/// A deny is `Forbidden` (valid identity, insufficient role) - distinct
/// from the `Unauthorized` produced when no valid token was presented.
pub fn authorize(role: Role, required: Role) -> Result<(), ApiError> {
    if role.satisfies(required) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Insufficient rights".to_string()))
    }
}
