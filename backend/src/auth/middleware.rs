//! Bearer-token extractor
//!
//! Turns the `Authorization` header into a verified account id using
//! the pre-computed keys in `AppState`; verification is pure
//! computation, no I/O per request.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

/// Authenticated account id from the session token
///
/// Handlers that also need the account's role go through
/// `UserService::require_role` before acting.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: Uuid,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        // Signature mismatch, malformed token and expiry all collapse
        // into the same rejection.
        let account_id = AppState::from_ref(state)
            .tokens()
            .verify(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser { account_id })
    }
}
