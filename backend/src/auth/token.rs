//! Session token issuance and verification
//!
//! Stateless signed tokens carrying exactly one claim the system needs:
//! the account id. Validity is determined purely by signature and expiry;
//! there is no server-side session table and no revocation list (a leaked
//! token stays valid until natural expiry - documented limitation).
//!
//! Keys are pre-computed once at startup and cached in AppState.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Pre-computed signing keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl TokenKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Token issuer/verifier
///
/// Construct once at startup with the process-wide signing secret and
/// share via AppState; cloning is cheap (Arc'd keys).
#[derive(Clone)]
pub struct TokenService {
    keys: TokenKeys,
    validity_secs: i64,
}

impl TokenService {
    /// Create a new token service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    /// Do NOT create per-request.
    pub fn new(secret: &str, validity_secs: i64) -> Self {
        Self {
            keys: TokenKeys::new(secret),
            validity_secs,
        }
    }

    /// Issue a signed token embedding the account id
    ///
    /// Expiry is issuance time plus the configured validity window
    /// (30 days by default).
    pub fn issue(&self, account_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.validity_secs);

        let claims = Claims {
            sub: account_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))
    }

    /// Verify a token and extract the embedded account id
    ///
    /// Signature mismatch, malformed input and expiry all fold into one
    /// invalid outcome; callers never learn which check failed.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|_| anyhow::anyhow!("Invalid token"))?;

        Uuid::parse_str(&token_data.claims.sub).map_err(|_| anyhow::anyhow!("Invalid token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THIRTY_DAYS: i64 = 2_592_000;

    fn create_test_service() -> TokenService {
        TokenService::new("test-secret", THIRTY_DAYS)
    }

    #[test]
    fn test_verify_of_issued_token_returns_same_id() {
        let service = create_test_service();
        let account_id = Uuid::new_v4();

        let token = service.issue(account_id).unwrap();
        let verified = service.verify(&token).unwrap();

        assert_eq!(verified, account_id);
    }

    #[test]
    fn test_expired_token_is_invalid() {
        // Negative validity puts the expiry far in the past, beyond the
        // default 60s leeway.
        let service = TokenService::new("test-secret", -3600);
        let token = service.issue(Uuid::new_v4()).unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let service = create_test_service();
        let token = service.issue(Uuid::new_v4()).unwrap();

        // Flip one byte in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let service = create_test_service();

        assert!(service.verify("").is_err());
        assert!(service.verify("not.a.token").is_err());
        assert!(service.verify("onlyonesegment").is_err());
    }

    #[test]
    fn test_token_from_other_secret_is_invalid() {
        let service = create_test_service();
        let other = TokenService::new("different-secret", THIRTY_DAYS);

        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let cloned = service.clone(); // Should be cheap due to Arc

        let account_id = Uuid::new_v4();
        let token = service.issue(account_id).unwrap();
        assert_eq!(cloned.verify(&token).unwrap(), account_id);
    }
}
