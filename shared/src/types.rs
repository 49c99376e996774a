//! API request and response types
//!
//! Every endpoint answers with the uniform envelope
//! `{success, message?, body?, data?}`; the DTOs below fill its slots.

use crate::models::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Uniform response envelope
///
/// `body` carries a single resource, `data` carries compound payloads
/// (login answers with `{account, token}` under `data`). Both are
/// optional so error paths can ship `{success:false, message}` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Success with a payload in the `body` slot
    pub fn body(value: T) -> Self {
        Self {
            success: true,
            message: None,
            body: Some(value),
            data: None,
        }
    }

    /// Success with a payload in the `data` slot
    pub fn data(value: T) -> Self {
        Self {
            success: true,
            message: None,
            body: None,
            data: Some(value),
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    /// Success with only a message (e.g. after a delete)
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            body: None,
            data: None,
        }
    }

    /// Failure with a user-facing message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            body: None,
            data: None,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 4, max = 30, message = "Login must be 4 to 30 characters"))]
    pub login: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "A referral code is required to register"))]
    pub ref_code: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Account as returned by the API
///
/// Never carries the password hash; the backend converts its database
/// records into this type before anything is serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub login: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload of a successful login: account plus the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub account: AccountResponse,
    pub token: String,
}

/// Identifier of a freshly created resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: Uuid,
}

/// Answer to the login/email/refCode existence checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistsResponse {
    pub is_exists: bool,
}

/// Catalog product (tobacco or coal) as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub fabricator_id: Uuid,
    pub description: String,
    pub photo_url: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_envelope_body_shape() {
        let env = Envelope::body(CreatedId { id: Uuid::new_v4() }).with_message("created");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "created");
        assert!(json["body"]["id"].is_string());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_envelope_failure_shape() {
        let env = Envelope::failure("no access");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "no access");
        assert!(json.get("body").is_none());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_register_request_limits() {
        let ok = RegisterRequest {
            login: "ann_user".to_string(),
            email: "ann@x.com".to_string(),
            password: "secret1".to_string(),
            ref_code: "R1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_login = RegisterRequest {
            login: "abc".to_string(),
            ..ok.clone()
        };
        assert!(short_login.validate().is_err());

        let short_password = RegisterRequest {
            password: "1234".to_string(),
            ..ok.clone()
        };
        assert!(short_password.validate().is_err());

        let missing_ref = RegisterRequest {
            ref_code: String::new(),
            ..ok.clone()
        };
        assert!(missing_ref.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..ok
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_register_request_uses_camel_case_ref_code() {
        let json = r#"{"login":"ann_user","email":"ann@x.com","password":"secret1","refCode":"R1"}"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ref_code, "R1");
    }

    #[test]
    fn test_account_response_has_no_password_field() {
        let account = AccountResponse {
            id: Uuid::new_v4(),
            login: "ann".to_string(),
            email: "ann@x.com".to_string(),
            role: Role::User,
            avatar_url: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn test_exists_response_field_name() {
        let json = serde_json::to_value(ExistsResponse { is_exists: true }).unwrap();
        assert_eq!(json["isExists"], true);
    }
}
