//! Account service: registration, login, identification and role checks
//!
//! # Performance
//!
//! - Password hashing/verification runs on the blocking thread pool
//! - The token service is passed by reference (pre-computed keys)

use crate::auth::{authorize, PasswordService, TokenService};
use crate::error::ApiError;
use crate::repositories::UserRepository;
use crate::storage::{Storage, AVATARS_DIR};
use hookah_shared::types::{AccountResponse, LoginData, ProductResponse, RegisterRequest};
use hookah_shared::Role;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// One message for both unknown-login and wrong-password so responses
/// never reveal which field was wrong.
const INVALID_CREDENTIALS: &str = "Invalid login or password";

/// Account service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new account
    ///
    /// Validates input, hashes the password off the async runtime and
    /// persists the account together with its referral linkage in one
    /// transaction. A login/email uniqueness race surfaces as `Conflict`.
    pub async fn register(pool: &PgPool, req: &RegisterRequest) -> Result<Uuid, ApiError> {
        req.validate()
            .map_err(|e| ApiError::Validation(validation_message(&e)))?;

        // The referral code must belong to an existing account before we
        // write anything.
        if !UserRepository::ref_code_exists(pool, &req.ref_code)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Validation("Unknown referral code".to_string()));
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let password_hash = PasswordService::hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        // Every account gets its own shareable referral code. The full
        // uuid keeps the UNIQUE constraint collision-free, so a 23505
        // here can only mean a login/email race.
        let own_ref_code = Uuid::new_v4().simple().to_string();

        let account = UserRepository::create(
            pool,
            &req.login,
            &req.email,
            &password_hash,
            &own_ref_code,
            &req.ref_code,
        )
        .await
        .map_err(|e| ApiError::from_persistence(e, "Login or email already registered"))?;

        info!(account_id = %account.id, "Account registered");
        Ok(account.id)
    }

    /// Login with login and password
    ///
    /// Absent account and wrong password produce the identical outcome.
    pub async fn login(
        pool: &PgPool,
        tokens: &TokenService,
        login: &str,
        password: &str,
    ) -> Result<LoginData, ApiError> {
        let account = UserRepository::find_by_login(pool, login)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        // Verify password on blocking thread pool (CPU-intensive)
        let valid =
            PasswordService::verify_async(password.to_string(), account.password_hash.clone())
                .await
                .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = tokens.issue(account.id).map_err(ApiError::Internal)?;

        // The response account carries no password hash by construction
        Ok(LoginData {
            account: account_response(account)?,
            token,
        })
    }

    /// Resolve an account by id (current-account and public lookups)
    pub async fn get_account(pool: &PgPool, id: Uuid) -> Result<AccountResponse, ApiError> {
        let account = UserRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

        account_response(account)
    }

    /// Authorization gate: load the account's role and check it against
    /// the action's minimum. Runs before any mutating side effect.
    pub async fn require_role(
        pool: &PgPool,
        account_id: Uuid,
        required: Role,
    ) -> Result<(), ApiError> {
        let account = UserRepository::find_by_id(pool, account_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Account not found".to_string()))?;

        authorize(parse_role(&account.role)?, required)
    }

    /// Check whether a login is taken
    pub async fn login_exists(pool: &PgPool, login: &str) -> Result<bool, ApiError> {
        require_param(login, "login")?;
        UserRepository::login_exists(pool, login)
            .await
            .map_err(ApiError::Internal)
    }

    /// Check whether an email is taken
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, ApiError> {
        require_param(email, "email")?;
        UserRepository::email_exists(pool, email)
            .await
            .map_err(ApiError::Internal)
    }

    /// Check whether a referral code exists
    pub async fn ref_code_exists(pool: &PgPool, ref_code: &str) -> Result<bool, ApiError> {
        require_param(ref_code, "refCode")?;
        UserRepository::ref_code_exists(pool, ref_code)
            .await
            .map_err(ApiError::Internal)
    }

    /// Tobaccos favorited by an account
    pub async fn favorite_tobaccos(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<ProductResponse>, ApiError> {
        let products = UserRepository::favorite_tobaccos(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    /// Coals favorited by an account
    pub async fn favorite_coals(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<ProductResponse>, ApiError> {
        let products = UserRepository::favorite_coals(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    /// Replace the account's avatar
    ///
    /// Stores the new file, persists its path, then unlinks the replaced
    /// file best-effort. Returns the refreshed account.
    pub async fn save_avatar(
        pool: &PgPool,
        storage: &Storage,
        account_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<AccountResponse, ApiError> {
        let extension = Storage::image_extension(file_name).ok_or_else(|| {
            ApiError::Validation("Photo is missing or has an unsupported format".to_string())
        })?;

        let stored_path = storage
            .save(AVATARS_DIR, extension, bytes)
            .await
            .map_err(ApiError::Internal)?;

        match UserRepository::save_avatar(pool, account_id, &stored_path)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(old_avatar) => {
                if let Some(old_path) = old_avatar {
                    storage.remove(&old_path).await;
                }
                Self::get_account(pool, account_id).await
            }
            None => {
                // Row vanished under us; do not leave the orphaned file
                storage.remove(&stored_path).await;
                Err(ApiError::NotFound("Account not found".to_string()))
            }
        }
    }
}

/// Convert a database record to the API representation, stripping the
/// password hash.
fn account_response(record: crate::repositories::AccountRecord) -> Result<AccountResponse, ApiError> {
    let role = parse_role(&record.role)?;
    Ok(AccountResponse {
        id: record.id,
        login: record.login,
        email: record.email,
        role,
        avatar_url: record.avatar_url,
        created_at: record.created_at,
    })
}

fn parse_role(role: &str) -> Result<Role, ApiError> {
    role.parse::<Role>()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Corrupt role column: {}", e)))
}

fn require_param(value: &str, name: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} is missing", name)));
    }
    Ok(())
}

fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect();
    messages.sort();
    if messages.is_empty() {
        "Invalid input".to_string()
    } else {
        messages.join("; ")
    }
}
