//! Account repository for database operations

use super::ProductRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Account row from the users table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRecord {
    pub id: Uuid,
    pub login: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub ref_code: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const ACCOUNT_COLUMNS: &str =
    "id, login, email, password_hash, role, ref_code, avatar_url, created_at, updated_at";

/// Account repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new account and its referral linkage
    ///
    /// Both writes commit in a single transaction: the linkage cannot
    /// reference a nonexistent account, and a failed linkage must not
    /// leave an orphaned account behind.
    pub async fn create(
        pool: &PgPool,
        login: &str,
        email: &str,
        password_hash: &str,
        own_ref_code: &str,
        used_ref_code: &str,
    ) -> Result<AccountRecord, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let account = sqlx::query_as::<_, AccountRecord>(&format!(
            r#"
            INSERT INTO users (login, email, password_hash, ref_code)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACCOUNT_COLUMNS}
            "#,
        ))
        .bind(login)
        .bind(email)
        .bind(password_hash)
        .bind(own_ref_code)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO referrals (ref_code, invited_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(used_ref_code)
        .bind(account.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(account)
    }

    /// Find account by login
    pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<AccountRecord>> {
        let account = sqlx::query_as::<_, AccountRecord>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM users
            WHERE login = $1
            "#,
        ))
        .bind(login)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Find account by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<AccountRecord>> {
        let account = sqlx::query_as::<_, AccountRecord>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Replace the avatar path, returning the previous one
    ///
    /// The old path comes back so the caller can unlink the replaced
    /// file after the row change committed. Outer `None` means the
    /// account does not exist.
    pub async fn save_avatar(
        pool: &PgPool,
        id: Uuid,
        avatar_url: &str,
    ) -> Result<Option<Option<String>>> {
        let old = sqlx::query_scalar::<_, Option<String>>(
            r#"
            WITH prev AS (
                SELECT avatar_url FROM users WHERE id = $1
            )
            UPDATE users
            SET avatar_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING (SELECT avatar_url FROM prev)
            "#,
        )
        .bind(id)
        .bind(avatar_url)
        .fetch_optional(pool)
        .await?;

        Ok(old)
    }

    /// Check if a login is taken
    pub async fn login_exists(pool: &PgPool, login: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)
            "#,
        )
        .bind(login)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Check if an email is taken
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Check if a referral code belongs to some account
    pub async fn ref_code_exists(pool: &PgPool, ref_code: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE ref_code = $1)
            "#,
        )
        .bind(ref_code)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Tobaccos favorited by an account
    pub async fn favorite_tobaccos(pool: &PgPool, user_id: Uuid) -> Result<Vec<ProductRecord>> {
        let products = sqlx::query_as::<_, ProductRecord>(
            r#"
            SELECT t.id, t.name, t.fabricator_id, t.description, t.photo_url,
                   t.user_id, t.created_at, t.updated_at
            FROM tobaccos t
            JOIN favorite_tobaccos f ON f.tobacco_id = t.id
            WHERE f.user_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Coals favorited by an account
    pub async fn favorite_coals(pool: &PgPool, user_id: Uuid) -> Result<Vec<ProductRecord>> {
        let products = sqlx::query_as::<_, ProductRecord>(
            r#"
            SELECT c.id, c.name, c.fabricator_id, c.description, c.photo_url,
                   c.user_id, c.created_at, c.updated_at
            FROM coals c
            JOIN favorite_coals f ON f.coal_id = c.id
            WHERE f.user_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }
}
