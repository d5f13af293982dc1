/// User model and account operations
///
/// Logins are unique and case-sensitive as stored. Credential handling is
/// deliberately plain: the surrounding system treats session security as an
/// external concern and payloads carry raw credentials.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     user_id SERIAL PRIMARY KEY,
///     user_name VARCHAR(100) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL,
///     password VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     is_guest BOOLEAN NOT NULL DEFAULT FALSE,
///     role VARCHAR(20) NOT NULL DEFAULT 'customer'
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i32,

    /// Login name; unique, compared exactly as stored
    pub login: String,

    /// Email address
    pub email: String,

    /// Stored credential secret
    #[serde(skip_serializing)]
    pub password: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// Whether this is a guest account
    pub is_guest: bool,

    /// Account role (e.g. "customer", "admin")
    pub role: String,
}

/// Input for creating a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    /// Login name
    pub login: String,

    /// Email address
    pub email: String,

    /// Credential secret
    pub password: String,

    /// Creation timestamp; defaults to now when omitted
    pub created_at: Option<DateTime<Utc>>,

    /// Guest flag
    #[serde(default)]
    pub is_guest: bool,
}

const USER_COLUMNS: &str =
    "user_id AS id, user_name AS login, email, password, created_at, is_guest, role";

impl User {
    /// Creates a new user
    ///
    /// A duplicate login hits the unique constraint and surfaces as a
    /// database error the HTTP layer maps to a conflict.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_name, email, password, created_at, is_guest)
            VALUES ($1, $2, $3, COALESCE($4, NOW()), $5)
            RETURNING user_id AS id, user_name AS login, email, password, created_at, is_guest, role
            "#,
        )
        .bind(data.login)
        .bind(data.email)
        .bind(data.password)
        .bind(data.created_at)
        .bind(data.is_guest)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, user_id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by login
    pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = $1"
        ))
        .bind(login)
        .fetch_optional(pool)
        .await
    }

    /// Cheap existence probe used by the purchase and cart paths
    pub async fn exists(pool: &PgPool, user_id: i32) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Updates a user's login and email
    pub async fn update_profile(
        pool: &PgPool,
        user_id: i32,
        login: &str,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET user_name = $2, email = $3
            WHERE user_id = $1
            RETURNING user_id AS id, user_name AS login, email, password, created_at, is_guest, role
            "#,
        )
        .bind(user_id)
        .bind(login)
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a user
    ///
    /// Purchases, cart lines, reviews, and messages cascade.
    pub async fn delete(pool: &PgPool, user_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
