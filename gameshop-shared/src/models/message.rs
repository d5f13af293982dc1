/// Chat message model
///
/// Stores both user-authored messages and assistant replies; `is_from_guest`
/// marks messages sent before the user registered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Stored chat message
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    /// Unique message ID
    pub id: i32,

    /// Author (or addressee, for assistant replies)
    pub user_id: i32,

    /// Message body
    pub message_text: String,

    /// Whether the author was a guest at the time
    pub is_from_guest: bool,

    /// When the message was sent
    pub message_date: DateTime<Utc>,
}

impl Message {
    /// Stores a message
    pub async fn create(
        pool: &PgPool,
        user_id: i32,
        message_text: &str,
        is_from_guest: bool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (user_id, message_text, is_from_guest, message_date)
            VALUES ($1, $2, $3, NOW())
            RETURNING message_id AS id, user_id, message_text, is_from_guest, message_date
            "#,
        )
        .bind(user_id)
        .bind(message_text)
        .bind(is_from_guest)
        .fetch_one(pool)
        .await
    }

    /// Lists every message
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "SELECT message_id AS id, user_id, message_text, is_from_guest, message_date \
             FROM messages ORDER BY message_id",
        )
        .fetch_all(pool)
        .await
    }
}
