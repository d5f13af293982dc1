/// Game review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Review of a game by a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    /// Unique review ID
    pub id: i32,

    /// Author
    pub user_id: i32,

    /// Reviewed game
    pub game_id: i32,

    /// Review body
    pub review_text: String,

    /// When the review was posted
    pub review_date: DateTime<Utc>,
}

impl Review {
    /// Posts a review; the body is stored trimmed
    pub async fn create(
        pool: &PgPool,
        user_id: i32,
        game_id: i32,
        review_text: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, game_id, review_text, review_date)
            VALUES ($1, $2, $3, NOW())
            RETURNING review_id AS id, user_id, game_id, review_text, review_date
            "#,
        )
        .bind(user_id)
        .bind(game_id)
        .bind(review_text.trim())
        .fetch_one(pool)
        .await
    }

    /// Lists every review
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "SELECT review_id AS id, user_id, game_id, review_text, review_date \
             FROM reviews ORDER BY review_id",
        )
        .fetch_all(pool)
        .await
    }
}
