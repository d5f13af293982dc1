/// Genre catalog model

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Genre entry; names are unique
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Genre {
    /// Unique genre ID
    pub id: i32,

    /// Genre name
    pub name: String,
}

impl Genre {
    /// Adds a genre
    pub async fn create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            r#"
            INSERT INTO genres (genre_name)
            VALUES ($1)
            RETURNING genre_id AS id, genre_name AS name
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    /// Lists all genres
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            "SELECT genre_id AS id, genre_name AS name FROM genres ORDER BY genre_id",
        )
        .fetch_all(pool)
        .await
    }

    /// Finds a genre by ID
    pub async fn find_by_id(pool: &PgPool, genre_id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            "SELECT genre_id AS id, genre_name AS name FROM genres WHERE genre_id = $1",
        )
        .bind(genre_id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a genre; game links cascade
    pub async fn delete(pool: &PgPool, genre_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE genre_id = $1")
            .bind(genre_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
