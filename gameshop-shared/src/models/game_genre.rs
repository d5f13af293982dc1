/// Game-genre link model
///
/// Links are unique per (game, genre) pair.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Link between a game and a genre
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GameGenre {
    /// Unique link ID
    pub id: i32,

    /// Linked game
    pub game_id: i32,

    /// Linked genre
    pub genre_id: i32,
}

impl GameGenre {
    /// Links a game to a genre
    ///
    /// A duplicate pair hits the unique constraint and is mapped to a
    /// conflict at the HTTP layer.
    pub async fn create(pool: &PgPool, game_id: i32, genre_id: i32) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, GameGenre>(
            r#"
            INSERT INTO game_genres (game_id, genre_id)
            VALUES ($1, $2)
            RETURNING id, game_id, genre_id
            "#,
        )
        .bind(game_id)
        .bind(genre_id)
        .fetch_one(pool)
        .await
    }

    /// Lists all links
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, GameGenre>("SELECT id, game_id, genre_id FROM game_genres ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Repoints a link at a different game/genre pair
    pub async fn update(
        pool: &PgPool,
        id: i32,
        game_id: i32,
        genre_id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, GameGenre>(
            r#"
            UPDATE game_genres
            SET game_id = $2, genre_id = $3
            WHERE id = $1
            RETURNING id, game_id, genre_id
            "#,
        )
        .bind(id)
        .bind(game_id)
        .bind(genre_id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a link by ID
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM game_genres WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a link by its (game, genre) pair
    pub async fn delete_by_pair(
        pool: &PgPool,
        game_id: i32,
        genre_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM game_genres WHERE game_id = $1 AND genre_id = $2")
            .bind(game_id)
            .bind(genre_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
