/// Game catalog model
///
/// Titles are unique; the catalog insert relies on the constraint and the
/// HTTP layer maps the violation to a conflict.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Game {
    /// Unique game ID
    pub id: i32,

    /// Title; unique across the catalog
    pub title: String,

    /// Store-page description
    pub description: String,

    /// Unit price
    pub price: Decimal,

    /// Release date
    pub release_date: DateTime<Utc>,

    /// Developer studio
    pub developer: String,

    /// Publisher
    pub publisher: String,

    /// Age rating label (e.g. "PEGI 18")
    pub age_rating: String,
}

/// Input for creating or replacing a catalog entry
#[derive(Debug, Clone, Deserialize)]
pub struct GameData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub release_date: DateTime<Utc>,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub age_rating: String,
}

const GAME_COLUMNS: &str =
    "game_id AS id, title, description, price, release_date, developer, publisher, age_rating";

impl Game {
    /// Adds a game to the catalog
    pub async fn create(pool: &PgPool, data: GameData) -> Result<Self, sqlx::Error> {
        let game = sqlx::query_as::<_, Game>(
            r#"
            INSERT INTO games (title, description, price, release_date, developer, publisher, age_rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING game_id AS id, title, description, price, release_date, developer, publisher, age_rating
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.price)
        .bind(data.release_date)
        .bind(data.developer)
        .bind(data.publisher)
        .bind(data.age_rating)
        .fetch_one(pool)
        .await?;

        Ok(game)
    }

    /// Lists the whole catalog
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Game>(&format!("SELECT {GAME_COLUMNS} FROM games ORDER BY game_id"))
            .fetch_all(pool)
            .await
    }

    /// Finds a game by ID
    pub async fn find_by_id(pool: &PgPool, game_id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Game>(&format!("SELECT {GAME_COLUMNS} FROM games WHERE game_id = $1"))
            .bind(game_id)
            .fetch_optional(pool)
            .await
    }

    /// Cheap existence probe used by the purchase and cart paths
    pub async fn exists(pool: &PgPool, game_id: i32) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM games WHERE game_id = $1)")
                .bind(game_id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Replaces a catalog entry
    pub async fn update(
        pool: &PgPool,
        game_id: i32,
        data: GameData,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Game>(
            r#"
            UPDATE games
            SET title = $2, description = $3, price = $4, release_date = $5,
                developer = $6, publisher = $7, age_rating = $8
            WHERE game_id = $1
            RETURNING game_id AS id, title, description, price, release_date, developer, publisher, age_rating
            "#,
        )
        .bind(game_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.price)
        .bind(data.release_date)
        .bind(data.developer)
        .bind(data.publisher)
        .bind(data.age_rating)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a catalog entry
    pub async fn delete(pool: &PgPool, game_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM games WHERE game_id = $1")
            .bind(game_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Empties the catalog (administrative)
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM games").execute(pool).await?;

        Ok(result.rows_affected())
    }
}
