/// Cart model with merge-on-add semantics
///
/// A cart line is uniquely keyed by (user, game); the table enforces this
/// with a unique constraint and the add path is a single upsert whose
/// conflict clause increments the existing quantity. Two concurrent first
/// adds for the same pair therefore collapse into one row with the summed
/// quantity instead of racing on insert.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cart (
///     cart_id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
///     game_id INTEGER NOT NULL REFERENCES games(game_id) ON DELETE CASCADE,
///     quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity > 0),
///     UNIQUE (user_id, game_id)
/// );
/// ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{game::Game, user::User};

/// Failures from cart operations
#[derive(Debug, Error)]
pub enum CartError {
    /// Referenced user does not exist
    #[error("user {0} not found")]
    UserNotFound(i32),

    /// Referenced game does not exist
    #[error("game {0} not found")]
    GameNotFound(i32),

    /// Cart line does not exist
    #[error("cart item {0} not found")]
    NotFound(i32),

    /// Zero or negative quantity; rejected, never treated as removal
    #[error("quantity must be greater than zero, got {0}")]
    InvalidQuantity(i32),

    /// Underlying store failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Cart line as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    /// Unique cart line ID
    pub id: i32,

    /// Owning user
    pub user_id: i32,

    /// Game in the cart
    pub game_id: i32,

    /// Number of copies; always positive
    pub quantity: i32,
}

/// Cart line joined with its game, as returned to display surfaces
///
/// `total_price` is derived (`price * quantity`) on every read and never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartLine {
    /// Unique cart line ID
    pub id: i32,

    /// Owning user
    pub user_id: i32,

    /// Game in the cart
    pub game_id: i32,

    /// Title of the game
    pub game_title: String,

    /// Unit price of the game
    pub price: Decimal,

    /// Number of copies
    pub quantity: i32,

    /// Derived line total
    pub total_price: Decimal,
}

impl CartItem {
    /// Adds a game to a user's cart, merging with an existing line
    ///
    /// If the (user, game) pair already has a line its quantity is increased
    /// by `quantity`; otherwise a new line is created. The lookup and the
    /// write are one upsert statement, so repeated or concurrent adds never
    /// produce a second row for the pair.
    pub async fn add(
        pool: &PgPool,
        user_id: i32,
        game_id: i32,
        quantity: i32,
    ) -> Result<Self, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if !User::exists(pool, user_id).await? {
            return Err(CartError::UserNotFound(user_id));
        }
        if !Game::exists(pool, game_id).await? {
            return Err(CartError::GameNotFound(game_id));
        }

        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart (user_id, game_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, game_id)
            DO UPDATE SET quantity = cart.quantity + EXCLUDED.quantity
            RETURNING cart_id AS id, user_id, game_id, quantity
            "#,
        )
        .bind(user_id)
        .bind(game_id)
        .bind(quantity)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Overwrites a line's quantity
    ///
    /// Zero and negative quantities are rejected with
    /// [`CartError::InvalidQuantity`], leaving the stored quantity unchanged;
    /// removal is its own operation.
    pub async fn update_quantity(
        pool: &PgPool,
        cart_id: i32,
        quantity: i32,
    ) -> Result<Self, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let item = sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart
            SET quantity = $2
            WHERE cart_id = $1
            RETURNING cart_id AS id, user_id, game_id, quantity
            "#,
        )
        .bind(cart_id)
        .bind(quantity)
        .fetch_optional(pool)
        .await?;

        item.ok_or(CartError::NotFound(cart_id))
    }

    /// Removes a single line
    pub async fn remove(pool: &PgPool, cart_id: i32) -> Result<(), CartError> {
        let result = sqlx::query("DELETE FROM cart WHERE cart_id = $1")
            .bind(cart_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::NotFound(cart_id));
        }

        Ok(())
    }

    /// Deletes every line of a user's cart
    ///
    /// Returns how many lines were removed; zero means the cart was already
    /// empty, which is a success, not an error.
    pub async fn clear(pool: &PgPool, user_id: i32) -> Result<u64, CartError> {
        let result = sqlx::query("DELETE FROM cart WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Fetches a user's cart joined with game data
    ///
    /// Each line carries its derived `total_price`. An empty result is
    /// returned as an empty vec; the HTTP layer reports that as not-found,
    /// distinct from a store failure.
    pub async fn cart_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<CartLine>, CartError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT c.cart_id AS id, c.user_id, c.game_id, g.title AS game_title,
                   g.price, c.quantity, g.price * c.quantity AS total_price
            FROM cart c
            JOIN games g ON g.game_id = c.game_id
            WHERE c.user_id = $1
            ORDER BY c.cart_id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(lines)
    }

    /// Sums the quantities across a user's cart
    ///
    /// Zero when the cart has no lines.
    pub async fn item_count(pool: &PgPool, user_id: i32) -> Result<i64, CartError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM cart WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
