/// Purchase model and the activation-key lifecycle
///
/// A purchase records that a user owns a game. At most one purchase row may
/// exist per (user, game) pair; the table enforces this with a unique
/// constraint, and the insert paths lean on that constraint so the duplicate
/// check and the insert are a single atomic statement rather than two racing
/// round trips.
///
/// # Key state machine
///
/// ```text
/// (issue)  → active → used        via activate_key
/// any      → active               via reissue_key (new key value)
/// revoked: no in-core transition into it; administrative only
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TABLE purchases (
///     purchase_id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
///     game_id INTEGER NOT NULL REFERENCES games(game_id) ON DELETE CASCADE,
///     purchase_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     activation_key CHAR(16) NOT NULL,
///     key_status key_status NOT NULL DEFAULT 'active',
///     UNIQUE (user_id, game_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use thiserror::Error;

use crate::keygen;
use crate::models::{game::Game, user::User};

/// Default window for `recent_by_user`
pub const DEFAULT_RECENT_COUNT: i64 = 5;

/// Lifecycle state of a purchase's activation key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "key_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    /// Key has been issued and not yet redeemed
    Active,

    /// Key has been redeemed
    Used,

    /// Key has been invalidated administratively
    Revoked,
}

impl KeyStatus {
    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStatus::Active => "active",
            KeyStatus::Used => "used",
            KeyStatus::Revoked => "revoked",
        }
    }

    /// Parses a wire string into a status
    ///
    /// Returns `None` for anything outside the three members; callers turn
    /// that into a bad-request rejection so a typo'd status never reaches a
    /// query.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(KeyStatus::Active),
            "used" => Some(KeyStatus::Used),
            "revoked" => Some(KeyStatus::Revoked),
            _ => None,
        }
    }

    /// Whether a key in this state can be redeemed
    pub fn can_activate(&self) -> bool {
        matches!(self, KeyStatus::Active)
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures from purchase operations
///
/// The HTTP layer maps these onto the response taxonomy: the not-found
/// variants to 404, `WrongKey` to 400, and the two state/uniqueness
/// violations to 409.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// Referenced user does not exist
    #[error("user {0} not found")]
    UserNotFound(i32),

    /// Referenced game does not exist
    #[error("game {0} not found")]
    GameNotFound(i32),

    /// The (user, game) pair already has a purchase row
    #[error("game {game_id} already purchased by user {user_id}")]
    AlreadyPurchased { user_id: i32, game_id: i32 },

    /// Purchase row does not exist
    #[error("purchase {0} not found")]
    NotFound(i32),

    /// Supplied key does not match the stored activation key
    #[error("activation key does not match")]
    WrongKey,

    /// Key is not in the `active` state; carries the current state so the
    /// response can surface it
    #[error("activation key is '{0}', not 'active'")]
    KeyNotActive(KeyStatus),

    /// Underlying store failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Purchase model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Purchase {
    /// Unique purchase ID
    pub id: i32,

    /// Buyer
    pub user_id: i32,

    /// Purchased game
    pub game_id: i32,

    /// When the purchase happened (UTC)
    pub purchase_date: DateTime<Utc>,

    /// 16-character activation key
    pub activation_key: String,

    /// Current key lifecycle state
    pub key_status: KeyStatus,
}

/// Purchase joined with the game title, for display surfaces
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PurchaseWithGame {
    /// Unique purchase ID
    pub id: i32,

    /// Buyer
    pub user_id: i32,

    /// Purchased game
    pub game_id: i32,

    /// Title of the purchased game
    pub game_title: String,

    /// When the purchase happened (UTC)
    pub purchase_date: DateTime<Utc>,

    /// 16-character activation key
    pub activation_key: String,

    /// Current key lifecycle state
    pub key_status: KeyStatus,
}

/// Input for the administrative `record` operation
///
/// Unlike `buy`, the date is caller-supplied and the key may be too; a key is
/// generated when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPurchase {
    /// Buyer
    pub user_id: i32,

    /// Purchased game
    pub game_id: i32,

    /// Externally supplied purchase date
    pub purchase_date: DateTime<Utc>,

    /// Externally supplied activation key; generated when `None`
    pub activation_key: Option<String>,
}

const PURCHASE_COLUMNS: &str =
    "purchase_id AS id, user_id, game_id, purchase_date, activation_key, key_status";

impl Purchase {
    /// Buys a game for a user (the "Buy" button)
    ///
    /// Verifies both ids resolve, then inserts with `ON CONFLICT DO NOTHING`
    /// so the duplicate-pair check and the insert are one atomic statement:
    /// of two concurrent buys for the same pair, exactly one row is created
    /// and the loser sees [`PurchaseError::AlreadyPurchased`]. A fresh
    /// activation key is issued with `key_status = active` and
    /// `purchase_date = now()`.
    pub async fn buy(pool: &PgPool, user_id: i32, game_id: i32) -> Result<Self, PurchaseError> {
        if !User::exists(pool, user_id).await? {
            return Err(PurchaseError::UserNotFound(user_id));
        }
        if !Game::exists(pool, game_id).await? {
            return Err(PurchaseError::GameNotFound(game_id));
        }

        let key = keygen::generate_key();

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (user_id, game_id, purchase_date, activation_key, key_status)
            VALUES ($1, $2, NOW(), $3, 'active')
            ON CONFLICT (user_id, game_id) DO NOTHING
            RETURNING purchase_id AS id, user_id, game_id, purchase_date, activation_key, key_status
            "#,
        )
        .bind(user_id)
        .bind(game_id)
        .bind(&key)
        .fetch_optional(pool)
        .await?;

        purchase.ok_or(PurchaseError::AlreadyPurchased { user_id, game_id })
    }

    /// Records a purchase with an externally supplied date and, optionally,
    /// key (administrative variant of [`Purchase::buy`])
    ///
    /// Same atomic duplicate-pair rejection as `buy`.
    pub async fn record(pool: &PgPool, data: RecordPurchase) -> Result<Self, PurchaseError> {
        if !User::exists(pool, data.user_id).await? {
            return Err(PurchaseError::UserNotFound(data.user_id));
        }
        if !Game::exists(pool, data.game_id).await? {
            return Err(PurchaseError::GameNotFound(data.game_id));
        }

        let key = data.activation_key.unwrap_or_else(keygen::generate_key);

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (user_id, game_id, purchase_date, activation_key, key_status)
            VALUES ($1, $2, $3, $4, 'active')
            ON CONFLICT (user_id, game_id) DO NOTHING
            RETURNING purchase_id AS id, user_id, game_id, purchase_date, activation_key, key_status
            "#,
        )
        .bind(data.user_id)
        .bind(data.game_id)
        .bind(data.purchase_date)
        .bind(&key)
        .fetch_optional(pool)
        .await?;

        purchase.ok_or(PurchaseError::AlreadyPurchased {
            user_id: data.user_id,
            game_id: data.game_id,
        })
    }

    /// Redeems an activation key (`active → used`)
    ///
    /// Runs inside a transaction with the row locked (`FOR UPDATE`) so the
    /// key comparison, the status check, and the transition are one unit:
    /// two concurrent redeems of the same key serialize, and the second sees
    /// `used` and fails. Failing paths roll back by dropping the transaction.
    pub async fn activate_key(
        pool: &PgPool,
        purchase_id: i32,
        supplied_key: &str,
    ) -> Result<Self, PurchaseError> {
        let mut tx = pool.begin().await?;

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT purchase_id AS id, user_id, game_id, purchase_date, activation_key, key_status
            FROM purchases
            WHERE purchase_id = $1
            FOR UPDATE
            "#,
        )
        .bind(purchase_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(PurchaseError::NotFound(purchase_id))?;

        if purchase.activation_key != supplied_key {
            return Err(PurchaseError::WrongKey);
        }
        if !purchase.key_status.can_activate() {
            return Err(PurchaseError::KeyNotActive(purchase.key_status));
        }

        let updated = sqlx::query_as::<_, Purchase>(
            r#"
            UPDATE purchases
            SET key_status = 'used'
            WHERE purchase_id = $1
            RETURNING purchase_id AS id, user_id, game_id, purchase_date, activation_key, key_status
            "#,
        )
        .bind(purchase_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Issues a replacement activation key
    ///
    /// Resets `key_status` to `active` from any prior state (including `used`
    /// and `revoked`; reissue is an intentional reset) and stores a freshly
    /// generated key. Returns the updated row; the new key is in
    /// `activation_key`.
    pub async fn reissue_key(pool: &PgPool, purchase_id: i32) -> Result<Self, PurchaseError> {
        let key = keygen::generate_key();

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            UPDATE purchases
            SET activation_key = $2, key_status = 'active'
            WHERE purchase_id = $1
            RETURNING purchase_id AS id, user_id, game_id, purchase_date, activation_key, key_status
            "#,
        )
        .bind(purchase_id)
        .bind(&key)
        .fetch_optional(pool)
        .await?;

        purchase.ok_or(PurchaseError::NotFound(purchase_id))
    }

    /// Lists every purchase
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, PurchaseError> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases ORDER BY purchase_id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(purchases)
    }

    /// Lists a user's purchases
    pub async fn list_by_user(pool: &PgPool, user_id: i32) -> Result<Vec<Self>, PurchaseError> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE user_id = $1 ORDER BY purchase_date DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(purchases)
    }

    /// Lists a user's purchases joined with game titles, for display
    pub async fn list_by_user_with_titles(
        pool: &PgPool,
        user_id: i32,
    ) -> Result<Vec<PurchaseWithGame>, PurchaseError> {
        let purchases = sqlx::query_as::<_, PurchaseWithGame>(
            r#"
            SELECT p.purchase_id AS id, p.user_id, p.game_id, g.title AS game_title,
                   p.purchase_date, p.activation_key, p.key_status
            FROM purchases p
            JOIN games g ON g.game_id = p.game_id
            WHERE p.user_id = $1
            ORDER BY p.purchase_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(purchases)
    }

    /// Finds a purchase by ID
    pub async fn find_by_id(pool: &PgPool, purchase_id: i32) -> Result<Option<Self>, PurchaseError> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE purchase_id = $1"
        ))
        .bind(purchase_id)
        .fetch_optional(pool)
        .await?;

        Ok(purchase)
    }

    /// Finds a purchase by ID joined with the game title
    pub async fn find_by_id_with_title(
        pool: &PgPool,
        purchase_id: i32,
    ) -> Result<Option<PurchaseWithGame>, PurchaseError> {
        let purchase = sqlx::query_as::<_, PurchaseWithGame>(
            r#"
            SELECT p.purchase_id AS id, p.user_id, p.game_id, g.title AS game_title,
                   p.purchase_date, p.activation_key, p.key_status
            FROM purchases p
            JOIN games g ON g.game_id = p.game_id
            WHERE p.purchase_id = $1
            "#,
        )
        .bind(purchase_id)
        .fetch_optional(pool)
        .await?;

        Ok(purchase)
    }

    /// Lists purchases whose key is in the given state
    pub async fn list_by_status(
        pool: &PgPool,
        status: KeyStatus,
    ) -> Result<Vec<Self>, PurchaseError> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE key_status = $1 ORDER BY purchase_date DESC"
        ))
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(purchases)
    }

    /// Lists a user's most recent purchases, newest first
    ///
    /// `count` falls back to [`DEFAULT_RECENT_COUNT`] when not positive.
    pub async fn recent_by_user(
        pool: &PgPool,
        user_id: i32,
        count: i64,
    ) -> Result<Vec<Self>, PurchaseError> {
        let limit = if count > 0 { count } else { DEFAULT_RECENT_COUNT };

        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE user_id = $1 \
             ORDER BY purchase_date DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(purchases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_status_as_str() {
        assert_eq!(KeyStatus::Active.as_str(), "active");
        assert_eq!(KeyStatus::Used.as_str(), "used");
        assert_eq!(KeyStatus::Revoked.as_str(), "revoked");
    }

    #[test]
    fn test_key_status_parse() {
        assert_eq!(KeyStatus::parse("active"), Some(KeyStatus::Active));
        assert_eq!(KeyStatus::parse("used"), Some(KeyStatus::Used));
        assert_eq!(KeyStatus::parse("revoked"), Some(KeyStatus::Revoked));
        assert_eq!(KeyStatus::parse("expired"), None);
        assert_eq!(KeyStatus::parse("Active"), None);
        assert_eq!(KeyStatus::parse(""), None);
    }

    #[test]
    fn test_key_status_can_activate() {
        assert!(KeyStatus::Active.can_activate());
        assert!(!KeyStatus::Used.can_activate());
        assert!(!KeyStatus::Revoked.can_activate());
    }

    #[test]
    fn test_key_not_active_error_surfaces_status() {
        let err = PurchaseError::KeyNotActive(KeyStatus::Used);
        assert!(err.to_string().contains("used"));

        let err = PurchaseError::KeyNotActive(KeyStatus::Revoked);
        assert!(err.to_string().contains("revoked"));
    }

    #[test]
    fn test_key_status_serde_round_trip() {
        let json = serde_json::to_string(&KeyStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
        let back: KeyStatus = serde_json::from_str("\"revoked\"").unwrap();
        assert_eq!(back, KeyStatus::Revoked);
    }
}
