/// Common test utilities for integration tests
///
/// These tests require a running PostgreSQL database reachable through
/// `DATABASE_URL`; when the variable is unset every test skips itself.
/// Each context seeds its own user and game with unique names so tests can
/// run concurrently against one database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use gameshop_api::app::{build_router, AppState};
use gameshop_api::config::Config;
use gameshop_shared::models::game::{Game, GameData};
use gameshop_shared::models::user::{CreateUser, User};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::Service as _;

static SEQ: AtomicU32 = AtomicU32::new(0);

/// Unique suffix for fixture names
fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", nanos, seq)
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub game: Game,
}

impl TestContext {
    /// Creates a new test context with a fresh user and game
    ///
    /// Returns `None` when `DATABASE_URL` is not set so tests can skip.
    pub async fn new() -> anyhow::Result<Option<Self>> {
        if std::env::var("DATABASE_URL").is_err() {
            return Ok(None);
        }

        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = User::create(
            &db,
            CreateUser {
                login: format!("test-user-{}", unique_suffix()),
                email: "test@example.com".to_string(),
                password: "test-password".to_string(),
                created_at: None,
                is_guest: false,
            },
        )
        .await?;

        let game = Game::create(
            &db,
            GameData {
                title: format!("Test Game {}", unique_suffix()),
                description: "A game for testing".to_string(),
                price: Decimal::new(1999, 2),
                release_date: Utc::now(),
                developer: "Test Studio".to_string(),
                publisher: "Test Publisher".to_string(),
                age_rating: "PEGI 12".to_string(),
            },
        )
        .await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext { db, app, user, game }))
    }

    /// Seeds an additional game with a unique title
    pub async fn create_game(&self, title_prefix: &str) -> anyhow::Result<Game> {
        let game = Game::create(
            &self.db,
            GameData {
                title: format!("{} {}", title_prefix, unique_suffix()),
                description: String::new(),
                price: Decimal::new(4999, 2),
                release_date: Utc::now(),
                developer: String::new(),
                publisher: String::new(),
                age_rating: String::new(),
            },
        )
        .await?;

        Ok(game)
    }

    /// Cleans up test data
    ///
    /// Deleting the user cascades to purchases, cart lines, reviews, and
    /// messages; each seeded game is deleted by the caller's fixtures here.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Game::delete(&self.db, self.game.id).await?;
        Ok(())
    }
}

/// Sends a JSON request and returns (status, parsed body)
pub async fn send_json(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Counts purchase rows for a (user, game) pair straight from the store
pub async fn purchase_row_count(db: &PgPool, user_id: i32, game_id: i32) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM purchases WHERE user_id = $1 AND game_id = $2")
            .bind(user_id)
            .bind(game_id)
            .fetch_one(db)
            .await
            .unwrap();
    count
}

/// Counts cart rows for a (user, game) pair straight from the store
pub async fn cart_row_count(db: &PgPool, user_id: i32, game_id: i32) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM cart WHERE user_id = $1 AND game_id = $2")
            .bind(user_id)
            .bind(game_id)
            .fetch_one(db)
            .await
            .unwrap();
    count
}
