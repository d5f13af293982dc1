/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// Handlers are stateless between requests: the state they clone holds only
/// the connection pool, configuration, and the assistant client, so every
/// invariant check happens against the store.

use crate::{assistant::AssistantClient, config::Config};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Chat-completion client
    pub assistant: Arc<AssistantClient>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let assistant = AssistantClient::new(config.assistant.clone());
        Self {
            db,
            config: Arc::new(config),
            assistant: Arc::new(assistant),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                               # Health check
/// └── /v1/
///     ├── /purchases/                       # Purchase + activation-key lifecycle
///     │   ├── GET    /                      # List all purchases
///     │   ├── POST   /                      # Record a purchase (admin)
///     │   ├── POST   /buy                   # Buy a game
///     │   ├── GET    /status/{status}       # Filter by key status
///     │   ├── GET    /user/{id}             # A user's purchases
///     │   ├── GET    /user/{id}/recent      # Most recent N (default 5)
///     │   ├── GET    /{id}                  # One purchase
///     │   ├── POST   /{id}/activate         # Redeem the activation key
///     │   └── POST   /{id}/reissue          # Issue a replacement key
///     ├── /cart/                            # Cart with merge-on-add semantics
///     │   ├── POST   /items                 # Add (or merge) a line
///     │   ├── PUT    /items/{id}            # Overwrite a line's quantity
///     │   ├── DELETE /items/{id}            # Remove a line
///     │   ├── GET    /user/{id}             # The user's cart with totals
///     │   ├── DELETE /user/{id}             # Clear the user's cart
///     │   └── GET    /user/{id}/count       # Summed quantity
///     ├── /games, /genres, /game-genres     # Catalog maintenance
///     ├── /users                            # Registration / profile
///     ├── /reviews, /messages               # Reviews and stored chat
///     └── /assistant/chat                   # Forward a message to the AI assistant
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let purchase_routes = Router::new()
        .route(
            "/",
            get(routes::purchases::list_purchases).post(routes::purchases::record_purchase),
        )
        .route("/buy", post(routes::purchases::buy_game))
        .route("/status/:status", get(routes::purchases::purchases_by_status))
        .route("/user/:user_id", get(routes::purchases::user_purchases))
        .route(
            "/user/:user_id/recent",
            get(routes::purchases::recent_purchases),
        )
        .route("/:purchase_id", get(routes::purchases::get_purchase))
        .route(
            "/:purchase_id/activate",
            post(routes::purchases::activate_key),
        )
        .route("/:purchase_id/reissue", post(routes::purchases::reissue_key));

    let cart_routes = Router::new()
        .route("/items", post(routes::cart::add_to_cart))
        .route(
            "/items/:cart_id",
            put(routes::cart::update_quantity).delete(routes::cart::remove_from_cart),
        )
        .route(
            "/user/:user_id",
            get(routes::cart::get_user_cart).delete(routes::cart::clear_cart),
        )
        .route("/user/:user_id/count", get(routes::cart::cart_items_count));

    let game_routes = Router::new()
        .route(
            "/",
            get(routes::games::list_games)
                .post(routes::games::add_game)
                .delete(routes::games::delete_all_games),
        )
        .route(
            "/:game_id",
            get(routes::games::get_game)
                .put(routes::games::update_game)
                .delete(routes::games::delete_game),
        );

    let genre_routes = Router::new()
        .route(
            "/",
            get(routes::genres::list_genres).post(routes::genres::add_genre),
        )
        .route(
            "/:genre_id",
            get(routes::genres::get_genre).delete(routes::genres::delete_genre),
        );

    let game_genre_routes = Router::new()
        .route(
            "/",
            get(routes::game_genres::list_game_genres)
                .post(routes::game_genres::add_game_genre)
                .delete(routes::game_genres::delete_by_pair),
        )
        .route(
            "/:id",
            put(routes::game_genres::update_game_genre)
                .delete(routes::game_genres::delete_game_genre),
        );

    let user_routes = Router::new()
        .route("/register", post(routes::users::register))
        .route("/login", post(routes::users::login))
        .route(
            "/:user_id",
            put(routes::users::update_user).delete(routes::users::delete_user),
        );

    let review_routes = Router::new().route(
        "/",
        get(routes::reviews::list_reviews).post(routes::reviews::add_review),
    );

    let message_routes = Router::new().route(
        "/",
        get(routes::messages::list_messages).post(routes::messages::add_message),
    );

    let assistant_routes = Router::new().route("/chat", post(routes::assistant::chat));

    let v1_routes = Router::new()
        .nest("/purchases", purchase_routes)
        .nest("/cart", cart_routes)
        .nest("/games", game_routes)
        .nest("/genres", genre_routes)
        .nest("/game-genres", game_genre_routes)
        .nest("/users", user_routes)
        .nest("/reviews", review_routes)
        .nest("/messages", message_routes)
        .nest("/assistant", assistant_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
