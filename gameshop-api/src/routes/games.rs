/// Game catalog endpoints
///
/// Straight CRUD over the catalog; title uniqueness is enforced by the
/// store and surfaces as a 409.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use gameshop_shared::models::game::{Game, GameData};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create/update payload for a catalog entry
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GameRequest {
    /// Title; unique across the catalog
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Store-page description
    #[serde(default)]
    pub description: String,

    /// Unit price
    pub price: Decimal,

    /// Release date
    pub release_date: DateTime<Utc>,

    /// Developer studio
    #[serde(default)]
    pub developer: String,

    /// Publisher
    #[serde(default)]
    pub publisher: String,

    /// Age rating label
    #[serde(default)]
    pub age_rating: String,
}

impl From<GameRequest> for GameData {
    fn from(req: GameRequest) -> Self {
        GameData {
            title: req.title,
            description: req.description,
            price: req.price,
            release_date: req.release_date,
            developer: req.developer,
            publisher: req.publisher,
            age_rating: req.age_rating,
        }
    }
}

/// Bulk-delete confirmation
#[derive(Debug, Clone, Serialize)]
pub struct DeleteAllGamesResponse {
    /// How many catalog entries were removed
    pub removed: u64,
}

/// List the whole catalog
pub async fn list_games(State(state): State<AppState>) -> ApiResult<Json<Vec<Game>>> {
    let games = Game::list_all(&state.db).await?;
    Ok(Json(games))
}

/// One catalog entry
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
) -> ApiResult<Json<Game>> {
    let game = Game::find_by_id(&state.db, game_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))?;

    Ok(Json(game))
}

/// Add a game to the catalog
///
/// # Errors
///
/// - 409: a game with this title already exists
pub async fn add_game(
    State(state): State<AppState>,
    Json(req): Json<GameRequest>,
) -> ApiResult<Json<Game>> {
    req.validate().map_err(ApiError::from_validation)?;

    let game = Game::create(&state.db, req.into()).await?;

    tracing::info!(game_id = game.id, title = %game.title, "Game added to catalog");

    Ok(Json(game))
}

/// Replace a catalog entry
pub async fn update_game(
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
    Json(req): Json<GameRequest>,
) -> ApiResult<Json<Game>> {
    req.validate().map_err(ApiError::from_validation)?;

    let game = Game::update(&state.db, game_id, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))?;

    Ok(Json(game))
}

/// Delete a catalog entry
pub async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    if !Game::delete(&state.db, game_id).await? {
        return Err(ApiError::NotFound("Game not found".to_string()));
    }

    tracing::info!(game_id, "Game deleted");

    Ok(Json(serde_json::json!({ "game_id": game_id, "deleted": true })))
}

/// Empty the catalog (administrative)
pub async fn delete_all_games(
    State(state): State<AppState>,
) -> ApiResult<Json<DeleteAllGamesResponse>> {
    let removed = Game::delete_all(&state.db).await?;

    tracing::warn!(removed, "Catalog emptied");

    Ok(Json(DeleteAllGamesResponse { removed }))
}
