/// Game-genre link endpoints
///
/// Links a catalog entry to a genre; the (game, genre) pair is unique and a
/// duplicate link surfaces as a 409.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use gameshop_shared::models::game_genre::GameGenre;
use serde::Deserialize;

/// Link payload (create, update, delete-by-pair)
#[derive(Debug, Clone, Deserialize)]
pub struct GameGenreRequest {
    /// Linked game
    pub game_id: i32,

    /// Linked genre
    pub genre_id: i32,
}

/// List all links
pub async fn list_game_genres(State(state): State<AppState>) -> ApiResult<Json<Vec<GameGenre>>> {
    let links = GameGenre::list_all(&state.db).await?;
    Ok(Json(links))
}

/// Link a game to a genre
///
/// # Errors
///
/// - 409: the pair is already linked (or a referenced id is absent; both
///   surface from the store's constraints)
pub async fn add_game_genre(
    State(state): State<AppState>,
    Json(req): Json<GameGenreRequest>,
) -> ApiResult<Json<GameGenre>> {
    let link = GameGenre::create(&state.db, req.game_id, req.genre_id).await?;

    tracing::info!(id = link.id, game_id = link.game_id, genre_id = link.genre_id, "Genre linked");

    Ok(Json(link))
}

/// Repoint a link at a different pair
pub async fn update_game_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<GameGenreRequest>,
) -> ApiResult<Json<GameGenre>> {
    let link = GameGenre::update(&state.db, id, req.game_id, req.genre_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Game-genre link not found".to_string()))?;

    Ok(Json(link))
}

/// Delete a link by ID
pub async fn delete_game_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    if !GameGenre::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Game-genre link not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

/// Delete a link by its (game, genre) pair
pub async fn delete_by_pair(
    State(state): State<AppState>,
    Json(req): Json<GameGenreRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if !GameGenre::delete_by_pair(&state.db, req.game_id, req.genre_id).await? {
        return Err(ApiError::NotFound("Game-genre link not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "game_id": req.game_id,
        "genre_id": req.genre_id,
        "deleted": true
    })))
}
