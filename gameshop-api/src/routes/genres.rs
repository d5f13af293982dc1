/// Genre catalog endpoints

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use gameshop_shared::models::genre::Genre;
use serde::Deserialize;
use validator::Validate;

/// Genre creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddGenreRequest {
    /// Genre name; unique
    #[validate(length(min = 1, max = 100, message = "Genre name must be 1-100 characters"))]
    pub name: String,
}

/// List all genres
pub async fn list_genres(State(state): State<AppState>) -> ApiResult<Json<Vec<Genre>>> {
    let genres = Genre::list_all(&state.db).await?;
    Ok(Json(genres))
}

/// One genre
pub async fn get_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<i32>,
) -> ApiResult<Json<Genre>> {
    let genre = Genre::find_by_id(&state.db, genre_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Genre not found".to_string()))?;

    Ok(Json(genre))
}

/// Add a genre
///
/// # Errors
///
/// - 409: a genre with this name already exists
pub async fn add_genre(
    State(state): State<AppState>,
    Json(req): Json<AddGenreRequest>,
) -> ApiResult<Json<Genre>> {
    req.validate().map_err(ApiError::from_validation)?;

    let genre = Genre::create(&state.db, &req.name).await?;

    tracing::info!(genre_id = genre.id, name = %genre.name, "Genre added");

    Ok(Json(genre))
}

/// Delete a genre; game links cascade
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    if !Genre::delete(&state.db, genre_id).await? {
        return Err(ApiError::NotFound("Genre not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "genre_id": genre_id, "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_genre_request_validation() {
        assert!(AddGenreRequest { name: "RPG".to_string() }.validate().is_ok());
        assert!(AddGenreRequest { name: String::new() }.validate().is_err());
        assert!(AddGenreRequest { name: "g".repeat(101) }.validate().is_err());
    }
}
