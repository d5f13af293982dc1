/// Review endpoints

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use gameshop_shared::models::{game::Game, review::Review, user::User};
use serde::Deserialize;
use validator::Validate;

/// Review submission payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddReviewRequest {
    /// Author
    pub user_id: i32,

    /// Reviewed game
    pub game_id: i32,

    /// Review body
    #[validate(length(min = 1, max = 10000, message = "Review must be 1-10000 characters"))]
    pub review_text: String,
}

/// List every review
pub async fn list_reviews(State(state): State<AppState>) -> ApiResult<Json<Vec<Review>>> {
    let reviews = Review::list_all(&state.db).await?;
    Ok(Json(reviews))
}

/// Post a review
///
/// # Errors
///
/// - 400: user or game does not exist, or the body fails validation
pub async fn add_review(
    State(state): State<AppState>,
    Json(req): Json<AddReviewRequest>,
) -> ApiResult<Json<Review>> {
    req.validate().map_err(ApiError::from_validation)?;

    if !User::exists(&state.db, req.user_id).await? {
        return Err(ApiError::BadRequest(format!("user {} not found", req.user_id)));
    }
    if !Game::exists(&state.db, req.game_id).await? {
        return Err(ApiError::BadRequest(format!("game {} not found", req.game_id)));
    }

    let review = Review::create(&state.db, req.user_id, req.game_id, &req.review_text).await?;

    tracing::info!(review_id = review.id, game_id = review.game_id, "Review posted");

    Ok(Json(review))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_review_request_validation() {
        let valid = AddReviewRequest {
            user_id: 1,
            game_id: 7,
            review_text: "Great game".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = AddReviewRequest {
            review_text: String::new(),
            ..valid
        };
        assert!(empty.validate().is_err());
    }
}
