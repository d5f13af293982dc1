/// Stored chat message endpoints

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use gameshop_shared::models::{message::Message, user::User};
use serde::Deserialize;
use validator::Validate;

/// Message submission payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddMessageRequest {
    /// Author
    pub user_id: i32,

    /// Message body
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub message_text: String,

    /// Whether the author is a guest
    #[serde(default)]
    pub is_from_guest: bool,
}

/// List every stored message
pub async fn list_messages(State(state): State<AppState>) -> ApiResult<Json<Vec<Message>>> {
    let messages = Message::list_all(&state.db).await?;
    Ok(Json(messages))
}

/// Store a message
///
/// # Errors
///
/// - 400: user does not exist, or the body fails validation
pub async fn add_message(
    State(state): State<AppState>,
    Json(req): Json<AddMessageRequest>,
) -> ApiResult<Json<Message>> {
    req.validate().map_err(ApiError::from_validation)?;

    if !User::exists(&state.db, req.user_id).await? {
        return Err(ApiError::BadRequest(format!("user {} not found", req.user_id)));
    }

    let message =
        Message::create(&state.db, req.user_id, &req.message_text, req.is_from_guest).await?;

    Ok(Json(message))
}
