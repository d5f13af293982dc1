/// Assistant chat endpoint
///
/// Forwards one user message to the external chat-completion API and
/// returns the reply. When a `user_id` is supplied both sides of the
/// exchange are stored in `messages`; anonymous chats are forwarded without
/// being recorded.
///
/// # Endpoint
///
/// `POST /v1/assistant/chat`
///
/// # Example Request
///
/// ```json
/// {
///   "message": "Recommend me a strategy game under $20",
///   "user_id": 12
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "reply": "Try Starfall Tactics — it's $14.99 in our catalog."
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use gameshop_shared::models::{message::Message, user::User};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Chat request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatRequest {
    /// User message to forward
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub message: String,

    /// When present, the exchange is stored under this user
    pub user_id: Option<i32>,
}

/// Chat response
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// Assistant reply text
    pub reply: String,
}

/// Forward a chat message to the assistant
///
/// # Errors
///
/// - 400: empty/oversized message, or an unknown `user_id`
/// - 503: assistant not configured or upstream unreachable
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    // Resolve the user first so a bad id fails before the upstream call.
    let user = match req.user_id {
        Some(user_id) => Some(
            User::find_by_id(&state.db, user_id)
                .await?
                .ok_or_else(|| ApiError::BadRequest(format!("user {} not found", user_id)))?,
        ),
        None => None,
    };

    let reply = state.assistant.get_response(&req.message).await?;

    if let Some(user) = user {
        Message::create(&state.db, user.id, &req.message, user.is_guest).await?;
        Message::create(&state.db, user.id, &reply, false).await?;
    }

    Ok(Json(ChatResponse { reply }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_validation() {
        let valid = ChatRequest {
            message: "hello".to_string(),
            user_id: None,
        };
        assert!(valid.validate().is_ok());

        let empty = ChatRequest {
            message: String::new(),
            user_id: None,
        };
        assert!(empty.validate().is_err());

        let oversized = ChatRequest {
            message: "x".repeat(4001),
            user_id: Some(1),
        };
        assert!(oversized.validate().is_err());
    }
}
