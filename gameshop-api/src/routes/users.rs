/// User account endpoints
///
/// Registration, login, and profile maintenance. Session security is an
/// external concern in this system: payloads carry raw credentials and login
/// is a direct comparison against the stored secret, as the store front-end
/// expects.
///
/// # Endpoints
///
/// - `POST   /v1/users/register` - create an account
/// - `POST   /v1/users/login` - check credentials
/// - `PUT    /v1/users/{id}` - update login/email
/// - `DELETE /v1/users/{id}` - delete the account

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use gameshop_shared::models::user::{CreateUser, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name; unique
    #[validate(length(min = 1, max = 100, message = "Login must be 1-100 characters"))]
    pub login: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Credential secret
    #[validate(length(min = 1, max = 255, message = "Password must be 1-255 characters"))]
    pub password: String,

    /// Account creation timestamp; defaults to now
    pub created_at: Option<DateTime<Utc>>,

    /// Guest flag
    #[serde(default)]
    pub is_guest: bool,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub login: String,

    /// Credential secret
    pub password: String,
}

/// Login confirmation
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user
    pub user_id: i32,

    /// Login name
    pub login: String,

    /// Account role
    pub role: String,
}

/// Profile update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New login name
    #[validate(length(min = 1, max = 100, message = "Login must be 1-100 characters"))]
    pub login: String,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Create an account
///
/// # Errors
///
/// - 409: the login is already taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<User>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::create(
        &state.db,
        CreateUser {
            login: req.login,
            email: req.email,
            password: req.password,
            created_at: req.created_at,
            is_guest: req.is_guest,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, login = %user.login, "User registered");

    Ok(Json(user))
}

/// Check credentials
///
/// # Errors
///
/// - 404: no user with this login
/// - 400: the password does not match
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = User::find_by_login(&state.db, &req.login)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.password != req.password {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        user_id: user.id,
        login: user.login,
        role: user.role,
    }))
}

/// Update login and email
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::update_profile(&state.db, user_id, &req.login, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Delete the account; purchases, cart lines, reviews, and messages cascade
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    if !User::delete(&state.db, user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id, "User deleted");

    Ok(Json(serde_json::json!({ "user_id": user_id, "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            login: "vova".to_string(),
            email: "vova@example.com".to_string(),
            password: "hunter2".to_string(),
            created_at: None,
            is_guest: false,
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let empty_login = RegisterRequest {
            login: String::new(),
            ..valid
        };
        assert!(empty_login.validate().is_err());
    }
}
