/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts to
/// the appropriate HTTP status code.
///
/// Domain failures keep their specific kind (not-found, bad-request,
/// conflict); anything unexpected from the store or the assistant upstream
/// collapses into a generic 500/503 with the detail logged, never echoed to
/// the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gameshop_shared::models::{cart::CartError, purchase::PurchaseError};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assistant::AssistantError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed or policy-violating input
    BadRequest(String),

    /// Not found (404) - referenced id absent
    NotFound(String),

    /// Conflict (409) - state or uniqueness violation
    Conflict(String),

    /// Payload validation failures (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503) - assistant upstream not reachable/configured
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "conflict")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Builds a `ValidationError` from `validator` output
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Row-not-found becomes 404; an anticipated unique-constraint violation
/// becomes 409; everything else is an internal failure.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert purchase domain errors to API errors
impl From<PurchaseError> for ApiError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::UserNotFound(_)
            | PurchaseError::GameNotFound(_)
            | PurchaseError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PurchaseError::AlreadyPurchased { .. } => ApiError::Conflict(err.to_string()),
            PurchaseError::WrongKey => ApiError::BadRequest(err.to_string()),
            PurchaseError::KeyNotActive(_) => ApiError::Conflict(err.to_string()),
            PurchaseError::Database(e) => ApiError::from(e),
        }
    }
}

/// Convert cart domain errors to API errors
///
/// Unlike the purchase surface, missing user/game ids on the cart surface
/// are reported as bad requests.
impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::UserNotFound(_) | CartError::GameNotFound(_) => {
                ApiError::BadRequest(err.to_string())
            }
            CartError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CartError::InvalidQuantity(_) => ApiError::BadRequest(err.to_string()),
            CartError::Database(e) => ApiError::from(e),
        }
    }
}

/// Convert assistant client errors to API errors
impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::NotConfigured => ApiError::ServiceUnavailable(err.to_string()),
            AssistantError::Request(_)
            | AssistantError::UpstreamStatus(_)
            | AssistantError::EmptyResponse => {
                tracing::error!("Assistant upstream failure: {}", err);
                ApiError::ServiceUnavailable("Assistant is currently unavailable".to_string())
            }
        }
    }
}
