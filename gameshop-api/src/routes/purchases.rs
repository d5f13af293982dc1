/// Purchase endpoints
///
/// This is the write-heavy half of the store's core: buying a game,
/// recording a purchase administratively, and walking an activation key
/// through its lifecycle. Duplicate purchases are rejected with a 409 and
/// the store is left untouched; the atomicity lives in the model layer.
///
/// # Endpoints
///
/// - `POST /v1/purchases/buy` - buy a game for a user
/// - `POST /v1/purchases` - record a purchase with a supplied date/key
/// - `POST /v1/purchases/{id}/activate` - redeem the activation key
/// - `POST /v1/purchases/{id}/reissue` - issue a replacement key
/// - `GET  /v1/purchases` - list all purchases
/// - `GET  /v1/purchases/{id}` - one purchase, joined with its game title
/// - `GET  /v1/purchases/status/{status}` - filter by key status
/// - `GET  /v1/purchases/user/{id}` - a user's purchases with titles
/// - `GET  /v1/purchases/user/{id}/recent?count=5` - most recent N

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use gameshop_shared::models::purchase::{
    KeyStatus, Purchase, PurchaseWithGame, RecordPurchase, DEFAULT_RECENT_COUNT,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Buy request (the "Buy" button)
#[derive(Debug, Clone, Deserialize)]
pub struct BuyGameRequest {
    /// Buyer
    pub user_id: i32,

    /// Game to buy
    pub game_id: i32,
}

/// Administrative record-purchase request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordPurchaseRequest {
    /// Buyer
    pub user_id: i32,

    /// Purchased game
    pub game_id: i32,

    /// Externally supplied purchase date
    pub purchase_date: DateTime<Utc>,

    /// Externally supplied key; generated when omitted
    #[validate(length(equal = 16, message = "Activation key must be 16 characters"))]
    pub activation_key: Option<String>,
}

/// Key redemption request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivateKeyRequest {
    /// Key the client is presenting
    #[validate(length(equal = 16, message = "Activation key must be 16 characters"))]
    pub activation_key: String,
}

/// Key redemption confirmation
#[derive(Debug, Clone, Serialize)]
pub struct ActivateKeyResponse {
    /// Redeemed purchase
    pub purchase_id: i32,

    /// State after redemption (always `used`)
    pub key_status: KeyStatus,
}

/// Replacement-key response
#[derive(Debug, Clone, Serialize)]
pub struct ReissueKeyResponse {
    /// Purchase the key belongs to
    pub purchase_id: i32,

    /// The freshly issued key
    pub activation_key: String,

    /// State after reissue (always `active`)
    pub key_status: KeyStatus,
}

/// Query parameters for the recent-purchases listing
#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    /// How many purchases to return; defaults to 5
    pub count: Option<i64>,
}

/// Buy a game for a user
///
/// # Errors
///
/// - 404: user or game does not exist
/// - 409: the user already owns this game
pub async fn buy_game(
    State(state): State<AppState>,
    Json(req): Json<BuyGameRequest>,
) -> ApiResult<Json<Purchase>> {
    tracing::info!(user_id = req.user_id, game_id = req.game_id, "Buying game");

    let purchase = Purchase::buy(&state.db, req.user_id, req.game_id).await?;

    tracing::info!(
        purchase_id = purchase.id,
        user_id = purchase.user_id,
        game_id = purchase.game_id,
        "Game purchased"
    );

    Ok(Json(purchase))
}

/// Record a purchase with an externally supplied date and optional key
///
/// # Errors
///
/// - 400: supplied key has the wrong length
/// - 404: user or game does not exist
/// - 409: the user already owns this game
pub async fn record_purchase(
    State(state): State<AppState>,
    Json(req): Json<RecordPurchaseRequest>,
) -> ApiResult<Json<Purchase>> {
    req.validate().map_err(ApiError::from_validation)?;

    let purchase = Purchase::record(
        &state.db,
        RecordPurchase {
            user_id: req.user_id,
            game_id: req.game_id,
            purchase_date: req.purchase_date,
            activation_key: req.activation_key,
        },
    )
    .await?;

    tracing::info!(
        purchase_id = purchase.id,
        user_id = purchase.user_id,
        game_id = purchase.game_id,
        "Purchase recorded"
    );

    Ok(Json(purchase))
}

/// Redeem an activation key (`active → used`)
///
/// # Errors
///
/// - 404: purchase does not exist
/// - 400: supplied key does not match
/// - 409: key is not active; the message names the current status
pub async fn activate_key(
    State(state): State<AppState>,
    Path(purchase_id): Path<i32>,
    Json(req): Json<ActivateKeyRequest>,
) -> ApiResult<Json<ActivateKeyResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let purchase = Purchase::activate_key(&state.db, purchase_id, &req.activation_key).await?;

    tracing::info!(purchase_id = purchase.id, "Activation key redeemed");

    Ok(Json(ActivateKeyResponse {
        purchase_id: purchase.id,
        key_status: purchase.key_status,
    }))
}

/// Issue a replacement activation key, resetting any prior status to active
///
/// # Errors
///
/// - 404: purchase does not exist
pub async fn reissue_key(
    State(state): State<AppState>,
    Path(purchase_id): Path<i32>,
) -> ApiResult<Json<ReissueKeyResponse>> {
    let purchase = Purchase::reissue_key(&state.db, purchase_id).await?;

    tracing::info!(purchase_id = purchase.id, "Activation key reissued");

    Ok(Json(ReissueKeyResponse {
        purchase_id: purchase.id,
        activation_key: purchase.activation_key,
        key_status: purchase.key_status,
    }))
}

/// List every purchase
pub async fn list_purchases(State(state): State<AppState>) -> ApiResult<Json<Vec<Purchase>>> {
    let purchases = Purchase::list_all(&state.db).await?;
    Ok(Json(purchases))
}

/// One purchase, joined with its game title
///
/// # Errors
///
/// - 404: purchase does not exist
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<i32>,
) -> ApiResult<Json<PurchaseWithGame>> {
    let purchase = Purchase::find_by_id_with_title(&state.db, purchase_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Purchase not found".to_string()))?;

    Ok(Json(purchase))
}

/// A user's purchases, joined with game titles
///
/// # Errors
///
/// - 404: the user has no purchases
pub async fn user_purchases(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<Vec<PurchaseWithGame>>> {
    let purchases = Purchase::list_by_user_with_titles(&state.db, user_id).await?;

    if purchases.is_empty() {
        return Err(ApiError::NotFound("No purchases found".to_string()));
    }

    Ok(Json(purchases))
}

/// A user's most recent purchases, newest first
///
/// # Errors
///
/// - 404: the user has no purchases
pub async fn recent_purchases(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<Purchase>>> {
    let count = query.count.unwrap_or(DEFAULT_RECENT_COUNT);
    let purchases = Purchase::recent_by_user(&state.db, user_id, count).await?;

    if purchases.is_empty() {
        return Err(ApiError::NotFound("No purchases found".to_string()));
    }

    Ok(Json(purchases))
}

/// Purchases filtered by key status
///
/// # Errors
///
/// - 400: the status string is not one of `active`, `used`, `revoked`
pub async fn purchases_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<Json<Vec<Purchase>>> {
    let status = KeyStatus::parse(&status).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "invalid key status '{}', expected one of: active, used, revoked",
            status
        ))
    })?;

    let purchases = Purchase::list_by_status(&state.db, status).await?;

    Ok(Json(purchases))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_key_request_validation() {
        let valid = ActivateKeyRequest {
            activation_key: "A".repeat(16),
        };
        assert!(valid.validate().is_ok());

        let short = ActivateKeyRequest {
            activation_key: "ABC".to_string(),
        };
        assert!(short.validate().is_err());

        let long = ActivateKeyRequest {
            activation_key: "A".repeat(17),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_record_purchase_request_validation() {
        let valid = RecordPurchaseRequest {
            user_id: 1,
            game_id: 7,
            purchase_date: Utc::now(),
            activation_key: None,
        };
        assert!(valid.validate().is_ok());

        let with_key = RecordPurchaseRequest {
            activation_key: Some("K".repeat(16)),
            ..valid.clone()
        };
        assert!(with_key.validate().is_ok());

        let bad_key = RecordPurchaseRequest {
            activation_key: Some("too-short".to_string()),
            ..valid
        };
        assert!(bad_key.validate().is_err());
    }

    #[test]
    fn test_reissue_response_serialization() {
        let response = ReissueKeyResponse {
            purchase_id: 3,
            activation_key: "AbCdEfGh12345678".to_string(),
            key_status: KeyStatus::Active,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("AbCdEfGh12345678"));
        assert!(json.contains("\"active\""));
    }
}
