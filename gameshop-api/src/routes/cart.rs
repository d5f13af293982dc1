/// Cart endpoints
///
/// Adding is merge-on-add: a repeated add for the same (user, game) pair
/// bumps the existing line's quantity instead of creating a second row. An
/// empty cart is a 404 on the cart listing but a plain zero on the count
/// endpoint; clearing an already-empty cart succeeds and says so.
///
/// # Endpoints
///
/// - `POST   /v1/cart/items` - add (or merge) a line
/// - `PUT    /v1/cart/items/{id}` - overwrite a line's quantity
/// - `DELETE /v1/cart/items/{id}` - remove a line
/// - `GET    /v1/cart/user/{id}` - the user's cart with line totals
/// - `DELETE /v1/cart/user/{id}` - clear the user's cart
/// - `GET    /v1/cart/user/{id}/count` - summed quantity across lines

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use gameshop_shared::models::cart::{CartItem, CartLine};
use serde::{Deserialize, Serialize};

/// Add-to-cart request
#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartRequest {
    /// Cart owner
    pub user_id: i32,

    /// Game to add
    pub game_id: i32,

    /// Copies to add; defaults to 1
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Quantity-overwrite request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityRequest {
    /// New quantity; must be positive
    pub quantity: i32,
}

/// Line-removal confirmation
#[derive(Debug, Clone, Serialize)]
pub struct RemoveFromCartResponse {
    /// Removed line
    pub cart_id: i32,

    /// Always true on the success path
    pub removed: bool,
}

/// Cart-clearing confirmation
///
/// `already_empty` distinguishes "nothing to do" from "lines deleted"; both
/// are successes.
#[derive(Debug, Clone, Serialize)]
pub struct ClearCartResponse {
    /// Cart owner
    pub user_id: i32,

    /// How many lines were deleted
    pub removed: u64,

    /// Whether the cart had no lines to begin with
    pub already_empty: bool,
}

/// Item-count response
#[derive(Debug, Clone, Serialize)]
pub struct CartCountResponse {
    /// Cart owner
    pub user_id: i32,

    /// Summed quantity across the user's lines; zero for an empty cart
    pub count: i64,
}

/// Add a game to a user's cart, merging with an existing line
///
/// # Errors
///
/// - 400: user or game does not exist, or quantity is not positive
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(req): Json<AddToCartRequest>,
) -> ApiResult<Json<CartItem>> {
    tracing::info!(
        user_id = req.user_id,
        game_id = req.game_id,
        quantity = req.quantity,
        "Adding to cart"
    );

    let item = CartItem::add(&state.db, req.user_id, req.game_id, req.quantity).await?;

    tracing::info!(
        cart_id = item.id,
        quantity = item.quantity,
        "Cart line upserted"
    );

    Ok(Json(item))
}

/// Overwrite a line's quantity
///
/// # Errors
///
/// - 404: line does not exist
/// - 400: quantity is zero or negative (the stored quantity is untouched)
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(cart_id): Path<i32>,
    Json(req): Json<UpdateQuantityRequest>,
) -> ApiResult<Json<CartItem>> {
    let item = CartItem::update_quantity(&state.db, cart_id, req.quantity).await?;

    Ok(Json(item))
}

/// Remove a single line
///
/// # Errors
///
/// - 404: line does not exist
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<i32>,
) -> ApiResult<Json<RemoveFromCartResponse>> {
    CartItem::remove(&state.db, cart_id).await?;

    tracing::info!(cart_id, "Cart line removed");

    Ok(Json(RemoveFromCartResponse {
        cart_id,
        removed: true,
    }))
}

/// Clear every line of a user's cart
///
/// Clearing an empty cart is a success with `already_empty: true`.
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<ClearCartResponse>> {
    let removed = CartItem::clear(&state.db, user_id).await?;

    tracing::info!(user_id, removed, "Cart cleared");

    Ok(Json(ClearCartResponse {
        user_id,
        removed,
        already_empty: removed == 0,
    }))
}

/// The user's cart, joined with game data and derived line totals
///
/// # Errors
///
/// - 404: the cart has no lines (distinct from a store failure, which is 500)
pub async fn get_user_cart(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<Vec<CartLine>>> {
    let lines = CartItem::cart_for_user(&state.db, user_id).await?;

    if lines.is_empty() {
        return Err(ApiError::NotFound("Cart is empty".to_string()));
    }

    Ok(Json(lines))
}

/// Summed quantity across the user's cart lines
///
/// Zero for an empty cart; never an error.
pub async fn cart_items_count(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<CartCountResponse>> {
    let count = CartItem::item_count(&state.db, user_id).await?;

    Ok(Json(CartCountResponse { user_id, count }))
}
