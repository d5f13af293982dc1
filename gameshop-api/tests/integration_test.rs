/// Integration tests for the GameShop API
///
/// These tests verify the store's core guarantees end-to-end through the
/// router:
/// - Purchase uniqueness per (user, game) pair
/// - The activation-key lifecycle (activate, repeat-activate, reissue)
/// - Cart merge-on-add semantics and the quantity floor
/// - Cart emptiness reporting (404 cart vs zero count)
///
/// A running PostgreSQL database is required via DATABASE_URL; without it
/// every test skips itself.

mod common;

use axum::http::StatusCode;
use serde_json::json;

macro_rules! ctx_or_skip {
    () => {
        match common::TestContext::new().await.unwrap() {
            Some(ctx) => ctx,
            None => {
                eprintln!("DATABASE_URL not set, skipping integration test");
                return;
            }
        }
    };
}

/// Buying creates a purchase with an active 16-character key
#[tokio::test]
async fn test_buy_game_issues_active_key() {
    let ctx = ctx_or_skip!();

    let (status, body) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/buy",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["user_id"], ctx.user.id);
    assert_eq!(body["game_id"], ctx.game.id);
    assert_eq!(body["key_status"], "active");
    assert_eq!(body["activation_key"].as_str().unwrap().len(), 16);

    ctx.cleanup().await.unwrap();
}

/// A second buy for the same pair is a 409 and leaves the store unchanged
#[tokio::test]
async fn test_duplicate_buy_conflicts() {
    let ctx = ctx_or_skip!();

    let (status, first) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/buy",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/buy",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "body: {}", body);

    // Exactly one row, and it is still the first purchase.
    assert_eq!(
        common::purchase_row_count(&ctx.db, ctx.user.id, ctx.game.id).await,
        1
    );
    let (status, current) = common::send_json(
        &ctx,
        "GET",
        &format!("/v1/purchases/{}", first["id"]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["activation_key"], first["activation_key"]);

    ctx.cleanup().await.unwrap();
}

/// Buying for an unknown user or game is a 404 (purchase surface)
#[tokio::test]
async fn test_buy_unknown_references_not_found() {
    let ctx = ctx_or_skip!();

    let (status, _) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/buy",
        Some(json!({ "user_id": -1, "game_id": ctx.game.id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/buy",
        Some(json!({ "user_id": ctx.user.id, "game_id": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// The §4.2 lifecycle: activate succeeds once, then conflicts naming the
/// current status; a wrong key is a 400 and changes nothing
#[tokio::test]
async fn test_activation_key_lifecycle() {
    let ctx = ctx_or_skip!();

    let (_, purchase) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/buy",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id })),
    )
    .await;
    let purchase_id = purchase["id"].as_i64().unwrap();
    let key = purchase["activation_key"].as_str().unwrap().to_string();

    // Wrong key first: 400, key stays active.
    let (status, _) = common::send_json(
        &ctx,
        "POST",
        &format!("/v1/purchases/{}/activate", purchase_id),
        Some(json!({ "activation_key": "0000000000000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Correct key: 200, status flips to used.
    let (status, body) = common::send_json(
        &ctx,
        "POST",
        &format!("/v1/purchases/{}/activate", purchase_id),
        Some(json!({ "activation_key": key })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["key_status"], "used");

    // Same key again: 409 and the message names the current status.
    let (status, body) = common::send_json(
        &ctx,
        "POST",
        &format!("/v1/purchases/{}/activate", purchase_id),
        Some(json!({ "activation_key": key })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["message"].as_str().unwrap().contains("used"),
        "conflict should surface the current status, got: {}",
        body
    );

    // Unknown purchase: 404.
    let (status, _) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/999999999/activate",
        Some(json!({ "activation_key": "0000000000000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// Reissue always lands on an active status with a different key
#[tokio::test]
async fn test_reissue_resets_key_state() {
    let ctx = ctx_or_skip!();

    let (_, purchase) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/buy",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id })),
    )
    .await;
    let purchase_id = purchase["id"].as_i64().unwrap();
    let original_key = purchase["activation_key"].as_str().unwrap().to_string();

    // Burn the key so reissue has a non-active state to reset.
    let (status, _) = common::send_json(
        &ctx,
        "POST",
        &format!("/v1/purchases/{}/activate", purchase_id),
        Some(json!({ "activation_key": original_key })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::send_json(
        &ctx,
        "POST",
        &format!("/v1/purchases/{}/reissue", purchase_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["key_status"], "active");
    let new_key = body["activation_key"].as_str().unwrap();
    assert_eq!(new_key.len(), 16);
    assert_ne!(new_key, original_key);

    // The reissued key redeems normally.
    let (status, body) = common::send_json(
        &ctx,
        "POST",
        &format!("/v1/purchases/{}/activate", purchase_id),
        Some(json!({ "activation_key": new_key })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    // Reissuing an unknown purchase is a 404.
    let (status, _) =
        common::send_json(&ctx, "POST", "/v1/purchases/999999999/reissue", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// The administrative record path honors the supplied date and key and
/// still rejects duplicates
#[tokio::test]
async fn test_record_purchase_with_supplied_fields() {
    let ctx = ctx_or_skip!();

    let supplied_key = "SUPPLIEDKEY12345";
    let (status, body) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases",
        Some(json!({
            "user_id": ctx.user.id,
            "game_id": ctx.game.id,
            "purchase_date": "2024-05-01T12:00:00Z",
            "activation_key": supplied_key
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["activation_key"], supplied_key);
    assert_eq!(body["key_status"], "active");
    assert!(body["purchase_date"]
        .as_str()
        .unwrap()
        .starts_with("2024-05-01"));

    let (status, _) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases",
        Some(json!({
            "user_id": ctx.user.id,
            "game_id": ctx.game.id,
            "purchase_date": "2024-06-01T12:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

/// Status filtering validates its input
#[tokio::test]
async fn test_purchases_by_status() {
    let ctx = ctx_or_skip!();

    let (status, _) = common::send_json(&ctx, "GET", "/v1/purchases/status/active", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        common::send_json(&ctx, "GET", "/v1/purchases/status/expired", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);

    ctx.cleanup().await.unwrap();
}

/// Recent purchases come back newest first and honor the count parameter
#[tokio::test]
async fn test_recent_purchases_ordering() {
    let ctx = ctx_or_skip!();

    let game_b = ctx.create_game("Recent B").await.unwrap();
    let game_c = ctx.create_game("Recent C").await.unwrap();

    for (game_id, date) in [
        (ctx.game.id, "2024-01-01T00:00:00Z"),
        (game_b.id, "2024-03-01T00:00:00Z"),
        (game_c.id, "2024-02-01T00:00:00Z"),
    ] {
        let (status, _) = common::send_json(
            &ctx,
            "POST",
            "/v1/purchases",
            Some(json!({
                "user_id": ctx.user.id,
                "game_id": game_id,
                "purchase_date": date
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = common::send_json(
        &ctx,
        "GET",
        &format!("/v1/purchases/user/{}/recent?count=2", ctx.user.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["game_id"], game_b.id); // 2024-03
    assert_eq!(list[1]["game_id"], game_c.id); // 2024-02

    ctx.cleanup().await.unwrap();
    gameshop_shared::models::game::Game::delete(&ctx.db, game_b.id)
        .await
        .unwrap();
    gameshop_shared::models::game::Game::delete(&ctx.db, game_c.id)
        .await
        .unwrap();
}

/// Two sequential adds merge into one line with quantity 2, never two rows
#[tokio::test]
async fn test_cart_merge_on_repeated_add() {
    let ctx = ctx_or_skip!();

    let (status, first) = common::send_json(
        &ctx,
        "POST",
        "/v1/cart/items",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["quantity"], 1);

    let (status, second) = common::send_json(
        &ctx,
        "POST",
        "/v1/cart/items",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["quantity"], 2);
    assert_eq!(second["id"], first["id"], "merge must reuse the same line");

    assert_eq!(
        common::cart_row_count(&ctx.db, ctx.user.id, ctx.game.id).await,
        1
    );

    ctx.cleanup().await.unwrap();
}

/// Adding with unknown references is a 400 on the cart surface
#[tokio::test]
async fn test_add_to_cart_unknown_references_bad_request() {
    let ctx = ctx_or_skip!();

    let (status, _) = common::send_json(
        &ctx,
        "POST",
        "/v1/cart/items",
        Some(json!({ "user_id": -1, "game_id": ctx.game.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::send_json(
        &ctx,
        "POST",
        "/v1/cart/items",
        Some(json!({ "user_id": ctx.user.id, "game_id": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

/// Zero and negative quantities are rejected and leave the line untouched
#[tokio::test]
async fn test_update_quantity_floor() {
    let ctx = ctx_or_skip!();

    let (_, item) = common::send_json(
        &ctx,
        "POST",
        "/v1/cart/items",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id, "quantity": 4 })),
    )
    .await;
    let cart_id = item["id"].as_i64().unwrap();

    for bad in [0, -3] {
        let (status, _) = common::send_json(
            &ctx,
            "PUT",
            &format!("/v1/cart/items/{}", cart_id),
            Some(json!({ "quantity": bad })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // Prior quantity survives both rejections.
    let (_, cart) = common::send_json(
        &ctx,
        "GET",
        &format!("/v1/cart/user/{}", ctx.user.id),
        None,
    )
    .await;
    assert_eq!(cart[0]["quantity"], 4);

    // A positive overwrite still works and is an overwrite, not a merge.
    let (status, body) = common::send_json(
        &ctx,
        "PUT",
        &format!("/v1/cart/items/{}", cart_id),
        Some(json!({ "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 2);

    // Unknown line: 404.
    let (status, _) = common::send_json(
        &ctx,
        "PUT",
        "/v1/cart/items/999999999",
        Some(json!({ "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// An empty cart is a 404 on the listing but a zero on the count
#[tokio::test]
async fn test_cart_emptiness_semantics() {
    let ctx = ctx_or_skip!();

    let (status, _) = common::send_json(
        &ctx,
        "GET",
        &format!("/v1/cart/user/{}", ctx.user.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = common::send_json(
        &ctx,
        "GET",
        &format!("/v1/cart/user/{}/count", ctx.user.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    ctx.cleanup().await.unwrap();
}

/// The cart listing joins game data and derives line totals on read
#[tokio::test]
async fn test_cart_listing_carries_totals() {
    let ctx = ctx_or_skip!();

    let (_, _) = common::send_json(
        &ctx,
        "POST",
        "/v1/cart/items",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id, "quantity": 3 })),
    )
    .await;

    let (status, cart) = common::send_json(
        &ctx,
        "GET",
        &format!("/v1/cart/user/{}", ctx.user.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let line = &cart[0];
    assert_eq!(line["game_title"], ctx.game.title);
    // Seeded price is 19.99; 3 copies.
    assert_eq!(line["price"], "19.99");
    assert_eq!(line["total_price"], "59.97");

    ctx.cleanup().await.unwrap();
}

/// Removing and clearing, including the already-empty outcome
#[tokio::test]
async fn test_remove_and_clear_cart() {
    let ctx = ctx_or_skip!();

    let (_, item) = common::send_json(
        &ctx,
        "POST",
        "/v1/cart/items",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id })),
    )
    .await;
    let cart_id = item["id"].as_i64().unwrap();

    let (status, _) = common::send_json(
        &ctx,
        "DELETE",
        &format!("/v1/cart/items/{}", cart_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Removing the same line again: 404.
    let (status, _) = common::send_json(
        &ctx,
        "DELETE",
        &format!("/v1/cart/items/{}", cart_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Refill, then clear twice: first clear deletes, second reports empty.
    let (_, _) = common::send_json(
        &ctx,
        "POST",
        "/v1/cart/items",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id })),
    )
    .await;

    let (status, body) = common::send_json(
        &ctx,
        "DELETE",
        &format!("/v1/cart/user/{}", ctx.user.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);
    assert_eq!(body["already_empty"], false);

    let (status, body) = common::send_json(
        &ctx,
        "DELETE",
        &format!("/v1/cart/user/{}", ctx.user.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 0);
    assert_eq!(body["already_empty"], true);

    ctx.cleanup().await.unwrap();
}

/// The end-to-end scenario from the store's core guarantees: buy, conflict
/// on re-buy, activate, conflict on re-activate
#[tokio::test]
async fn test_purchase_scenario_end_to_end() {
    let ctx = ctx_or_skip!();

    let (status, purchase) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/buy",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purchase["key_status"], "active");
    let key = purchase["activation_key"].as_str().unwrap().to_string();
    assert_eq!(key.len(), 16);
    let purchase_id = purchase["id"].as_i64().unwrap();

    let (status, _) = common::send_json(
        &ctx,
        "POST",
        "/v1/purchases/buy",
        Some(json!({ "user_id": ctx.user.id, "game_id": ctx.game.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = common::send_json(
        &ctx,
        "POST",
        &format!("/v1/purchases/{}/activate", purchase_id),
        Some(json!({ "activation_key": key })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key_status"], "used");

    let (status, body) = common::send_json(
        &ctx,
        "POST",
        &format!("/v1/purchases/{}/activate", purchase_id),
        Some(json!({ "activation_key": key })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("used"));

    ctx.cleanup().await.unwrap();
}
