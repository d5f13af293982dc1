/// Database models for GameShop
///
/// This module contains all database models and their operations.
///
/// # Models
///
/// - `user`: store accounts (referenced by purchases, cart, reviews, messages)
/// - `game`: catalog entries
/// - `genre` / `game_genre`: genre catalog and game-genre links
/// - `purchase`: owned games with their activation-key lifecycle
/// - `cart`: per-user cart lines with merge-on-add semantics
/// - `review`: game reviews
/// - `message`: support/assistant chat messages
///
/// Operations are associated functions taking a `&PgPool`; handlers hold no
/// state between requests.

pub mod cart;
pub mod game;
pub mod game_genre;
pub mod genre;
pub mod message;
pub mod purchase;
pub mod review;
pub mod user;
