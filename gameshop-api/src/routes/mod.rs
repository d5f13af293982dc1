/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `purchases`: Buying, recording, and the activation-key lifecycle
/// - `cart`: Cart lines with merge-on-add semantics
/// - `games`, `genres`, `game_genres`: Catalog maintenance
/// - `users`: Registration, login, profile updates
/// - `reviews`, `messages`: Reviews and stored chat messages
/// - `assistant`: Forwarding to the chat-completion API

pub mod assistant;
pub mod cart;
pub mod game_genres;
pub mod games;
pub mod genres;
pub mod health;
pub mod messages;
pub mod purchases;
pub mod reviews;
pub mod users;
