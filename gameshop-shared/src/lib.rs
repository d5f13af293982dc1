//! # GameShop Shared Library
//!
//! This crate contains the persistence layer and business rules shared by the
//! GameShop HTTP server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: database models and their operations
//! - `db`: connection pool and migration runner
//! - `keygen`: activation-key generation

pub mod db;
pub mod keygen;
pub mod models;

/// Current version of the GameShop shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
