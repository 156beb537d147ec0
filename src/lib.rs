//! # Portfolio
//!
//! Backend for a personal portfolio site: blog and project posts with
//! full-text search, admin login with bearer tokens, and a rate-limited
//! contact form that pings the owner on Telegram. Usable both as a
//! standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! portfolio = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use portfolio::auth::TokenSigner;
//! use portfolio::media::NoMediaHost;
//! use portfolio::notify::TelegramNotifier;
//! use portfolio::server::{AppState, create_router};
//! use portfolio::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/portfolio.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     Arc::new(NoMediaHost),
//!     Arc::new(TelegramNotifier::new("bot-token", "chat-id").unwrap()),
//!     TokenSigner::new("secret").unwrap(),
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `portfolio` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod notify;
pub mod server;
pub mod store;
pub mod types;
