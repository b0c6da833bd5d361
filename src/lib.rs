//! # Lexgate - cookie-session authentication server
//!
//! Registration, login, logout and "who am I" over HTTP. Sessions are
//! PASETO v4.public tokens stored in an `auth_token` cookie that is
//! HttpOnly, SameSite=Strict and lives for 24 hours.
//!
//! ## Overview
//!
//! Lexgate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `lexgate-server` binary
//! 2. **As a library** - Mount the router in your own Axum application
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use lexgate::{AppState, AuthService, DatabaseProvider, LexgateConfig, SessionTokenService};
//! use std::sync::Arc;
//!
//! let config = LexgateConfig::load("lexgate.toml")?;
//! let users = DatabaseProvider::from_config(&config.database)?.create_client().await?;
//! let tokens = Arc::new(SessionTokenService::from_hex(
//!     &config.paseto_secret_key()?,
//!     &config.paseto_public_key()?,
//!     config.auth.token_settings(),
//! )?);
//! let state = AppState {
//!     config: Arc::new(config),
//!     auth_service: Arc::new(AuthService::new(users, tokens.clone())),
//!     session_tokens: tokens,
//! };
//! let app = lexgate::api::routes::create_app(state)?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `turso` | Remote Turso database (local SQLite is always built in) |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers, routes and the response envelope
//! - [`auth`] - Password hashing, PASETO tokens, session middleware
//! - [`cli`] - Command-line interface
//! - [`db`] - User storage (SQLite, Turso)
//! - [`types`] - Common types and error handling
//! - [`utils`] - TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Session authentication and middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// User storage (Turso/SQLite).
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use auth::{AuthService, SessionTokenService, TokenSettings};
pub use db::{DatabaseProvider, TursoClient, UserRepository};
pub use types::{AppError, Result};
pub use utils::toml_config::LexgateConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based configuration
    pub config: Arc<LexgateConfig>,
    /// Registration, login and user lookup
    pub auth_service: Arc<AuthService>,
    /// Session token issuer/verifier used by the auth middleware
    pub session_tokens: Arc<SessionTokenService>,
}
