//! Session authentication
//!
//! This module provides authentication infrastructure for the Lexgate API:
//! password hashing, PASETO session tokens, the register/login service and
//! the Axum middleware that gates protected routes.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and verification
//! - [`auth::paseto`](crate::auth::paseto) - v4.public token issuing and verification
//! - [`auth::service`](crate::auth::service) - Registration and login orchestration
//! - [`auth::middleware`](crate::auth::middleware) - Cookie session gate and extractor
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id (memory-hard) with a random salt per hash
//! - **Session Tokens**: Ed25519-signed PASETO v4.public, 24h lifetime, 30s clock tolerance
//! - **Transport**: `auth_token` cookie, `HttpOnly` and `SameSite=Strict`
//! - **Stateless**: no server-side session table; logout only drops the cookie
//!
//! # Usage
//!
//! ## Token Issuing
//!
//! ```ignore
//! use lexgate::auth::paseto::{SessionTokenService, TokenSettings};
//!
//! let tokens = SessionTokenService::from_hex(&secret_hex, &public_hex, TokenSettings::default())?;
//! let token = tokens.issue(&user_id, Role::Client)?;
//! let claims = tokens.verify(&token, Some(&user_id))?;
//! ```
//!
//! ## Middleware
//!
//! ```ignore
//! use axum::middleware;
//! use lexgate::auth::middleware::require_auth;
//!
//! let protected = Router::new()
//!     .route("/auth/me", get(handler))
//!     .layer(middleware::from_fn_with_state(tokens.clone(), require_auth));
//! ```
//!
//! ## Extracting the Session in Handlers
//!
//! ```ignore
//! async fn protected_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.id)
//! }
//! ```
//!
//! # Configuration
//!
//! Configure via `lexgate.toml`:
//! ```toml
//! [auth]
//! paseto_secret_key_env = "PASETO_SECRET_KEY"  # hex, 64 bytes
//! paseto_public_key_env = "PASETO_PUBLIC_KEY"  # hex, 32 bytes
//! token_ttl_hours = 24
//! ```

/// Cookie session gate and `AuthUser` extractor.
pub mod middleware;
/// PASETO v4.public session token codec.
pub mod paseto;
/// Argon2id password hashing.
pub mod password;
/// Registration and login service.
pub mod service;

pub use middleware::{require_auth, AuthUser, AUTH_COOKIE_NAME};
pub use paseto::{SessionTokenService, TokenSettings};
pub use service::{AuthService, LoginOutcome};
