//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Lexgate, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::response`](crate::api::response) - JSON response envelope
//! - [`api::validation`](crate::api::validation) - Request body validation
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/v1/auth`)
//! - `POST /api/v1/auth/register` - Register a new user
//! - `POST /api/v1/auth/login` - Login; sets the `auth_token` cookie
//! - `POST /api/v1/auth/logout` - Clear the `auth_token` cookie
//! - `GET /api/v1/auth/me` - Current user (requires a session)
//!
//! ## Health
//! - `GET /health` - Health check endpoint
//!
//! # Response Envelope
//!
//! Every `/api/v1` response has the shape
//! `{ success, statusCode, status, message, data }`.
//!
//! # OpenAPI Documentation
//!
//! The generated document is served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

/// Client address extraction for security logs.
pub mod client_ip;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Uniform JSON response envelope.
pub mod response;
/// Router configuration and route definitions.
pub mod routes;
/// Request body validation.
pub mod validation;

/// OpenAPI description of the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::health::health,
    ),
    components(schemas(
        crate::types::RegisterRequest,
        crate::types::LoginRequest,
        crate::types::PublicUser,
        crate::types::Role,
        handlers::auth::MeResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and cookie sessions"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
