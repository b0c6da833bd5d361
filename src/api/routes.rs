use crate::auth::middleware::require_auth;
use crate::auth::paseto::SessionTokenService;
use crate::types::{AppError, Result};
use crate::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Maximum accepted request body size.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// `/auth` routes; `/auth/me` sits behind the session gate.
pub fn create_router(session_tokens: Arc<SessionTokenService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/auth/register", post(crate::api::handlers::auth::register))
        .route("/auth/login", post(crate::api::handlers::auth::login))
        .route("/auth/logout", post(crate::api::handlers::auth::logout));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route("/auth/me", get(crate::api::handlers::auth::me))
        .layer(middleware::from_fn_with_state(session_tokens, require_auth));

    public_routes.merge(protected_routes)
}

/// Full application: health, OpenAPI document, `/api/v1` routes and the
/// HTTP layers (tracing, CORS, body limit, security headers).
pub fn create_app(state: AppState) -> Result<Router> {
    let origin: HeaderValue = state.config.server.cors_origin.parse().map_err(|_| {
        AppError::Config(format!(
            "Invalid CORS origin: {}",
            state.config.server.cors_origin
        ))
    })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let https_only = state.config.server.secure_cookies;

    let app = Router::new()
        .route("/health", get(crate::api::handlers::health::health))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(crate::api::ApiDoc::openapi()) }),
        )
        .nest("/api/v1", create_router(state.session_tokens.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .with_state(state);

    Ok(with_security_headers(app, https_only))
}

/// Hardening headers on every response, including rejections from the
/// inner layers. HSTS is only sent when the deployment serves HTTPS.
fn with_security_headers(router: Router, https_only: bool) -> Router {
    let router = router
        // Prevent MIME type sniffing
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        // Prevent clickjacking
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        // JSON API: nothing to load, nothing to frame
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
        // Legacy XSS filter off; CSP covers it
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("0"),
        ));

    if https_only {
        router.layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ))
    } else {
        router
    }
}
