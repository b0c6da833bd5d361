use crate::{
    api::{
        client_ip::ClientIp,
        response::ApiResponse,
        validation::Validate,
    },
    auth::middleware::{removal_cookie, AuthUser, AUTH_COOKIE_NAME},
    types::{AppError, LoginRequest, PublicUser, RegisterRequest, Result},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;

const INVALID_LOGIN: &str = "Invalid email or password";

/// Payload of `GET /auth/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = PublicUser),
        (status = 400, description = "Invalid input or email already in use")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiResponse<PublicUser>> {
    let result = async move {
        let Json(payload) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
        payload.validate()?;
        state.auth_service.register(payload).await
    }
    .await;

    match result {
        Ok(user) => {
            tracing::info!("Registered user: {}", user.id);
            Ok(ApiResponse::created(user, "User created successfully"))
        }
        Err(AppError::InvalidInput(msg)) => {
            tracing::warn!("Failed to register user: {}", msg);
            Err(AppError::InvalidInput(msg))
        }
        Err(e) => {
            tracing::warn!("Failed to register user: {}", e);
            Err(AppError::InvalidInput("Registration failed".to_string()))
        }
    }
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = PublicUser),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    client_ip: ClientIp,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiResponse<PublicUser>)> {
    let Ok(Json(payload)) = payload else {
        tracing::warn!("SECURITY: Malformed login request from IP {}", client_ip);
        return Err(AppError::Auth(INVALID_LOGIN.to_string()));
    };

    let outcome = match state
        .auth_service
        .login(&payload.email, &payload.password)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(
                "SECURITY: Failed login attempt for email {} from IP {}: {}",
                payload.email,
                client_ip,
                e
            );
            return Err(AppError::Auth(INVALID_LOGIN.to_string()));
        }
    };

    tracing::info!(
        "SECURITY: User {} logged in from IP {}",
        outcome.user.id,
        client_ip
    );

    // Cookie lives exactly as long as the token it carries
    let max_age = state.session_tokens.settings().ttl.num_seconds();
    let cookie = Cookie::build((AUTH_COOKIE_NAME, outcome.token))
        .http_only(true)
        .secure(state.config.server.secure_cookies)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(max_age))
        .build();

    Ok((
        jar.add(cookie),
        ApiResponse::ok(outcome.user, "Login successful"),
    ))
}

/// Logout: drop the session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out successfully")
    ),
    tag = "auth"
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiResponse<()>) {
    (
        jar.add(removal_cookie()),
        ApiResponse::<()>::empty(StatusCode::OK, "Logged out successfully"),
    )
}

/// Current session's user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Authenticated user", body = MeResponse),
        (status = 401, description = "No valid session")
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
) -> Result<ApiResponse<MeResponse>> {
    let user = state.auth_service.current_user(&session.id).await?;

    Ok(ApiResponse::ok(MeResponse { user }, "Authenticated"))
}
