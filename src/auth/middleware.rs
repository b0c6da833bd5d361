use crate::api::response::ApiResponse;
use crate::auth::paseto::SessionTokenService;
use crate::types::SessionUser;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

/// Cookie carrying the signed session token.
pub const AUTH_COOKIE_NAME: &str = "auth_token";
/// Optional cookie naming the user the session is expected to belong to.
pub const USER_ID_COOKIE_NAME: &str = "user_id";

/// Expired, empty `auth_token` cookie matching the path it was set with.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    cookie.make_removal();
    cookie
}

/// Session gate: lets the request through only with a valid `auth_token`
/// cookie, attaching the [`SessionUser`] to the request extensions.
///
/// A present but invalid token also clears the cookie on the response.
pub async fn require_auth(
    State(tokens): State<Arc<SessionTokenService>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let Some(token) = jar.get(AUTH_COOKIE_NAME).map(|c| c.value().to_string()) else {
        tracing::debug!("Auth failed: missing token ({} {})", method, path);
        return ApiResponse::<()>::error(StatusCode::UNAUTHORIZED, "Unauthorized: No session found")
            .into_response();
    };

    let expected_user = jar.get(USER_ID_COOKIE_NAME).map(|c| c.value().to_string());

    match tokens.verify(&token, expected_user.as_deref()) {
        Ok(claims) => {
            req.extensions_mut().insert(SessionUser::from(&claims));
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!("Auth failed: invalid session ({} {}): {}", method, path, e);
            (
                jar.add(removal_cookie()),
                ApiResponse::<()>::error(
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized: Invalid or expired session",
                ),
            )
                .into_response()
        }
    }
}

/// Extractor for the identity attached by [`require_auth`].
pub struct AuthUser(pub SessionUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                ApiResponse::<()>::error(StatusCode::UNAUTHORIZED, "Unauthorized: No session found")
                    .into_response()
            })
    }
}
