use axum::http::{header, HeaderValue, StatusCode};
use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use lexgate::{
    api::routes::create_app,
    auth::paseto::{generate_keypair, SessionTokenService, TokenSettings},
    types::Role,
    utils::toml_config::{AuthConfig, DatabaseConfig, LexgateConfig, ServerConfig},
    AppState, AuthService, TursoClient,
};

// ============= Test Setup =============

struct TestApp {
    server: TestServer,
    tokens: Arc<SessionTokenService>,
}

async fn create_test_app() -> TestApp {
    create_test_app_with(ServerConfig::default()).await
}

async fn create_test_app_with(server: ServerConfig) -> TestApp {
    let users = TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database");

    let (secret, public) = generate_keypair().expect("Failed to generate key pair");
    let tokens = Arc::new(
        SessionTokenService::from_hex(&secret, &public, TokenSettings::default())
            .expect("Failed to build token service"),
    );

    let config = LexgateConfig {
        server,
        auth: AuthConfig::default(),
        database: DatabaseConfig {
            url: ":memory:".to_string(),
            ..Default::default()
        },
    };

    let state = AppState {
        config: Arc::new(config),
        auth_service: Arc::new(AuthService::new(Arc::new(users), tokens.clone())),
        session_tokens: tokens.clone(),
    };

    let app = create_app(state).expect("Failed to build router");

    TestApp {
        server: TestServer::new(app).expect("Failed to create test server"),
        tokens,
    }
}

fn registration(email: &str) -> Value {
    json!({
        "email": email,
        "password": "password123",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "role": "CLIENT"
    })
}

async fn register(server: &TestServer, email: &str) -> Value {
    let response = server
        .post("/api/v1/auth/register")
        .json(&registration(email))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn login(server: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await
}

fn set_cookie_header(response: &axum_test::TestResponse) -> String {
    response
        .header("set-cookie")
        .to_str()
        .expect("Set-Cookie is not valid ASCII")
        .to_string()
}

// ============= Health Check Tests =============

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = create_test_app().await;

    let response = app.server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["paths"]["/api/v1/auth/login"].is_object());
}

// ============= Hardening Tests =============

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = create_test_app().await;

    for response in [
        app.server.get("/health").await,
        app.server.get("/api/v1/auth/me").await,
        app.server.get("/no/such/route").await,
    ] {
        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "DENY");
        assert_eq!(response.header("referrer-policy"), "no-referrer");
        assert_eq!(
            response.header("content-security-policy"),
            "default-src 'none'; frame-ancestors 'none'"
        );
        assert!(response.maybe_header("strict-transport-security").is_none());
    }
}

#[tokio::test]
async fn test_hsts_when_serving_https() {
    let app = create_test_app_with(ServerConfig {
        secure_cookies: true,
        ..Default::default()
    })
    .await;

    let response = app.server.get("/health").await;
    assert_eq!(
        response.header("strict-transport-security"),
        "max-age=31536000; includeSubDomains"
    );
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let app = create_test_app().await;

    let body = serde_json::to_vec(&json!({
        "email": "big@example.com",
        "password": "x".repeat(128 * 1024),
        "firstName": "Ada",
        "lastName": "Lovelace",
        "role": "CLIENT"
    }))
    .unwrap();
    let length = HeaderValue::from(body.len());

    let response = app
        .server
        .post("/api/v1/auth/register")
        .content_type("application/json")
        .add_header(header::CONTENT_LENGTH, length)
        .bytes(body.into())
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.header("x-content-type-options"), "nosniff");
}

// ============= Registration Tests =============

#[tokio::test]
async fn test_register_user() {
    let app = create_test_app().await;

    let body = register(&app.server, "ada@example.com").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["status"], "Created");
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["firstName"], "Ada");
    assert_eq!(body["data"]["lastName"], "Lovelace");
    assert_eq!(body["data"]["role"], "CLIENT");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app().await;

    register(&app.server, "dup@example.com").await;

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&registration("dup@example.com"))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["message"], "Email already in use");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_register_short_password() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "short@example.com",
            "password": "short",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "role": "LAWYER"
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_invalid_role() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "role@example.com",
            "password": "password123",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "role": "ADMIN"
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({ "email": "partial@example.com" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["statusCode"], 400);
}

// ============= Login Tests =============

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = create_test_app().await;
    let registered = register(&app.server, "login@example.com").await;

    let response = login(&app.server, "login@example.com", "password123").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["id"], registered["data"]["id"]);
    assert_eq!(body["data"]["email"], "login@example.com");

    let header = set_cookie_header(&response);
    assert!(header.starts_with("auth_token=v4.public."));
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Strict"));
    assert!(header.contains("Path=/"));
    assert!(header.contains("Max-Age=86400"));

    let cookie = response.cookie("auth_token");
    let claims = app
        .tokens
        .verify(cookie.value(), None)
        .expect("Issued token should verify");
    assert_eq!(claims.sub, registered["data"]["id"].as_str().unwrap());
    assert_eq!(claims.role, Role::Client);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let app = create_test_app().await;
    register(&app.server, "same@example.com").await;

    let wrong_password = login(&app.server, "same@example.com", "wrongpassword").await;
    let unknown_email = login(&app.server, "nobody@example.com", "password123").await;

    wrong_password.assert_status_unauthorized();
    unknown_email.assert_status_unauthorized();

    let a: Value = wrong_password.json();
    let b: Value = unknown_email.json();
    assert_eq!(a, b);
    assert_eq!(a["message"], "Invalid email or password");
    assert_eq!(a["success"], false);
    assert!(wrong_password.maybe_cookie("auth_token").is_none());
}

#[tokio::test]
async fn test_login_malformed_body() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "x@example.com" }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid email or password");
}

// ============= Logout Tests =============

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/v1/auth/logout")
        .add_cookie(Cookie::new("auth_token", "anything"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Logged out successfully");
    assert!(body["data"].is_null());

    let header = set_cookie_header(&response);
    assert!(header.starts_with("auth_token=;"));
    assert!(header.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = create_test_app().await;

    let response = app.server.post("/api/v1/auth/logout").await;
    response.assert_status_ok();
}

// ============= Session Tests =============

#[tokio::test]
async fn test_me_without_cookie() {
    let app = create_test_app().await;

    let response = app.server.get("/api/v1/auth/me").await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["message"], "Unauthorized: No session found");
    assert_eq!(body["statusCode"], 401);
}

#[tokio::test]
async fn test_me_with_invalid_cookie_clears_it() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/api/v1/auth/me")
        .add_cookie(Cookie::new("auth_token", "v4.public.garbage"))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["message"], "Unauthorized: Invalid or expired session");

    let header = set_cookie_header(&response);
    assert!(header.starts_with("auth_token=;"));
}

#[tokio::test]
async fn test_me_after_login() {
    let app = create_test_app().await;
    let registered = register(&app.server, "me@example.com").await;

    let session = login(&app.server, "me@example.com", "password123")
        .await
        .cookie("auth_token");

    let response = app.server.get("/api/v1/auth/me").add_cookie(session).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"], registered["data"]);
}

#[tokio::test]
async fn test_me_with_matching_user_id_cookie() {
    let app = create_test_app().await;
    let registered = register(&app.server, "bound@example.com").await;
    let user_id = registered["data"]["id"].as_str().unwrap().to_string();

    let session = login(&app.server, "bound@example.com", "password123")
        .await
        .cookie("auth_token");

    let response = app
        .server
        .get("/api/v1/auth/me")
        .add_cookie(session)
        .add_cookie(Cookie::new("user_id", user_id))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_me_with_mismatched_user_id_cookie() {
    let app = create_test_app().await;
    register(&app.server, "other@example.com").await;

    let session = login(&app.server, "other@example.com", "password123")
        .await
        .cookie("auth_token");

    let response = app
        .server
        .get("/api/v1/auth/me")
        .add_cookie(session)
        .add_cookie(Cookie::new("user_id", "someone-else"))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["message"], "Unauthorized: Invalid or expired session");
}

#[tokio::test]
async fn test_me_with_token_from_other_key() {
    let app = create_test_app().await;
    let registered = register(&app.server, "forged@example.com").await;

    let (secret, public) = generate_keypair().unwrap();
    let forger = SessionTokenService::from_hex(&secret, &public, TokenSettings::default()).unwrap();
    let forged = forger
        .issue(registered["data"]["id"].as_str().unwrap(), Role::Lawyer)
        .unwrap();

    let response = app
        .server
        .get("/api/v1/auth/me")
        .add_cookie(Cookie::new("auth_token", forged))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_me_for_deleted_user() {
    let app = create_test_app().await;

    // Valid signature, but nobody with this id exists
    let token = app.tokens.issue("ghost", Role::Client).unwrap();

    let response = app
        .server
        .get("/api/v1/auth/me")
        .add_cookie(Cookie::new("auth_token", token))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_full_session_flow() {
    let app = create_test_app().await;
    register(&app.server, "flow@example.com").await;

    let login_response = login(&app.server, "flow@example.com", "password123").await;
    login_response.assert_status_ok();
    let session = login_response.cookie("auth_token");

    app.server
        .get("/api/v1/auth/me")
        .add_cookie(session.clone())
        .await
        .assert_status_ok();

    let logout = app
        .server
        .post("/api/v1/auth/logout")
        .add_cookie(session)
        .await;
    logout.assert_status_ok();
    assert_eq!(logout.cookie("auth_token").value(), "");
}
