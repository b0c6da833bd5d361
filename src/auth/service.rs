use crate::auth::paseto::SessionTokenService;
use crate::auth::password::{hash_password, verify_password};
use crate::db::{NewUser, UserRepository};
use crate::types::{AppError, PublicUser, RegisterRequest, Result};
use std::sync::Arc;
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: PublicUser,
}

/// Orchestrates the user store, password hashing and the session token codec.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<SessionTokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<SessionTokenService>) -> Self {
        Self { users, tokens }
    }

    pub fn tokens(&self) -> &Arc<SessionTokenService> {
        &self.tokens
    }

    /// Creates an account. The request is expected to be validated already.
    ///
    /// Uniqueness is checked read-then-write; the `UNIQUE` column constraint
    /// catches a concurrent duplicate as a database error.
    pub async fn register(&self, request: RegisterRequest) -> Result<PublicUser> {
        if self
            .users
            .find_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::InvalidInput("Email already in use".to_string()));
        }

        let password_hash = hash_password(&request.password)?;

        self.users
            .create_user(NewUser {
                id: Uuid::new_v4().to_string(),
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                role: request.role,
            })
            .await
    }

    /// Checks credentials and issues a session token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::Auth(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.tokens.issue(&user.id, user.role)?;

        Ok(LoginOutcome {
            token,
            user: user.into(),
        })
    }

    /// Profile of an authenticated user.
    pub async fn current_user(&self, user_id: &str) -> Result<PublicUser> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::paseto::{generate_keypair, TokenSettings};
    use crate::db::traits::MockUserRepository;
    use crate::db::User;
    use crate::types::Role;

    fn token_service() -> Arc<SessionTokenService> {
        let (secret, public) = generate_keypair().unwrap();
        Arc::new(SessionTokenService::from_hex(&secret, &public, TokenSettings::default()).unwrap())
    }

    fn register_input() -> RegisterRequest {
        RegisterRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: Role::Client,
        }
    }

    fn stored_user(password: &str) -> User {
        User {
            id: "user-1".to_string(),
            email: "test@example.com".to_string(),
            password_hash: hash_password(password).unwrap(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: Role::Client,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_register_creates_user_when_email_free() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_email()
            .withf(|email| email.to_string() == "test@example.com")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create_user()
            .withf(|user| {
                user.email == "test@example.com"
                    && user.first_name == "John"
                    && user.last_name == "Doe"
                    && user.role == Role::Client
                    && user.password_hash.starts_with("$argon2")
                    && user.password_hash != "password123"
            })
            .times(1)
            .returning(|user| {
                Ok(PublicUser {
                    id: user.id,
                    email: user.email,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    role: user.role,
                })
            });

        let service = AuthService::new(Arc::new(repo), token_service());
        let user = service.register(register_input()).await.expect("should register");

        assert_eq!(user.email, "test@example.com");
        assert!(Uuid::parse_str(&user.id).is_ok(), "id should be a UUID");
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_email()
            .returning(|_| Ok(Some(stored_user("whatever1"))));
        repo.expect_create_user().never();

        let service = AuthService::new(Arc::new(repo), token_service());
        let result = service.register(register_input()).await;

        match result {
            Err(AppError::InvalidInput(msg)) => assert_eq!(msg, "Email already in use"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_email()
            .withf(|email| email.to_string() == "test@example.com")
            .returning(|_| Ok(Some(stored_user("password123"))));

        let tokens = token_service();
        let service = AuthService::new(Arc::new(repo), tokens.clone());
        let outcome = service
            .login("test@example.com", "password123")
            .await
            .expect("should login");

        assert_eq!(
            outcome.user,
            PublicUser {
                id: "user-1".to_string(),
                email: "test@example.com".to_string(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                role: Role::Client,
            }
        );

        let claims = tokens
            .verify(&outcome.token, Some("user-1"))
            .expect("issued token should verify");
        assert_eq!(claims.role, Role::Client);
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_fail_alike() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_email()
            .withf(|email| email.to_string() == "missing@example.com")
            .returning(|_| Ok(None));
        repo.expect_find_user_by_email()
            .withf(|email| email.to_string() == "test@example.com")
            .returning(|_| Ok(Some(stored_user("password123"))));

        let service = AuthService::new(Arc::new(repo), token_service());

        let unknown = service.login("missing@example.com", "password").await;
        let wrong = service.login("test@example.com", "wrong-password").await;

        let unknown_msg = match unknown {
            Err(AppError::Auth(msg)) => msg,
            other => panic!("expected Auth error, got {:?}", other),
        };
        let wrong_msg = match wrong {
            Err(AppError::Auth(msg)) => msg,
            other => panic!("expected Auth error, got {:?}", other),
        };
        assert_eq!(unknown_msg, wrong_msg);
        assert_eq!(unknown_msg, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_current_user_missing_is_unauthorized() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_id().returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repo), token_service());

        assert!(matches!(
            service.current_user("ghost").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_email()
            .returning(|_| Err(AppError::Database("connection lost".to_string())));

        let service = AuthService::new(Arc::new(repo), token_service());

        assert!(matches!(
            service.register(register_input()).await,
            Err(AppError::Database(_))
        ));
    }
}
