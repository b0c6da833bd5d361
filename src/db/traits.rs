//! Database abstraction traits
//!
//! This module provides the `UserRepository` trait that abstracts over the
//! different database backends (in-memory SQLite, file-based SQLite, remote Turso).
//!
//! # Example
//!
//! ```rust,ignore
//! use lexgate::db::DatabaseProvider;
//!
//! // Use in-memory database (default for development/testing)
//! let users = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let users = DatabaseProvider::SQLite { path: "data.db".into() }.create_client().await?;
//! ```

use crate::db::turso::User;
use crate::types::{AppError, PublicUser, Result, Role};
use crate::utils::toml_config::DatabaseConfig;
use async_trait::async_trait;
use std::sync::Arc;

/// Fields needed to insert a new user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Persistence operations over the `users` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Full row, including the password hash. Only the auth service should call this.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: &str) -> Result<Option<PublicUser>>;

    /// Inserts the user and returns its public projection.
    async fn create_user(&self, user: NewUser) -> Result<PublicUser>;
}

/// Database provider configuration
#[derive(Debug, Clone, Default)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Create a repository client from this provider configuration
    pub async fn create_client(&self) -> Result<Arc<dyn UserRepository>> {
        match self {
            DatabaseProvider::Memory => {
                let client = super::turso::TursoClient::new_memory().await?;
                Ok(Arc::new(client))
            }
            DatabaseProvider::SQLite { path } => {
                let client = super::turso::TursoClient::new_local(path).await?;
                Ok(Arc::new(client))
            }
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                let client =
                    super::turso::TursoClient::new_remote(url.clone(), auth_token.clone()).await?;
                Ok(Arc::new(client))
            }
        }
    }

    /// Selects a provider from the `[database]` section.
    ///
    /// Remote Turso wins when both env vars are configured and the `turso`
    /// feature is enabled; `:memory:` selects the in-memory database.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        #[cfg(feature = "turso")]
        {
            if let (Some(url_env), Some(token_env)) =
                (&config.turso_url_env, &config.turso_token_env)
            {
                let url = std::env::var(url_env)
                    .map_err(|_| AppError::Config(format!("{} is not set", url_env)))?;
                let auth_token = std::env::var(token_env)
                    .map_err(|_| AppError::Config(format!("{} is not set", token_env)))?;
                return Ok(DatabaseProvider::Turso { url, auth_token });
            }
        }

        #[cfg(not(feature = "turso"))]
        {
            if config.turso_url_env.is_some() || config.turso_token_env.is_some() {
                return Err(AppError::Config(
                    "Turso settings present but the `turso` feature is disabled".to_string(),
                ));
            }
        }

        if config.url == ":memory:" {
            Ok(DatabaseProvider::Memory)
        } else {
            Ok(DatabaseProvider::SQLite {
                path: config.url.clone(),
            })
        }
    }
}
