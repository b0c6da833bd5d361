//! TOML-based configuration for Lexgate
//!
//! Server, authentication and database settings are read from `lexgate.toml`.
//! Secrets never live in the file: it names the environment variables that
//! hold them (`*_env` keys), which are resolved at start-up.

use crate::auth::paseto::TokenSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Longest accepted session lifetime (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;
/// Largest accepted clock skew allowance (one hour).
pub const MAX_CLOCK_TOLERANCE_SECS: i64 = 3600;

/// Root configuration structure loaded from lexgate.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexgateConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Front-end origin allowed to call the API with credentials
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Adds the `Secure` attribute to the session cookie (enable behind HTTPS)
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            cors_origin: default_cors_origin(),
            secure_cookies: false,
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the hex PASETO secret key
    #[serde(default = "default_secret_key_env")]
    pub paseto_secret_key_env: String,

    /// Environment variable name containing the hex PASETO public key
    #[serde(default = "default_public_key_env")]
    pub paseto_public_key_env: String,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_audience")]
    pub audience: String,

    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    #[serde(default = "default_clock_tolerance_secs")]
    pub clock_tolerance_secs: i64,
}

fn default_secret_key_env() -> String {
    "PASETO_SECRET_KEY".to_string()
}

fn default_public_key_env() -> String {
    "PASETO_PUBLIC_KEY".to_string()
}

fn default_issuer() -> String {
    "lexgate".to_string()
}

fn default_audience() -> String {
    "lexgate-clients".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_clock_tolerance_secs() -> i64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            paseto_secret_key_env: default_secret_key_env(),
            paseto_public_key_env: default_public_key_env(),
            issuer: default_issuer(),
            audience: default_audience(),
            token_ttl_hours: default_token_ttl_hours(),
            clock_tolerance_secs: default_clock_tolerance_secs(),
        }
    }
}

impl AuthConfig {
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            ttl: chrono::Duration::hours(self.token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS)),
            clock_tolerance: chrono::Duration::seconds(
                self.clock_tolerance_secs.clamp(0, MAX_CLOCK_TOLERANCE_SECS),
            ),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/lexgate.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Config(err.to_string())
    }
}

impl LexgateConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;

        config.validate()?;

        Ok(config)
    }

    /// Load a TOML file without validating it
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse without validation
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_env_var(&self.auth.paseto_secret_key_env)?;
        self.validate_env_var(&self.auth.paseto_public_key_env)?;

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_ttl_hours must be between 1 and {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }
        if !(0..=MAX_CLOCK_TOLERANCE_SECS).contains(&self.auth.clock_tolerance_secs) {
            return Err(ConfigError::ValidationError(format!(
                "auth.clock_tolerance_secs must be between 0 and {}",
                MAX_CLOCK_TOLERANCE_SECS
            )));
        }
        if self.auth.issuer.trim().is_empty() || self.auth.audience.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.issuer and auth.audience must not be empty".to_string(),
            ));
        }

        if self.server.cors_origin.parse::<axum::http::HeaderValue>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "server.cors_origin is not a valid header value: {}",
                self.server.cors_origin
            )));
        }

        match (&self.database.turso_url_env, &self.database.turso_token_env) {
            (Some(url_env), Some(token_env)) => {
                self.validate_env_var(url_env)?;
                self.validate_env_var(token_env)?;
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::ValidationError(
                    "database.turso_url_env and database.turso_token_env must be set together"
                        .to_string(),
                ))
            }
        }

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Hex PASETO secret key from the environment
    pub fn paseto_secret_key(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.paseto_secret_key_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.paseto_secret_key_env.clone()))
    }

    /// Hex PASETO public key from the environment
    pub fn paseto_public_key(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.paseto_public_key_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.paseto_public_key_env.clone()))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
