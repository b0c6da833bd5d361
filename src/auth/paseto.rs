use crate::types::{AppError, Result, Role, SessionClaims};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use pasetors::{
    keys::{AsymmetricKeyPair, AsymmetricPublicKey, AsymmetricSecretKey, Generate},
    token::UntrustedToken,
    version4::{PublicToken, V4},
    Public,
};
use serde::Serialize;

/// Message returned for every rejected token, whatever the cause.
pub const INVALID_SESSION: &str = "Invalid or expired session";

/// Claim-level settings for issued and accepted tokens.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
    pub clock_tolerance: Duration,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            issuer: "lexgate".to_string(),
            audience: "lexgate-clients".to_string(),
            ttl: Duration::hours(24),
            clock_tolerance: Duration::seconds(30),
        }
    }
}

/// Issues and verifies PASETO v4.public session tokens.
///
/// Tokens are Ed25519-signed, not encrypted: the claims are readable by the
/// holder but cannot be altered without the secret key.
pub struct SessionTokenService {
    secret_key: AsymmetricSecretKey<V4>,
    public_key: AsymmetricPublicKey<V4>,
    settings: TokenSettings,
}

#[derive(Serialize)]
struct ClaimsRef<'a> {
    sub: &'a str,
    role: Role,
    aud: &'a str,
    iss: &'a str,
    iat: DateTime<Utc>,
    exp: DateTime<Utc>,
}

impl SessionTokenService {
    pub fn new(
        secret_key: AsymmetricSecretKey<V4>,
        public_key: AsymmetricPublicKey<V4>,
        settings: TokenSettings,
    ) -> Self {
        Self {
            secret_key,
            public_key,
            settings,
        }
    }

    /// Builds the service from hex-encoded keys (64-byte secret, 32-byte public).
    pub fn from_hex(secret_hex: &str, public_hex: &str, settings: TokenSettings) -> Result<Self> {
        let secret_bytes = hex::decode(secret_hex.trim())
            .map_err(|e| AppError::Config(format!("PASETO secret key is not valid hex: {}", e)))?;
        let public_bytes = hex::decode(public_hex.trim())
            .map_err(|e| AppError::Config(format!("PASETO public key is not valid hex: {}", e)))?;

        // An Ed25519 secret key carries its public half in the last 32 bytes
        if secret_bytes.len() == 64
            && public_bytes.len() == 32
            && secret_bytes[32..] != public_bytes[..]
        {
            return Err(AppError::Config(
                "PASETO public key does not belong to the secret key".to_string(),
            ));
        }

        let secret_key = AsymmetricSecretKey::<V4>::from(&secret_bytes)
            .map_err(|e| AppError::Config(format!("Invalid PASETO secret key: {:?}", e)))?;
        let public_key = AsymmetricPublicKey::<V4>::from(&public_bytes)
            .map_err(|e| AppError::Config(format!("Invalid PASETO public key: {:?}", e)))?;

        Ok(Self::new(secret_key, public_key, settings))
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Issues a token for `user_id` valid for the configured TTL.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: &str, role: Role, now: DateTime<Utc>) -> Result<String> {
        let iat = now.trunc_subsecs(0);
        let claims = ClaimsRef {
            sub: user_id,
            role,
            aud: &self.settings.audience,
            iss: &self.settings.issuer,
            iat,
            exp: iat
                .checked_add_signed(self.settings.ttl)
                .ok_or_else(|| AppError::Internal("Token expiry out of range".to_string()))?,
        };

        let payload = serde_json::to_vec(&claims)
            .map_err(|e| AppError::Internal(format!("Failed to encode claims: {}", e)))?;

        PublicToken::sign(&self.secret_key, &payload, None, None)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {:?}", e)))
    }

    /// Verifies signature and claims. When `expected_user_id` is given the
    /// subject must match it.
    ///
    /// Every failure is reported as the same [`AppError::Unauthorized`].
    pub fn verify(&self, token: &str, expected_user_id: Option<&str>) -> Result<SessionClaims> {
        self.verify_at(token, expected_user_id, Utc::now())
    }

    /// Verifies a token against the clock value `now`.
    pub fn verify_at(
        &self,
        token: &str,
        expected_user_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims> {
        self.check(token, expected_user_id, now).map_err(|reason| {
            tracing::debug!("Session token rejected: {}", reason);
            AppError::Unauthorized(INVALID_SESSION.to_string())
        })
    }

    fn check(
        &self,
        token: &str,
        expected_user_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> std::result::Result<SessionClaims, String> {
        let untrusted = UntrustedToken::<Public, V4>::try_from(token)
            .map_err(|e| format!("malformed token: {:?}", e))?;
        let trusted = PublicToken::verify(&self.public_key, &untrusted, None, None)
            .map_err(|e| format!("signature check failed: {:?}", e))?;
        let claims: SessionClaims = serde_json::from_str(trusted.payload())
            .map_err(|e| format!("unreadable claims: {}", e))?;

        if claims.aud != self.settings.audience {
            return Err(format!("audience mismatch: {}", claims.aud));
        }
        if claims.iss != self.settings.issuer {
            return Err(format!("issuer mismatch: {}", claims.iss));
        }
        if let Some(expected) = expected_user_id {
            if claims.sub != expected {
                return Err("subject mismatch".to_string());
            }
        }

        let tolerance = self.settings.clock_tolerance;
        let latest = claims
            .exp
            .checked_add_signed(tolerance)
            .ok_or("expiry out of range")?;
        let earliest = claims
            .iat
            .checked_sub_signed(tolerance)
            .ok_or("issued-at out of range")?;
        if latest < now {
            return Err(format!("expired at {}", claims.exp));
        }
        if earliest > now {
            return Err(format!("issued in the future at {}", claims.iat));
        }

        Ok(claims)
    }
}

/// Generates a fresh v4.public key pair, hex encoded as `(secret, public)`.
pub fn generate_keypair() -> Result<(String, String)> {
    let pair = AsymmetricKeyPair::<V4>::generate()
        .map_err(|e| AppError::Internal(format!("Failed to generate key pair: {:?}", e)))?;

    Ok((
        hex::encode(pair.secret.as_bytes()),
        hex::encode(pair.public.as_bytes()),
    ))
}
