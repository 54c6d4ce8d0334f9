//! JWT token utilities for authentication and authorization.
//!
//! Provides token creation, validation, and claims management for the two
//! credential kinds the service issues: short-lived access tokens and
//! longer-lived refresh tokens, each signed with its own secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{ConfigError, ServiceError, ServiceResult};
use uuid::Uuid;

/// Discriminates the credential kind a token payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Claims structure embedded in every issued token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Which credential kind this token is
    pub kind: TokenKind,
    /// Unique token identifier; keeps two tokens minted within the same
    /// second from serializing to the same string
    pub jti: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Capability for issuing and verifying signed, time-bounded tokens.
///
/// Verification is purely cryptographic: signature, expiry and kind. Whether
/// a refresh token is still live in the store is a separate concern.
pub trait TokenMinter: Send + Sync {
    fn issue(&self, user_id: &str, kind: TokenKind) -> ServiceResult<String>;
    fn verify(&self, token: &str, kind: TokenKind) -> ServiceResult<Claims>;
}

/// JWT minter holding one signing key pair and lifetime per token kind.
pub struct JwtMinter {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl std::fmt::Debug for JwtMinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtMinter")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtMinter {
    /// Creates a new minter from the loaded configuration.
    ///
    /// Fails when either signing secret is missing or empty: the service
    /// cannot operate without signing material, so this is a startup-fatal
    /// condition rather than a recoverable service error. Token lifetimes are
    /// captured here and never change mid-process.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        if config.jwt_access_secret.is_empty() || config.jwt_refresh_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecrets);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Ok(JwtMinter {
            access_encoding_key: EncodingKey::from_secret(config.jwt_access_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(config.jwt_access_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            access_ttl: Duration::seconds(config.access_token_ttl_seconds as i64),
            refresh_ttl: Duration::seconds(config.refresh_token_ttl_seconds as i64),
            validation,
        })
    }

    fn encoding_key(&self, kind: TokenKind) -> &EncodingKey {
        match kind {
            TokenKind::Access => &self.access_encoding_key,
            TokenKind::Refresh => &self.refresh_encoding_key,
        }
    }

    fn decoding_key(&self, kind: TokenKind) -> &DecodingKey {
        match kind {
            TokenKind::Access => &self.access_decoding_key,
            TokenKind::Refresh => &self.refresh_decoding_key,
        }
    }

    fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

impl TokenMinter for JwtMinter {
    fn issue(&self, user_id: &str, kind: TokenKind) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now + self.lifetime(kind);

        let claims = Claims {
            sub: user_id.to_string(),
            kind,
            jti: Uuid::now_v7().to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, self.encoding_key(kind))
            .map_err(|e| ServiceError::internal(format!("Token generation failed: {}", e)))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> ServiceResult<Claims> {
        let claims = decode::<Claims>(token, self.decoding_key(kind), &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|_| ServiceError::unauthorized("Invalid or expired token"))?;

        // The two kinds use different secrets, but the discriminator is
        // checked as well so identical secrets cannot blur the kinds.
        if claims.kind != kind {
            return Err(ServiceError::unauthorized("Invalid or expired token"));
        }

        Ok(claims)
    }
}
