//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, JWT signing secrets and token lifetimes.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    /// Secret used to sign and verify access tokens.
    pub jwt_access_secret: String,
    /// Secret used to sign and verify refresh tokens. Kept separate from the
    /// access secret so a leak of one cannot forge the other kind.
    pub jwt_refresh_secret: String,
    pub access_token_ttl_seconds: u64,
    pub refresh_token_ttl_seconds: u64,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// The JWT secrets default to empty strings here; their presence is
    /// enforced once at service construction, not per request.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_access_secret = env::var("JWT_SECRET").unwrap_or_default();
        let jwt_refresh_secret = env::var("JWT_REFRESH_SECRET").unwrap_or_default();

        // 15 minutes for access tokens, 7 days for refresh tokens
        let access_token_ttl_seconds = env::var("JWT_ACCESS_TTL_SECONDS")
            .unwrap_or_else(|_| "900".to_string())
            .parse::<u64>()
            .context("JWT_ACCESS_TTL_SECONDS must be a valid number")?;

        let refresh_token_ttl_seconds = env::var("JWT_REFRESH_TTL_SECONDS")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<u64>()
            .context("JWT_REFRESH_TTL_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_access_secret,
            jwt_refresh_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
            server_port,
        })
    }
}
