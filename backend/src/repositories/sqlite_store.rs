//! SQLite-backed credential store.
//!
//! Implements the `CredentialStore` contract over the shared sqlx pool. The
//! refresh-token lifetime is captured at construction and mirrors the token's
//! own signed expiry.

use crate::database::models::{RefreshToken, User};
use crate::repositories::credential_store::CredentialStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct SqliteCredentialStore {
    /// Shared database connection pool
    pool: SqlitePool,
    refresh_token_ttl: Duration,
}

impl SqliteCredentialStore {
    /// Creates a new store over the given pool.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool
    /// * `refresh_token_ttl_seconds` - lifetime recorded on new refresh-token rows
    pub fn new(pool: SqlitePool, refresh_token_ttl_seconds: u64) -> Self {
        Self {
            pool,
            refresh_token_ttl: Duration::seconds(refresh_token_ttl_seconds as i64),
        }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_refresh_token(&self, user_id: &str, token: &str) -> Result<RefreshToken> {
        let now = Utc::now();

        let record = sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token, created_at, expires_at, revoked)
            VALUES (?, ?, ?, ?, ?, 0)
            RETURNING id, user_id, token, created_at, expires_at, revoked
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user_id)
        .bind(token)
        .bind(now)
        .bind(now + self.refresh_token_ttl)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_live_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        let record = sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT id, user_id, token, created_at, expires_at, revoked
            FROM refresh_tokens
            WHERE token = ? AND revoked = 0 AND expires_at > ?
            "#,
        )
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<()> {
        sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
