//! In-memory credential store.
//!
//! Reference implementation of the `CredentialStore` contract used by the
//! service tests; each test constructs a fresh instance so no state leaks
//! between cases.

use crate::database::models::{RefreshToken, User};
use crate::repositories::credential_store::CredentialStore;
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Mutex;
use uuid::Uuid;

pub struct InMemoryCredentialStore {
    users: Mutex<Vec<User>>,
    tokens: Mutex<Vec<RefreshToken>>,
    refresh_token_ttl: Duration,
}

impl InMemoryCredentialStore {
    pub fn new(refresh_token_ttl_seconds: u64) -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            refresh_token_ttl: Duration::seconds(refresh_token_ttl_seconds as i64),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let mut users = self.users.lock().unwrap();

        // Same backstop a relational schema provides via UNIQUE(email)
        if users.iter().any(|u| u.email == email) {
            bail!("UNIQUE constraint failed: users.email");
        }

        let user = User {
            id: Uuid::now_v7().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn create_refresh_token(&self, user_id: &str, token: &str) -> Result<RefreshToken> {
        let now = Utc::now();
        let record = RefreshToken {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            token: token.to_string(),
            created_at: now,
            expires_at: now + self.refresh_token_ttl,
            revoked: false,
        };

        let mut tokens = self.tokens.lock().unwrap();
        tokens.push(record.clone());

        Ok(record)
    }

    async fn find_live_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        let now = Utc::now();
        let tokens = self.tokens.lock().unwrap();

        Ok(tokens
            .iter()
            .find(|t| t.token == token && !t.revoked && t.expires_at > now)
            .cloned())
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<()> {
        let mut tokens = self.tokens.lock().unwrap();
        for record in tokens.iter_mut().filter(|t| t.token == token) {
            record.revoked = true;
        }

        Ok(())
    }
}
