//! Persistence contract consumed by the authentication service.
//!
//! This is the full storage interface the core requires from any backend:
//! user lookup/creation plus refresh-token issuance, liveness lookup and
//! revocation. Implementations return `anyhow::Result` so raw infrastructure
//! failures propagate untranslated to the caller.

use crate::database::models::{RefreshToken, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks up a user by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Creates a user record with the given email and password hash.
    ///
    /// Email uniqueness is enforced by the store itself; a violation (e.g.
    /// two concurrent registrations racing past the existence pre-check)
    /// surfaces as a generic store error, not a typed conflict.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User>;

    /// Persists a newly issued refresh token for a user.
    async fn create_refresh_token(&self, user_id: &str, token: &str) -> Result<RefreshToken>;

    /// Finds the record for a refresh token that is neither revoked nor
    /// expired. Revoked and expired records are treated as absent.
    async fn find_live_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>>;

    /// Marks the record for a refresh token as revoked.
    async fn revoke_refresh_token(&self, token: &str) -> Result<()>;
}
