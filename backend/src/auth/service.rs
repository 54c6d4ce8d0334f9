//! Core business logic for the authentication system.
//!
//! Registration, login and refresh each run a fixed sequence over three
//! injected capabilities: the credential store, the password codec and the
//! token minter. The service itself keeps no mutable state; consistency
//! guarantees (email uniqueness, single-use refresh tokens) are delegated to
//! the store.

use crate::auth::models::{LoginRequest, RefreshTokenRequest, RegisterRequest, TokenPairResponse};
use crate::config::Config;
use crate::errors::{ConfigError, ServiceError, ServiceResult};
use crate::repositories::credential_store::CredentialStore;
use crate::repositories::sqlite_store::SqliteCredentialStore;
use crate::utils::jwt::{JwtMinter, TokenKind, TokenMinter};
use crate::utils::password::{BcryptCodec, PasswordCodec};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Authentication service for registration, login and token rotation
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    passwords: Arc<dyn PasswordCodec>,
    tokens: Arc<dyn TokenMinter>,
}

impl AuthService {
    /// Creates a service over explicit capability instances.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        passwords: Arc<dyn PasswordCodec>,
        tokens: Arc<dyn TokenMinter>,
    ) -> Self {
        AuthService {
            store,
            passwords,
            tokens,
        }
    }

    /// Wires the production capabilities: SQLite store, bcrypt codec and the
    /// JWT minter. Fails when the signing secrets are not configured.
    pub fn from_config(pool: &SqlitePool, config: &Config) -> Result<Self, ConfigError> {
        let minter = JwtMinter::new(config)?;

        Ok(AuthService::new(
            Arc::new(SqliteCredentialStore::new(
                pool.clone(),
                config.refresh_token_ttl_seconds,
            )),
            Arc::new(BcryptCodec),
            Arc::new(minter),
        ))
    }

    /// Registers a new account and issues its first token pair.
    ///
    /// The email existence pre-check produces the user-facing conflict; an
    /// unexpected store failure at any step propagates untranslated. Two
    /// concurrent registrations can both pass the pre-check; the store's
    /// uniqueness constraint is the backstop for that race, surfacing as a
    /// generic store error.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<TokenPairResponse> {
        if self
            .store
            .find_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(ServiceError::conflict("User already exists"));
        }

        let password_hash = self.passwords.hash(&request.password)?;
        let user = self
            .store
            .create_user(&request.email, &password_hash)
            .await?;

        self.issue_token_pair(&user.id).await
    }

    /// Authenticates an existing account and issues a fresh token pair.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<TokenPairResponse> {
        // Unknown email and wrong password answer identically so the
        // response does not reveal whether an email is registered.
        let user = self
            .store
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("Invalid credentials"))?;

        if !self
            .passwords
            .verify(&request.password, &user.password_hash)?
        {
            return Err(ServiceError::unauthorized("Invalid credentials"));
        }

        self.issue_token_pair(&user.id).await
    }

    /// Exchanges a live refresh token for a new token pair.
    ///
    /// Refresh tokens are single-use: the presented token is revoked before
    /// the replacement pair is issued, so replaying it fails.
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<TokenPairResponse> {
        let claims = self
            .tokens
            .verify(&request.refresh_token, TokenKind::Refresh)
            .map_err(|_| ServiceError::unauthorized("Invalid refresh token"))?;

        self.store
            .find_live_refresh_token(&request.refresh_token)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("Invalid refresh token"))?;

        self.store
            .revoke_refresh_token(&request.refresh_token)
            .await?;

        self.issue_token_pair(claims.user_id()).await
    }

    /// Issues an access/refresh pair and persists the refresh token.
    async fn issue_token_pair(&self, user_id: &str) -> ServiceResult<TokenPairResponse> {
        let access_token = self.tokens.issue(user_id, TokenKind::Access)?;
        let refresh_token = self.tokens.issue(user_id, TokenKind::Refresh)?;

        self.store
            .create_refresh_token(user_id, &refresh_token)
            .await?;

        Ok(TokenPairResponse {
            access_token,
            refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{RefreshToken, User};
    use crate::repositories::memory_store::InMemoryCredentialStore;
    use anyhow::bail;
    use async_trait::async_trait;
    use axum::http::StatusCode;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_access_secret: "access-secret-for-tests".to_string(),
            jwt_refresh_secret: "refresh-secret-for-tests".to_string(),
            access_token_ttl_seconds: 900,
            refresh_token_ttl_seconds: 604800,
            server_port: 3001,
        }
    }

    /// Fresh service over a fresh in-memory store; no state leaks between tests.
    fn test_service() -> (AuthService, Arc<InMemoryCredentialStore>) {
        let config = test_config();
        let store = Arc::new(InMemoryCredentialStore::new(
            config.refresh_token_ttl_seconds,
        ));
        let service = AuthService::new(
            store.clone(),
            Arc::new(BcryptCodec),
            Arc::new(JwtMinter::new(&config).unwrap()),
        );
        (service, store)
    }

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn refresh_request(token: &str) -> RefreshTokenRequest {
        RefreshTokenRequest {
            refresh_token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, _) = test_service();

        let registered = service
            .register(register_request("alice@example.com", "pw1"))
            .await
            .unwrap();
        assert!(!registered.access_token.is_empty());
        assert!(!registered.refresh_token.is_empty());

        let logged_in = service
            .login(login_request("alice@example.com", "pw1"))
            .await
            .unwrap();
        assert!(!logged_in.access_token.is_empty());
        assert!(!logged_in.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (service, store) = test_service();
        service
            .register(register_request("alice@example.com", "pw1"))
            .await
            .unwrap();

        let user = store
            .find_user_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash, "pw1");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_duplicate_register_is_conflict() {
        let (service, _) = test_service();
        service
            .register(register_request("alice@example.com", "pw1"))
            .await
            .unwrap();

        let err = service
            .register(register_request("alice@example.com", "pw2"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "User already exists");

        // The original credentials are untouched by the failed attempt
        assert!(
            service
                .login(login_request("alice@example.com", "pw1"))
                .await
                .is_ok()
        );
        assert!(
            service
                .login(login_request("alice@example.com", "pw2"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = test_service();
        service
            .register(register_request("alice@example.com", "pw1"))
            .await
            .unwrap();

        let wrong_password = service
            .login(login_request("alice@example.com", "wrong"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_request("nobody@example.com", "pw1"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.status_code(), unknown_email.status_code());
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let (service, _) = test_service();
        let pair = service
            .register(register_request("alice@example.com", "pw1"))
            .await
            .unwrap();

        let rotated = service
            .refresh(refresh_request(&pair.refresh_token))
            .await
            .unwrap();
        assert_ne!(rotated.refresh_token, pair.refresh_token);

        // The spent token is gone; the replacement still works
        let replay = service
            .refresh(refresh_request(&pair.refresh_token))
            .await
            .unwrap_err();
        assert_eq!(replay.status_code(), StatusCode::UNAUTHORIZED);

        assert!(
            service
                .refresh(refresh_request(&rotated.refresh_token))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_refresh_rejects_garbage_and_access_tokens() {
        let (service, _) = test_service();
        let pair = service
            .register(register_request("alice@example.com", "pw1"))
            .await
            .unwrap();

        let garbage = service
            .refresh(refresh_request("not.a.token"))
            .await
            .unwrap_err();
        assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);

        // An access token is signed with the other secret and must not pass
        let wrong_kind = service
            .refresh(refresh_request(&pair.access_token))
            .await
            .unwrap_err();
        assert_eq!(wrong_kind.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_kind.to_string(), "Invalid refresh token");
    }

    #[tokio::test]
    async fn test_tokens_carry_the_user_id() {
        let config = test_config();
        let minter = JwtMinter::new(&config).unwrap();
        let (service, store) = test_service();

        let pair = service
            .register(register_request("alice@example.com", "pw1"))
            .await
            .unwrap();
        let user = store
            .find_user_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();

        let claims = minter.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, user.id);
        let claims = minter
            .verify(&pair.refresh_token, TokenKind::Refresh)
            .unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn test_credential_lifecycle() {
        let (service, _) = test_service();

        let registered = service
            .register(register_request("alice@example.com", "pw1"))
            .await
            .unwrap();

        service
            .login(login_request("alice@example.com", "pw1"))
            .await
            .unwrap();

        let bad_login = service
            .login(login_request("alice@example.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(bad_login.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(bad_login.to_string(), "Invalid credentials");

        let rotated = service
            .refresh(refresh_request(&registered.refresh_token))
            .await
            .unwrap();
        assert!(!rotated.access_token.is_empty());

        let replay = service
            .refresh(refresh_request(&registered.refresh_token))
            .await
            .unwrap_err();
        assert_eq!(replay.status_code(), StatusCode::UNAUTHORIZED);
    }

    /// Store double whose operations all fail like a dead database.
    struct FailingStore;

    #[async_trait]
    impl CredentialStore for FailingStore {
        async fn find_user_by_email(&self, _email: &str) -> anyhow::Result<Option<User>> {
            bail!("connection refused")
        }

        async fn create_user(&self, _email: &str, _hash: &str) -> anyhow::Result<User> {
            bail!("connection refused")
        }

        async fn create_refresh_token(
            &self,
            _user_id: &str,
            _token: &str,
        ) -> anyhow::Result<RefreshToken> {
            bail!("connection refused")
        }

        async fn find_live_refresh_token(
            &self,
            _token: &str,
        ) -> anyhow::Result<Option<RefreshToken>> {
            bail!("connection refused")
        }

        async fn revoke_refresh_token(&self, _token: &str) -> anyhow::Result<()> {
            bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_store_failures_propagate_untranslated() {
        let config = test_config();
        let service = AuthService::new(
            Arc::new(FailingStore),
            Arc::new(BcryptCodec),
            Arc::new(JwtMinter::new(&config).unwrap()),
        );

        let err = service
            .register(register_request("alice@example.com", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Database { .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
