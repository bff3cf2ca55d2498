//! User Service
//!
//! Registration, credential checks and session lifecycle.

use crate::error::AppError;
use crate::models::{RegisterRequest, SessionToken, User};
use crate::password::PasswordHasher;
use crate::store::UserStore;
use crate::token::TokenCodec;

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Identity attached to a request once the auth gate has accepted it
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// User entity manager
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenCodec,
    min_password_length: usize,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        tokens: TokenCodec,
        min_password_length: usize,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            min_password_length,
        }
    }

    /// Register a new user
    pub async fn register(&self, mut req: RegisterRequest) -> Result<User, AppError> {
        req.email = req.email.trim().to_string();
        req.validate()?;

        if req.password.chars().count() < self.min_password_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                self.min_password_length
            )));
        }

        if self.store.find_user_by_email(&req.email).await?.is_some() {
            return Err(AppError::EmailExists);
        }

        let password_hash = self.hasher.hash(&req.password)?;
        let user = self.store.insert_user(&req.email, &password_hash).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Look up a user by email and password.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .store
            .find_user_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Password verification failed");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Issue a session token and record it on the user
    pub async fn issue_session(&self, user: &User) -> Result<String, AppError> {
        let token = self.tokens.issue(user.id)?;
        self.store
            .push_token(user.id, SessionToken::auth(token.clone()))
            .await?;

        tracing::info!(user_id = %user.id, "Session issued");
        Ok(token)
    }

    /// Remove a session token from the user; unknown tokens are ignored
    pub async fn revoke_session(&self, user: &User, token: &str) -> Result<(), AppError> {
        self.store.pull_token(user.id, token).await?;

        tracing::info!(user_id = %user.id, "Session revoked");
        Ok(())
    }

    /// Get user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.store.find_user_by_id(id).await
    }

    /// Resolve a presented token to its owner.
    ///
    /// Fails with [`AppError::Unauthorized`] when the token does not verify,
    /// its user is gone, or the session has been revoked.
    pub async fn resolve_session(&self, token: &str) -> Result<CurrentUser, AppError> {
        let user_id = self
            .tokens
            .verify(token)
            .map_err(|_| AppError::Unauthorized)?;

        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.has_session(token) {
            tracing::debug!(user_id = %user.id, "Token is not an active session");
            return Err(AppError::Unauthorized);
        }

        Ok(CurrentUser {
            user,
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::store::MemoryStore;
    use tokio_test::assert_ok;

    fn service() -> (UserService, Arc<MemoryStore>) {
        let config = AppConfig::for_tests();
        let store = Arc::new(MemoryStore::new());
        let service = UserService::new(
            store.clone(),
            PasswordHasher::new(&config).unwrap(),
            TokenCodec::from_config(&config),
            config.min_password_length,
        );
        (service, store)
    }

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let (service, _) = service();

        let user = assert_ok!(service.register(register_request("a@b.com", "asdfasdf")).await);
        assert_ne!(user.password_hash, "asdfasdf");
        assert!(user.tokens.is_empty());

        let authed = assert_ok!(service.authenticate("a@b.com", "asdfasdf").await);
        assert_eq!(authed.id, user.id);
    }

    #[tokio::test]
    async fn test_register_trims_email() {
        let (service, _) = service();

        let user = service
            .register(register_request("  a@b.com ", "asdfasdf"))
            .await
            .unwrap();
        assert_eq!(user.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let (service, store) = service();

        assert!(matches!(
            service.register(register_request("email", "password")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.register(register_request("a@b.com", "12345")).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let (service, store) = service();

        service
            .register(register_request("a@b.com", "asdfasdf"))
            .await
            .unwrap();
        let second = service.register(register_request("a@b.com", "123456")).await;

        assert!(matches!(second, Err(AppError::EmailExists)));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_indistinguishable() {
        let (service, _) = service();
        service
            .register(register_request("a@b.com", "asdfasdf"))
            .await
            .unwrap();

        let wrong_password = service.authenticate("a@b.com", "123456").await;
        let unknown_email = service.authenticate("x@y.com", "asdfasdf").await;

        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (service, _) = service();
        let user = service
            .register(register_request("a@b.com", "asdfasdf"))
            .await
            .unwrap();

        let token = service.issue_session(&user).await.unwrap();
        let current = assert_ok!(service.resolve_session(&token).await);
        assert_eq!(current.user.id, user.id);
        assert_eq!(current.user.tokens, vec![SessionToken::auth(token.clone())]);

        service.revoke_session(&user, &token).await.unwrap();
        assert!(matches!(
            service.resolve_session(&token).await,
            Err(AppError::Unauthorized)
        ));

        // revoking again is a no-op
        assert_ok!(service.revoke_session(&user, &token).await);
    }

    #[tokio::test]
    async fn test_revoking_one_session_keeps_others() {
        let (service, _) = service();
        let user = service
            .register(register_request("a@b.com", "asdfasdf"))
            .await
            .unwrap();

        let first = service.issue_session(&user).await.unwrap();
        let second = service.issue_session(&user).await.unwrap();
        service.revoke_session(&user, &first).await.unwrap();

        assert!(service.resolve_session(&first).await.is_err());
        assert_ok!(service.resolve_session(&second).await);
    }

    #[tokio::test]
    async fn test_resolve_session_rejects_unknown_user() {
        let (service, _) = service();
        let config = AppConfig::for_tests();
        let orphan = TokenCodec::from_config(&config).issue(Uuid::new_v4()).unwrap();

        assert!(matches!(
            service.resolve_session(&orphan).await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            service.resolve_session("garbage").await,
            Err(AppError::Unauthorized)
        ));
    }
}
