//! Authentication service - credential verification, user provisioning and
//! admin lookup.
//!
//! Every store call is bounded by the configured store timeout. Argon2 work
//! runs on the blocking pool so it never stalls the async workers.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{info, warn};

use crate::repository::{AppRepository, UserRepository};
use crate::token::TokenIssuer;
use common::{AppError, AppResult};
use domain::Password;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and return a session token for the application
    async fn login(&self, app_id: i32, email: &str, password: &str) -> AppResult<String>;

    /// Hash the password, store a new user and return its ID
    async fn register_new_user(&self, email: &str, password: &str) -> AppResult<i64>;

    /// Whether the user has admin rights
    async fn is_admin(&self, user_id: i64) -> AppResult<bool>;
}

/// Concrete implementation of AuthService over the credential store.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    apps: Arc<dyn AppRepository>,
    tokens: TokenIssuer,
    token_ttl: Duration,
    store_timeout: std::time::Duration,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        apps: Arc<dyn AppRepository>,
        tokens: TokenIssuer,
        token_ttl: Duration,
        store_timeout: std::time::Duration,
    ) -> Self {
        Self {
            users,
            apps,
            tokens,
            token_ttl,
            store_timeout,
        }
    }

    /// Run a store call, abandoning it once the store timeout elapses.
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                AppError::cancelled(format!(
                    "{} exceeded {}ms",
                    operation,
                    self.store_timeout.as_millis()
                ))
            })?
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, app_id: i32, email: &str, password: &str) -> AppResult<String> {
        let app = self
            .bounded("find app", self.apps.find_by_id(app_id))
            .await?
            .ok_or(AppError::AppNotFound)?;

        let user = self
            .bounded("find user", self.users.find_by_email(email))
            .await?;

        // Verify even when no user matched so a miss is not faster than a
        // wrong password
        let stored = user
            .as_ref()
            .map(|u| u.password())
            .unwrap_or_else(Password::dummy);
        let plain = password.to_owned();
        let password_valid = tokio::task::spawn_blocking(move || stored.verify(&plain))
            .await
            .map_err(|e| AppError::internal(format!("password verification task failed: {}", e)))?;

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                warn!(app_id, "Login rejected: invalid credentials");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(&user, &app, self.token_ttl)?;
        info!(user_id = user.id, app_id, "User logged in");

        Ok(token)
    }

    async fn register_new_user(&self, email: &str, password: &str) -> AppResult<i64> {
        let plain = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || Password::new(&plain))
            .await
            .map_err(|e| AppError::internal(format!("password hashing task failed: {}", e)))??
            .into_string();

        let user_id = self
            .bounded(
                "insert user",
                self.users.insert(email.to_owned(), password_hash),
            )
            .await
            .inspect_err(|e| {
                if matches!(e, AppError::UserAlreadyExists) {
                    warn!("Registration rejected: email already in use");
                }
            })?;

        info!(user_id, "User registered");
        Ok(user_id)
    }

    async fn is_admin(&self, user_id: i64) -> AppResult<bool> {
        let user = self
            .bounded("find user", self.users.find_by_id(user_id))
            .await?
            .ok_or(AppError::UserNotFound)?;

        info!(user_id, is_admin = user.is_admin, "Checked admin status");
        Ok(user.is_admin)
    }
}
