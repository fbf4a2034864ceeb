//! SSO service configuration.

use std::env;
use std::str::FromStr;

use chrono::Duration;

use common::{AppError, AppResult, DatabaseConfig, GrpcServerConfig};
use domain::DEFAULT_TOKEN_TTL_SECONDS;

/// SSO service configuration.
#[derive(Debug, Clone)]
pub struct SsoConfig {
    /// gRPC listener settings
    pub server: GrpcServerConfig,
    /// Credential store settings
    pub database: DatabaseConfig,
    /// Lifetime of issued session tokens
    pub token_ttl: Duration,
}

impl SsoConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server: GrpcServerConfig {
                host: env::var("SSO_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SSO_PORT").unwrap_or(defaults.server.port),
                request_timeout_ms: parse_var("SSO_REQUEST_TIMEOUT_MS")
                    .unwrap_or(defaults.server.request_timeout_ms),
            },
            database: DatabaseConfig {
                url: env::var("SSO_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: parse_var("SSO_DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.database.max_connections),
                min_connections: defaults.database.min_connections,
                statement_timeout_ms: parse_var("SSO_STORE_TIMEOUT_MS")
                    .unwrap_or(defaults.database.statement_timeout_ms),
            },
            token_ttl: parse_var::<i64>("SSO_TOKEN_TTL_SECONDS")
                .map(Duration::seconds)
                .unwrap_or(defaults.token_ttl),
        }
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.token_ttl <= Duration::zero() {
            return Err(AppError::internal("token TTL must be positive"));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(AppError::internal("request timeout must be positive"));
        }
        if self.database.statement_timeout_ms == 0 {
            return Err(AppError::internal("store timeout must be positive"));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::internal("database pool needs at least one connection"));
        }
        Ok(())
    }
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            server: GrpcServerConfig::default(),
            database: DatabaseConfig::default(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
