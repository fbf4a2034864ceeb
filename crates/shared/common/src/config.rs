//! Shared configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// gRPC server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrpcServerConfig {
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Upper bound on a single request, in milliseconds
    pub request_timeout_ms: u64,
}

impl GrpcServerConfig {
    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GrpcServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 44044,
            request_timeout_ms: 10_000,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Upper bound on a single store call, in milliseconds
    pub statement_timeout_ms: u64,
}

impl DatabaseConfig {
    /// Store call timeout as a duration.
    pub fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://storage/sso.db?mode=rwc".to_string(),
            max_connections: 5,
            min_connections: 1,
            statement_timeout_ms: 5_000,
        }
    }
}
