//! Application (tenant) domain entity.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_APP_SECRET_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Registered consumer of the auth service.
///
/// The secret signs every session token issued for this application.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing)]
    pub secret: String,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl App {
    /// Signing key bytes.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    /// Check that a new application's name and secret are acceptable.
    pub fn validate_new(name: &str, secret: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("App name cannot be empty"));
        }
        if secret.len() < MIN_APP_SECRET_LENGTH {
            return Err(DomainError::validation(format!(
                "App secret must be at least {} bytes",
                MIN_APP_SECRET_LENGTH
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new() {
        assert!(App::validate_new("billing", "0123456789abcdef").is_ok());
        assert!(App::validate_new("  ", "0123456789abcdef").is_err());
        assert!(App::validate_new("billing", "short").is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let app = App {
            id: 1,
            name: "billing".to_string(),
            secret: "super-secret-value".to_string(),
        };
        assert!(!format!("{:?}", app).contains("super-secret-value"));
    }
}
