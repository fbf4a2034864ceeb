//! User domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::password::Password;

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Global admin flag; not scoped to an application
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Stored password hash as a value object.
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_wraps_stored_hash() {
        let password = Password::new("longenoughpassword").unwrap();
        let user = User {
            id: 7,
            email: "a@b.co-example.com".to_string(),
            password_hash: password.into_string(),
            is_admin: false,
            created_at: Utc::now(),
        };

        assert!(user.password().verify("longenoughpassword"));
        assert!(!user.password().verify("longenoughpassworD"));
    }

    #[test]
    fn test_serialization_skips_hash() {
        let user = User {
            id: 1,
            email: "someone@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            is_admin: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
