//! HS256 session tokens signed with the application secret.
//!
//! Anyone holding the application secret can verify a token without a store
//! round trip. Expiry is judged against the injected [`Clock`], never the
//! system time directly.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::Clock;
use common::{AppError, AppResult};
use domain::{App, User};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub uid: i64,
    pub email: String,
    /// Application the token was issued for
    pub app_id: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens.
pub struct TokenIssuer {
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Sign a token for `user` in `app`, valid for `ttl` from now.
    pub fn issue(&self, user: &User, app: &App, ttl: Duration) -> AppResult<String> {
        let now = self.clock.now();

        let claims = Claims {
            uid: user.id,
            email: user.email.clone(),
            app_id: app.id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(app.secret_bytes()),
        )?;

        Ok(token)
    }

    /// Check signature, application binding and expiry.
    pub fn verify(&self, token: &str, app: &App) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(app.secret_bytes()),
            &validation,
        )?
        .claims;

        if claims.app_id != app.id {
            return Err(AppError::invalid_token(format!(
                "token issued for app {}, not {}",
                claims.app_id, app.id
            )));
        }
        if self.clock.now().timestamp() >= claims.exp {
            return Err(AppError::TokenExpired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ManualClock;
    use chrono::{TimeZone, Utc};

    fn test_app() -> App {
        App {
            id: 1,
            name: "test".to_string(),
            secret: "test-secret-key-for-testing-only".to_string(),
        }
    }

    fn test_user() -> User {
        User {
            id: 42,
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    fn clock_at_epoch() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_issue_embeds_identity_and_expiry() {
        let clock = clock_at_epoch();
        let issuer = TokenIssuer::new(clock.clone());

        let token = issuer
            .issue(&test_user(), &test_app(), Duration::hours(1))
            .unwrap();
        let claims = issuer.verify(&token, &test_app()).unwrap();

        assert_eq!(claims.uid, 42);
        assert_eq!(claims.app_id, 1);
        assert_eq!(claims.email, "someone@example.com");
        assert_eq!(claims.iat, clock.now().timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_issue_is_deterministic_for_same_time() {
        let issuer = TokenIssuer::new(clock_at_epoch());

        let first = issuer
            .issue(&test_user(), &test_app(), Duration::minutes(5))
            .unwrap();
        let second = issuer
            .issue(&test_user(), &test_app(), Duration::minutes(5))
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let clock = clock_at_epoch();
        let issuer = TokenIssuer::new(clock.clone());

        let token = issuer
            .issue(&test_user(), &test_app(), Duration::seconds(1))
            .unwrap();
        assert!(issuer.verify(&token, &test_app()).is_ok());

        clock.advance(Duration::seconds(2));
        let result = issuer.verify(&token, &test_app());
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenIssuer::new(clock_at_epoch());
        let token = issuer
            .issue(&test_user(), &test_app(), Duration::hours(1))
            .unwrap();

        let impostor = App {
            secret: "another-secret-key-entirely-000".to_string(),
            ..test_app()
        };
        assert!(matches!(
            issuer.verify(&token, &impostor),
            Err(AppError::Jwt(_))
        ));
    }

    #[test]
    fn test_token_bound_to_app() {
        let issuer = TokenIssuer::new(clock_at_epoch());
        let token = issuer
            .issue(&test_user(), &test_app(), Duration::hours(1))
            .unwrap();

        let other = App {
            id: 2,
            ..test_app()
        };
        assert!(matches!(
            issuer.verify(&token, &other),
            Err(AppError::InvalidToken(_))
        ));
    }
}
