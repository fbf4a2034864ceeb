//! Request field validation.
//!
//! Runs before any store access. Each field reports at most one problem, in
//! the order required, length, format.

use validator::{Validate, ValidationError as FieldError, ValidationErrors};

use common::ValidationError;
use domain::{EMPTY_ID, MAX_EMAIL_LENGTH, MAX_PASSWORD_LENGTH, MIN_EMAIL_LENGTH, MIN_PASSWORD_LENGTH};

const REQUIRED: &str = "required";

/// Email and password that passed validation.
#[derive(Debug, Validate)]
pub struct Credentials {
    #[validate(
        custom(function = "email_shape"),
        length(min = MIN_EMAIL_LENGTH, max = MAX_EMAIL_LENGTH),
        email
    )]
    pub email: String,

    #[validate(
        custom(function = "not_empty"),
        length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH)
    )]
    pub password: String,
}

impl Credentials {
    /// Validate raw request fields, email before password.
    pub fn parse(email: String, password: String) -> Result<Self, ValidationError> {
        let credentials = Self { email, password };

        if let Err(errors) = credentials.validate() {
            for (field, min, max) in [
                ("email", MIN_EMAIL_LENGTH, MAX_EMAIL_LENGTH),
                ("password", MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH),
            ] {
                if let Some(err) = first_error(&errors, field, min, max) {
                    return Err(err);
                }
            }
        }

        Ok(credentials)
    }
}

/// Numeric identifiers must be set.
pub fn require_id(field: &'static str, id: i64) -> Result<(), ValidationError> {
    if id == EMPTY_ID {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

fn first_error(
    errors: &ValidationErrors,
    field: &'static str,
    min: u64,
    max: u64,
) -> Option<ValidationError> {
    let field_errors = errors.field_errors();
    let found = field_errors.get(field)?;

    let has = |code: &str| found.iter().any(|e| e.code == code);
    let reason = if has(REQUIRED) {
        REQUIRED.to_string()
    } else if has("length") {
        format!("the length must be between {} and {}", min, max)
    } else {
        "must be a valid email address".to_string()
    };

    Some(ValidationError::new(field, reason))
}

fn not_empty(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::new(REQUIRED));
    }
    Ok(())
}

/// Presence, plus a domain ending in a top-level label. The `email` rule
/// alone accepts bare hosts like `localhost`.
fn email_shape(value: &str) -> Result<(), FieldError> {
    not_empty(value)?;

    let domain = value.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("");
    let valid = domain
        .rsplit_once('.')
        .map(|(host, tld)| !host.is_empty() && is_top_level_label(tld))
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(FieldError::new("email"))
    }
}

/// Two or more ASCII letters, or a punycode label such as `xn--p1ai`.
fn is_top_level_label(label: &str) -> bool {
    match label.strip_prefix("xn--") {
        Some(encoded) => {
            !encoded.is_empty() && encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        }
        None => label.len() >= 2 && label.chars().all(|c| c.is_ascii_alphabetic()),
    }
}
