//! Error taxonomy and its translation to gRPC.
//!
//! Only two kinds of failure cross the service boundary: `INVALID_ARGUMENT`
//! for caller-correctable validation errors and `INTERNAL` for everything
//! else. Internal detail is logged here and never sent to the caller, so a
//! client cannot tell a wrong password from a missing account.

use domain::DomainError;
use thiserror::Error;
use tonic::Status;

/// Fixed message returned for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Caller-correctable input error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Request field name as it appears in the wire schema
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// The field was missing or empty.
    pub fn required(field: &'static str) -> Self {
        Self::new(field, "required")
    }
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // Authentication
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("App not found")]
    AppNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    // Token verification
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// A store call exceeded its deadline and was abandoned
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("Token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable identifier for logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::AppNotFound => "APP_NOT_FOUND",
            AppError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::InvalidToken(_) => "INVALID_TOKEN",
            AppError::Cancelled(_) => "CANCELLED",
            AppError::Domain(_) => "DOMAIN_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "TOKEN_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure is an expected outcome of a well-formed request
    /// (bad credentials, duplicate email) rather than a fault.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::InvalidCredentials
                | AppError::AppNotFound
                | AppError::UserAlreadyExists
                | AppError::UserNotFound
                | AppError::TokenExpired
                | AppError::InvalidToken(_)
        )
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        AppError::Cancelled(msg.into())
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        AppError::InvalidToken(msg.into())
    }
}

// =============================================================================
// gRPC Status (Tonic)
// =============================================================================

impl From<AppError> for Status {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(e) => Status::invalid_argument(e.to_string()),
            other => {
                if other.is_expected() {
                    tracing::warn!(code = other.code(), "request failed: {}", other);
                } else {
                    tracing::error!(code = other.code(), "request failed: {}", other);
                }
                Status::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
