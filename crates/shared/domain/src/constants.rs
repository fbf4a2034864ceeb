//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum email length, in characters
pub const MIN_EMAIL_LENGTH: u64 = 12;

/// Maximum email length, in characters
pub const MAX_EMAIL_LENGTH: u64 = 100;

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length accepted for hashing
pub const MAX_PASSWORD_LENGTH: u64 = 100;

/// Sentinel for an unset numeric identifier in a request
pub const EMPTY_ID: i64 = 0;

// =============================================================================
// Authentication
// =============================================================================

/// Default session token lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Minimum application secret length
pub const MIN_APP_SECRET_LENGTH: usize = 16;
