//! gRPC protocol buffer definitions.
//!
//! Generated from `proto/sso.proto`: the `auth.Auth` service with the
//! `Register`, `Login` and `IsAdmin` calls.

/// Authentication service definitions.
pub mod auth {
    tonic::include_proto!("auth");
}

// Re-export commonly used items
pub use auth::auth_client::AuthClient;
pub use auth::auth_server::{Auth, AuthServer};
