//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - The error taxonomy and its translation to gRPC status codes
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, ValidationError, INTERNAL_ERROR_MESSAGE};
