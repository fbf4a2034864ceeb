//! gRPC boundary: request validation and error translation.

mod auth_grpc;
mod validation;

pub use auth_grpc::AuthGrpcService;
pub use validation::{require_id, Credentials};
