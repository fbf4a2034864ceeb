//! gRPC implementation of the `auth.Auth` service.
//!
//! Validates every request before it reaches the [`AuthService`] and turns
//! its errors into gRPC statuses through `From<AppError> for Status`, which
//! collapses every non-validation failure into a generic internal error.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use super::validation::{require_id, Credentials};
use crate::service::AuthService;
use common::AppError;
use proto::auth::{
    auth_server::Auth, IsAdminRequest, IsAdminResponse, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse,
};

/// gRPC service wrapper for AuthService.
#[derive(Clone)]
pub struct AuthGrpcService {
    service: Arc<dyn AuthService>,
}

impl AuthGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl Auth for AuthGrpcService {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let req = request.into_inner();
        let credentials = Credentials::parse(req.email, req.password).map_err(AppError::from)?;

        let user_id = self
            .service
            .register_new_user(&credentials.email, &credentials.password)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(RegisterResponse { user_id }))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();
        require_id("app_id", i64::from(req.app_id)).map_err(AppError::from)?;
        let credentials = Credentials::parse(req.email, req.password).map_err(AppError::from)?;

        let token = self
            .service
            .login(req.app_id, &credentials.email, &credentials.password)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(LoginResponse { token }))
    }

    async fn is_admin(
        &self,
        request: Request<IsAdminRequest>,
    ) -> Result<Response<IsAdminResponse>, Status> {
        let req = request.into_inner();
        require_id("user_id", req.user_id).map_err(AppError::from)?;

        let is_admin = self
            .service
            .is_admin(req.user_id)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(IsAdminResponse { is_admin }))
    }
}
