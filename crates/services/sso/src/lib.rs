//! SSO Service Library
//!
//! Authentication over gRPC: registration, login with application-scoped
//! session tokens, and admin lookup, backed by a SQLite credential store.
//!
//! Wiring is explicit: [`build_service`] takes the store connection and a
//! clock and returns the gRPC service, with no global state in between.

pub mod config;
pub mod grpc;
pub mod infra;
pub mod repository;
pub mod service;
pub mod token;

use std::net::SocketAddr;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tonic::transport::Server;
use tracing::info;

use crate::config::SsoConfig;
use crate::grpc::AuthGrpcService;
use crate::infra::Database;
use crate::repository::{AppStore, UserStore};
use crate::service::Authenticator;
use crate::token::{Clock, SystemClock, TokenIssuer};
use common::AppResult;
use domain::User;

/// Assemble store, token issuer and auth service into the gRPC service.
pub fn build_service(
    connection: DatabaseConnection,
    config: &SsoConfig,
    clock: Arc<dyn Clock>,
) -> AuthGrpcService {
    let users = Arc::new(UserStore::new(connection.clone()));
    let apps = Arc::new(AppStore::new(connection));

    let authenticator = Authenticator::new(
        users,
        apps,
        TokenIssuer::new(clock),
        config.token_ttl,
        config.database.statement_timeout(),
    );

    AuthGrpcService::new(Arc::new(authenticator))
}

/// Run the gRPC server until Ctrl-C or SIGTERM.
pub async fn run_server(config: SsoConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    // Initialize database
    let db = Database::connect(&config.database).await?;
    let grpc_service = build_service(db.get_connection(), &config, Arc::new(SystemClock));

    // Build address
    let addr: SocketAddr = config.server.bind_address().parse()?;
    info!("SSO service listening on {}", addr);

    // Run server
    Server::builder()
        .timeout(config.server.request_timeout())
        .add_service(proto::AuthServer::new(grpc_service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    info!("SSO service stopped");
    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &SsoConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Register an application (for CLI commands).
pub async fn create_app(config: &SsoConfig, name: String, secret: String) -> AppResult<i32> {
    let db = Database::connect(&config.database).await?;
    let app_id = AppStore::new(db.get_connection()).create(name, secret).await?;
    info!(app_id, "App created");
    Ok(app_id)
}

/// Set or clear a user's admin flag (for CLI commands).
pub async fn set_admin(config: &SsoConfig, user_id: i64, is_admin: bool) -> AppResult<User> {
    let db = Database::connect(&config.database).await?;
    let user = UserStore::new(db.get_connection())
        .set_admin(user_id, is_admin)
        .await?;
    info!(user_id, is_admin, "Admin flag updated");
    Ok(user)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}
