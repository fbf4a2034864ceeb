//! SSO Service - gRPC server for authentication.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sso_lib::config::SsoConfig;
use sso_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "sso")]
#[command(about = "Authentication microservice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gRPC server
    Serve {
        /// Overrides SSO_HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides SSO_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Application management
    App {
        #[command(subcommand)]
        action: AppCommands,
    },
    /// User administration
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum AppCommands {
    /// Register an application and print its ID
    Create {
        #[arg(long)]
        name: String,
        /// Token signing secret
        #[arg(long, env = "SSO_APP_SECRET")]
        secret: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Give a user admin rights
    GrantAdmin {
        #[arg(long)]
        id: i64,
    },
    /// Remove a user's admin rights
    RevokeAdmin {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = SsoConfig::from_env();

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            sso_lib::run_server(config).await?;
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            sso_lib::run_migrations(&config, migrate_action).await?;
        }
        Commands::App { action } => match action {
            AppCommands::Create { name, secret } => {
                let app_id = sso_lib::create_app(&config, name, secret).await?;
                println!("{}", app_id);
            }
        },
        Commands::User { action } => {
            let (id, is_admin) = match action {
                UserCommands::GrantAdmin { id } => (id, true),
                UserCommands::RevokeAdmin { id } => (id, false),
            };
            let user = sso_lib::set_admin(&config, id, is_admin).await?;
            println!("{} admin={}", user.email, user.is_admin);
        }
    }

    Ok(())
}
