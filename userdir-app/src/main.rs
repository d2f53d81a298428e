//! # User Directory Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the account store adapter
//! - Create the directory service
//! - Start the HTTP server

mod config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use userdir_hex::{DirectoryService, inbound::HttpServer};
use userdir_repo::build_repo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,userdir_app=debug,userdir_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting user directory server on port {}", config.port);

    // Build the account store (runs migration when backed by SQLite)
    let store = build_repo(config.database_url.as_deref()).await?;

    // Create the directory service
    let service = DirectoryService::new(store);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    Ok(())
}
