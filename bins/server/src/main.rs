//! Soundshelf Server
//!
//! Main entry point for the music browsing service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soundshelf_api::{AppState, create_router};
use soundshelf_core::storage::{StorageConfig, StorageService};
use soundshelf_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundshelf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Select the storage backend
    let storage_config = StorageConfig::from_settings(&config.storage)?;
    let storage = StorageService::from_config(&storage_config)?;
    info!(
        provider = storage_config.provider.name(),
        presign_ttl_secs = storage_config.presign_ttl_secs,
        "Storage configured"
    );

    // Create router
    let app = create_router(AppState::new(storage));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
