//! Session server binary for Arena With Friends.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `awf-config.yaml` (or `AWF_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load the card catalog
//! 4. Create the in-memory session store and the lobby
//! 5. Serve HTTP + `WebSocket` until `Ctrl-C`

use std::path::PathBuf;
use std::sync::Arc;

use awf_core::Catalog;
use awf_server::config::{DEFAULT_CONFIG_PATH, LoggingConfig};
use awf_server::{AppConfig, AppState, start_server};
use awf_store::MemoryStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the catalog or the listener fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("AWF_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = AppConfig::load(&config_path)?;

    init_tracing(&config.logging);
    info!(
        config = %config_path.display(),
        host = %config.server.host,
        port = config.server.port,
        "awf-server starting"
    );

    let catalog = Catalog::from_file(&config.catalog.path)?;
    info!(
        path = %config.catalog.path.display(),
        cards = catalog.len(),
        "Card catalog loaded"
    );

    let state = Arc::new(AppState::new(Arc::new(MemoryStore::new()), catalog));
    start_server(&config.server, state).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
