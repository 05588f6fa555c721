// Main entry point for the code camp API

use anyhow::Context;
use codecamp_api::api::{create_router, AppState};
use codecamp_api::config::Config;
use codecamp_api::loader::seed_loader::{SeedData, SeedLoader};
use codecamp_api::state::memory_store::InMemoryStore;
use codecamp_api::utils::time::SystemClock;

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load and validate configuration first (before any logging)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialize tracing subscriber; may only run once per process
    init_tracing(&config)?;

    info!("Starting code camp API");
    info!(
        bind_address = %config.bind_address,
        port = config.port,
        token_validity_minutes = config.token_validity_minutes,
        "Configuration loaded"
    );

    // 3. Seed the in-memory store
    let seed = match config.seed_yaml_path {
        Some(ref path) => SeedLoader::from_file(path).map_err(|e| {
            error!(error = %e, path = ?path, "Failed to load seed data");
            e
        })?,
        None => {
            warn!("SEED_YAML_PATH not set; starting with an empty store and no users");
            SeedData::default()
        }
    };
    let store = Arc::new(InMemoryStore::from_seed(seed));

    // 4. Wire application state
    let addr = format!("{}:{}", config.bind_address, config.port);
    let app_state = AppState::new(config, store.clone(), store, Arc::new(SystemClock))
        .context("Failed to build application state")?;

    let router = create_router(app_state);
    info!("Router created");

    // 5. Start HTTP server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(addr = %addr, "Server listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber based on configuration
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    // RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_env_filter(filter);

    let result = if config.log_format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            info!("SIGTERM received, starting graceful shutdown");
        },
    }
}
