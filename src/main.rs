//! Xero CLI entry point
//!
//! Dispatches the matched subcommand, or runs the thin HTTP service wrapper
//! when invoked with `serve`.
//!
//! # Serve Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Build the Xero client and cache
//! 4. Start background cache sweep task
//! 5. Create Axum router with all endpoints
//! 6. Start HTTP server on configured port
//! 7. Handle graceful shutdown on SIGINT/SIGTERM

use std::net::SocketAddr;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xero_cli::api::{create_router, AppState};
use xero_cli::cli;
use xero_cli::config::Config;
use xero_cli::tasks::spawn_cleanup_task;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xero_cli=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let matches = cli::build_command().get_matches();

    if let Some(("serve", _)) = matches.subcommand() {
        return serve(config).await;
    }

    cli::execute(&config, &matches).await
}

/// Runs the HTTP service wrapper until a shutdown signal arrives.
async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting Xero service wrapper");
    info!(
        "Configuration loaded: default_ttl={}s, port={}, cleanup_interval={}s",
        config.default_cache_ttl, config.server_port, config.cleanup_interval
    );

    // Build client, cache, and service
    let state = AppState::from_config(&config)?;
    info!("Xero client and cache initialized");

    // Start background sweep task
    let cleanup_handle = spawn_cleanup_task(state.service.cache().clone(), config.cleanup_interval);
    info!("Background cache sweep started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the sweep task
    cleanup_handle.abort();
    warn!("Cache sweep task aborted");
}
