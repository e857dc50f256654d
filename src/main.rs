//! record_shop - Album catalog and purchasing backend
//!
//! Serves the catalog and purchase workflow over a WebSocket at `/ws`.
//! Stock checks and decrements run inside database transactions.

use std::net::SocketAddr;

use record_shop::db::Store;
use record_shop::server::build_router;
use record_shop::{Config, Dispatcher, Repository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "record_shop=debug,tower_http=debug".into());

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    let dotenv = dotenvy::dotenv();

    // Load configuration
    let config = Config::from_env()?;
    init_tracing(&config);

    if let Err(e) = dotenv {
        tracing::warn!(error = %e, "No .env file found, using existing environment variables");
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting record_shop server");
    tracing::info!("Connecting to database...");

    let store = Store::connect(&config).await?;
    store.verify_connection().await?;

    if !store.check_schema().await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    let dispatcher = Dispatcher::new(Repository::new(store.clone()));
    let app = build_router(dispatcher);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(endpoint = %format!("ws://{addr}/ws"), "WebSocket server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutting down...");
    store.close().await;
    tracing::info!("Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
