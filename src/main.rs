use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use recruitment_bot::config::Settings;
use recruitment_bot::dispatch::create_dispatcher;
use recruitment_bot::metrics::StoreMetrics;
use recruitment_bot::postgres::{ensure_schema, PostgresPool};
use recruitment_bot::server::{create_app, AppState};
use recruitment_bot::telemetry::init_tracing;
use recruitment_bot::template::create_template_store;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    init_tracing(&settings.logging)?;
    tracing::info!("Configuration loaded");

    // Connect storage; failures leave the bot running without it
    let postgres_pool = if settings.database.backend == "postgres" {
        connect_postgres(&settings).await
    } else {
        None
    };

    let store = create_template_store(&settings.database, postgres_pool.as_ref());
    StoreMetrics::set_available(store.is_available());

    let dispatcher = create_dispatcher(&settings.discord);

    // Create application state
    let state = AppState::new(settings.clone(), store, dispatcher, postgres_pool.clone());
    tracing::info!("Application state initialized");

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler())
        .await?;

    if let Some(pool) = postgres_pool {
        pool.close().await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Open the pool and bootstrap the schema, or log why storage is offline.
async fn connect_postgres(settings: &Settings) -> Option<PostgresPool> {
    let pool = match PostgresPool::new(&settings.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL, recruitment posts are unavailable");
            return None;
        }
    };

    if let Err(e) = ensure_schema(pool.pool()).await {
        tracing::error!(error = %e, "Failed to prepare recruitment post table, recruitment posts are unavailable");
        pool.close().await;
        return None;
    }

    Some(pool)
}

async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
