//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub storage: StorageHealthResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres: Option<PostgresHealthResponse>,
}

#[derive(Debug, Serialize)]
pub struct StorageHealthResponse {
    pub backend: String,
    pub connected: bool,
}

#[derive(Debug, Serialize)]
pub struct PostgresHealthResponse {
    pub connected: bool,
    pub pool_size: u32,
    pub idle_connections: u32,
}

/// GET /health - Liveness plus storage status. Never fails; a missing
/// store reports `degraded`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.commands.store();
    let connected = store.is_available();

    let postgres = state.postgres_pool.as_ref().map(|pool| {
        let inner_pool = pool.pool();
        PostgresHealthResponse {
            connected: pool.is_available(),
            pool_size: inner_pool.size(),
            idle_connections: inner_pool.num_idle() as u32,
        }
    });

    let status = if connected { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        storage: StorageHealthResponse {
            backend: store.backend_type().to_string(),
            connected,
        },
        postgres,
    })
}
