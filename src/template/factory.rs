//! Post backend factory

use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::postgres::PostgresPool;

use super::memory_backend::MemoryPostBackend;
use super::postgres_backend::PostgresPostBackend;
use super::store::TemplateStore;

/// Create the template store based on configuration.
///
/// - `"memory"`: a `MemoryPostBackend`
/// - `"postgres"` (default): a `PostgresPostBackend` if a pool is provided;
///   without a pool the store is created unavailable so operations fail
///   fast instead of silently writing to memory
pub fn create_template_store(
    settings: &DatabaseConfig,
    postgres_pool: Option<&PostgresPool>,
) -> TemplateStore {
    match settings.backend.as_str() {
        "memory" => {
            tracing::info!(backend = "memory", "Creating in-memory recruitment post store");
            TemplateStore::new(Arc::new(MemoryPostBackend::new()))
        }
        _ => match postgres_pool {
            Some(pool) => {
                tracing::info!(backend = "postgres", "Creating PostgreSQL recruitment post store");
                TemplateStore::new(Arc::new(PostgresPostBackend::new(pool.pool().clone())))
            }
            None => {
                tracing::warn!(
                    "PostgreSQL backend requested but no pool is available, storage operations will fail"
                );
                TemplateStore::unavailable()
            }
        },
    }
}
