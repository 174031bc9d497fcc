//! PostgreSQL persistence module.
//!
//! Provides connection pooling and schema bootstrap for the post store.

pub mod pool;
pub mod schema;

pub use pool::{PostgresPool, PostgresPoolError};
pub use schema::ensure_schema;
