//! Backend trait for recruitment post storage.
//!
//! The store owns normalization, validation and merging; backends only
//! move whole rows in and out, so memory and PostgreSQL implementations
//! can be used interchangeably.

use async_trait::async_trait;
use thiserror::Error;

use super::types::RecruitmentPost;

/// Errors that can occur during backend operations.
#[derive(Debug, Error)]
pub enum PostBackendError {
    /// Backend cannot hand out a connection (pool closed, timed out, down)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// PostgreSQL operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Stored buttons could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Row-level storage for recruitment posts.
///
/// Keys passed in are already normalized.
#[async_trait]
pub trait PostBackend: Send + Sync {
    /// Backend name for logging and health output
    fn backend_type(&self) -> &'static str;

    /// Fetch one row by key.
    async fn get(&self, guild_id: i64, name: &str)
        -> Result<Option<RecruitmentPost>, PostBackendError>;

    /// Insert the row, or overwrite every column of an existing row with
    /// the same key.
    async fn upsert(&self, post: &RecruitmentPost) -> Result<(), PostBackendError>;

    /// Overwrite every column of an existing row. Returns `false` when no
    /// row matched the key.
    async fn replace(&self, post: &RecruitmentPost) -> Result<bool, PostBackendError>;

    /// Delete one row. Returns `false` when no row matched the key.
    async fn remove(&self, guild_id: i64, name: &str) -> Result<bool, PostBackendError>;

    /// Names within the guild containing `needle` (case-insensitive),
    /// ordered by name, at most `limit`.
    async fn names_matching(
        &self,
        guild_id: i64,
        needle: &str,
        limit: usize,
    ) -> Result<Vec<String>, PostBackendError>;
}
