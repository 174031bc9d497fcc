//! Recruitment post template store.
//!
//! This module provides:
//! - The `RecruitmentPost` record keyed by (guild, normalized name)
//! - Save (full upsert) and edit (sparse merge) semantics
//! - Name search used for interactive suggestions
//! - Memory and PostgreSQL storage backends
//!
//! # Example
//!
//! ```ignore
//! let store = TemplateStore::new(Arc::new(MemoryPostBackend::new()));
//!
//! store.save(guild_id, &SavePostRequest {
//!     name: " MD-Recruit ".to_string(),
//!     title: "Join MD".to_string(),
//!     details: "Line1\\nLine2".to_string(),
//!     button1_label: Some("Apply".to_string()),
//!     button1_url: Some("https://x/y".to_string()),
//!     ..Default::default()
//! }).await?;
//!
//! // Only the second button is touched; everything else is kept
//! store.edit(guild_id, "md-recruit", &EditPostRequest {
//!     button2_label: Some("Info".to_string()),
//!     button2_url: Some("https://x/z".to_string()),
//!     ..Default::default()
//! }).await?;
//! ```

mod backend;
mod factory;
mod memory_backend;
mod merge;
mod postgres_backend;
mod store;
mod types;

pub use backend::{PostBackend, PostBackendError};
pub use factory::create_template_store;
pub use memory_backend::MemoryPostBackend;
pub use merge::{normalize_name, resolve_ping};
pub use postgres_backend::PostgresPostBackend;
pub use store::{TemplateStore, SEARCH_LIMIT};
pub use types::{
    DeleteOutcome, EditPostRequest, LinkButton, PostNameList, RecruitmentPost, SavePostRequest,
    TemplateError, TemplateResult, DEFAULT_POST_COLOR, MAX_BUTTONS, PING_NONE,
};
