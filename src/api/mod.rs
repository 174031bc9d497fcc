//! API layer - HTTP endpoint handlers organized by domain.

mod announcements;
mod auth;
mod health;
mod metrics;
mod posts;
mod routes;

// Re-export all handlers for use in server/app.rs
pub use announcements::{announce, server_startup};
pub use auth::{extract_bearer_token, AuthUser};
pub use health::{health, HealthResponse, StorageHealthResponse};
pub use metrics::prometheus_metrics;
pub use posts::{delete_post, edit_post, fetch_post, save_post, search_posts, send_post, SearchParams};
pub use routes::api_routes;
