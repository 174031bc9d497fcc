use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::announcements::{announce, server_startup};
use super::health::health;
use super::metrics::prometheus_metrics;
use super::posts::{delete_post, edit_post, fetch_post, save_post, search_posts, send_post};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Guild command endpoints
        .nest(
            "/api/v1/guilds/{guild_id}",
            Router::new()
                // Recruitment posts
                .route("/posts", post(save_post).get(search_posts))
                .route(
                    "/posts/{name}",
                    get(fetch_post).patch(edit_post).delete(delete_post),
                )
                .route("/posts/{name}/send", post(send_post))
                // Announcements
                .route("/announcements", post(announce))
                .route("/server-startup", post(server_startup)),
        )
}
