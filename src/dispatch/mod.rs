//! Channel dispatch.
//!
//! Delivers rendered [`AnnouncementPayload`]s to chat channels. The
//! REST dispatcher talks to the platform API; the in-memory dispatcher
//! records deliveries and is used for tests and token-less dry runs.

mod discord;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::announcement::AnnouncementPayload;
use crate::config::DiscordConfig;

pub use discord::{embed_message, ping_message, DiscordRestDispatcher};
pub use memory::{Delivery, InMemoryDispatcher};

/// Errors that can occur while delivering a message.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Platform rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Bot token contains characters not allowed in a header")]
    InvalidToken,
}

/// Result of a delivery
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReceipt {
    pub channel_id: u64,
    /// IDs of the messages created (embed first, then the ping)
    pub message_ids: Vec<String>,
}

/// Delivers rendered payloads to a channel.
#[async_trait]
pub trait ChannelDispatcher: Send + Sync {
    async fn deliver(
        &self,
        channel_id: u64,
        payload: &AnnouncementPayload,
    ) -> Result<DeliveryReceipt, DispatchError>;
}

/// Named destinations resolved to channel ids from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Announcements,
    Recruitment,
    ServerStartup,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Announcements => "announcements",
            Destination::Recruitment => "recruitment",
            Destination::ServerStartup => "server_startup",
        }
    }

    /// Channel configured for this destination
    pub fn channel_id(&self, config: &DiscordConfig) -> Option<u64> {
        match self {
            Destination::Announcements => config.announcement_channel_id,
            Destination::Recruitment => config.recruitment_channel_id,
            Destination::ServerStartup => config.ssu_channel_id,
        }
    }
}

/// Create a dispatcher based on configuration.
///
/// Uses the REST dispatcher when a bot token is configured, otherwise an
/// in-memory dispatcher that only logs deliveries.
pub fn create_dispatcher(config: &DiscordConfig) -> Arc<dyn ChannelDispatcher> {
    match config.bot_token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => match DiscordRestDispatcher::new(token, config) {
            Ok(dispatcher) => {
                tracing::info!(api_base = %config.api_base, "Creating REST channel dispatcher");
                Arc::new(dispatcher)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to build REST dispatcher, deliveries will only be logged");
                Arc::new(InMemoryDispatcher::new())
            }
        },
        None => {
            tracing::warn!("No bot token configured, deliveries will only be logged");
            Arc::new(InMemoryDispatcher::new())
        }
    }
}
