//! Announcement rendering.
//!
//! Turns saved recruitment posts, custom announcements and server startup
//! notices into [`AnnouncementPayload`]s for the channel dispatcher:
//! palette colors, ping mentions, `\n` expansion and link buttons.

mod color;
mod payload;

use thiserror::Error;

pub use color::EmbedColor;
pub use payload::{expand_newlines, render_ping, AnnounceRequest, AnnouncementPayload};

#[derive(Debug, Error)]
pub enum AnnouncementError {
    #[error("Invalid hex color format: '{0}'")]
    InvalidColor(String),

    #[error("Announcement title must not be empty")]
    MissingTitle,
}
