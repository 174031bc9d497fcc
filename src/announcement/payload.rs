//! Rendered announcement payloads handed to the channel dispatcher
//!
//! Post bodies use the escaped newline convention: `details` keeps the
//! literal two-character `\n` and it becomes a line break only here. Every
//! backslash-n is expanded, so text that needs a literal one (a path such as
//! `C:\new`) cannot carry it. Dropping the convention means migrating stored
//! rows first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::template::{LinkButton, RecruitmentPost};

use super::color::EmbedColor;
use super::AnnouncementError;

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    pub color: EmbedColor,
    pub buttons: Vec<LinkButton>,
    /// Plain-text mention sent after the embed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Expand the literal `\n` escape. Raw newlines pass through untouched.
pub fn expand_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Render a stored ping token as message text. Numeric tokens are role
/// ids; anything else (`@everyone`, `@here`) is sent as is.
pub fn render_ping(token: &str) -> String {
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        format!("<@&{}>", token)
    } else {
        token.to_string()
    }
}

/// Arguments of a one-off custom announcement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnounceRequest {
    pub title: String,
    pub message: String,
    /// `#RRGGBB`
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub footer_text: Option<String>,
    pub button1_label: Option<String>,
    pub button1_url: Option<String>,
    pub button2_label: Option<String>,
    pub button2_url: Option<String>,
}

impl AnnouncementPayload {
    /// Render a saved recruitment post.
    pub fn from_post(post: &RecruitmentPost, posted_by: &str) -> Self {
        Self {
            title: post.title.clone(),
            body: expand_newlines(&post.details),
            image_url: post.image_url.clone().filter(|url| !url.is_empty()),
            thumbnail_url: None,
            footer: Some(format!("Posted by {}", posted_by)),
            color: EmbedColor::from_token(post.color.as_deref()),
            buttons: post.buttons.clone(),
            ping: post
                .ping_role
                .as_deref()
                .filter(|token| !token.trim().is_empty())
                .map(render_ping),
            timestamp: Utc::now(),
        }
    }

    /// Render a custom announcement.
    pub fn from_request(request: &AnnounceRequest, author: &str) -> Result<Self, AnnouncementError> {
        if request.title.trim().is_empty() {
            return Err(AnnouncementError::MissingTitle);
        }

        let color = match request.color.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(hex) => EmbedColor::parse_hex(hex)?,
            None => EmbedColor::DEFAULT,
        };

        let buttons = [
            LinkButton::complete(request.button1_label.as_deref(), request.button1_url.as_deref()),
            LinkButton::complete(request.button2_label.as_deref(), request.button2_url.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let footer = request
            .footer_text
            .clone()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| format!("Announcement by {}", author));

        Ok(Self {
            title: request.title.clone(),
            body: expand_newlines(&request.message),
            image_url: request.image_url.clone().filter(|url| !url.is_empty()),
            thumbnail_url: request.thumbnail_url.clone().filter(|url| !url.is_empty()),
            footer: Some(footer),
            color,
            buttons,
            ping: None,
            timestamp: Utc::now(),
        })
    }

    /// Render a server startup announcement.
    pub fn server_startup(host_id: &str, host_name: &str, game_link: &str) -> Self {
        Self {
            title: "🚀 Server Start Up (SSU) Hosted!".to_string(),
            body: format!(
                "A Server Start Up has been started by <@{}>. Join us now!",
                host_id
            ),
            image_url: None,
            thumbnail_url: None,
            footer: Some(format!("Hosted by {}", host_name)),
            color: EmbedColor::GREEN,
            buttons: vec![LinkButton {
                label: "Join Game".to_string(),
                url: game_link.to_string(),
            }],
            ping: Some("@everyone".to_string()),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> RecruitmentPost {
        RecruitmentPost {
            guild_id: 1,
            name: "md".to_string(),
            title: "Join MD".to_string(),
            details: "Line1\\nLine2".to_string(),
            image_url: Some(String::new()),
            buttons: vec![LinkButton {
                label: "Apply".to_string(),
                url: "https://x/y".to_string(),
            }],
            ping_role: Some("987654321".to_string()),
            color: Some("red".to_string()),
        }
    }

    #[test]
    fn test_render_ping() {
        assert_eq!(render_ping("123"), "<@&123>");
        assert_eq!(render_ping("@everyone"), "@everyone");
        assert_eq!(render_ping("@here"), "@here");
    }

    #[test]
    fn test_from_post() {
        let payload = AnnouncementPayload::from_post(&post(), "Ranger");

        assert_eq!(payload.body, "Line1\nLine2");
        assert_eq!(payload.image_url, None);
        assert_eq!(payload.footer.as_deref(), Some("Posted by Ranger"));
        assert_eq!(payload.color.value(), 0xE74C3C);
        assert_eq!(payload.ping.as_deref(), Some("<@&987654321>"));
        assert_eq!(payload.buttons.len(), 1);
    }

    #[test]
    fn test_blank_ping_sends_nothing() {
        let mut p = post();
        p.ping_role = Some("  ".to_string());
        assert_eq!(AnnouncementPayload::from_post(&p, "x").ping, None);
    }

    #[test]
    fn test_raw_newlines_are_kept() {
        let mut p = post();
        p.details = "Line1\nLine2".to_string();
        assert_eq!(AnnouncementPayload::from_post(&p, "x").body, "Line1\nLine2");
    }

    #[test]
    fn test_every_backslash_n_is_expanded() {
        assert_eq!(expand_newlines("C:\\new\\logs"), "C:\new\\logs");
    }

    #[test]
    fn test_from_request() {
        let request = AnnounceRequest {
            title: "Patch notes".to_string(),
            message: "One\\nTwo".to_string(),
            color: Some("#00ff00".to_string()),
            button1_label: Some("Read".to_string()),
            button1_url: Some("https://notes".to_string()),
            button2_url: Some("https://orphan".to_string()),
            ..Default::default()
        };

        let payload = AnnouncementPayload::from_request(&request, "Admin").unwrap();
        assert_eq!(payload.body, "One\nTwo");
        assert_eq!(payload.color.value(), 0x00FF00);
        assert_eq!(payload.buttons.len(), 1);
        assert_eq!(payload.footer.as_deref(), Some("Announcement by Admin"));
        assert_eq!(payload.ping, None);
    }

    #[test]
    fn test_from_request_rejects_bad_color() {
        let request = AnnounceRequest {
            title: "T".to_string(),
            color: Some("blue-ish".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            AnnouncementPayload::from_request(&request, "Admin"),
            Err(AnnouncementError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_server_startup() {
        let payload = AnnouncementPayload::server_startup("42", "Host", "https://game");
        assert!(payload.body.contains("<@42>"));
        assert_eq!(payload.ping.as_deref(), Some("@everyone"));
        assert_eq!(payload.buttons[0].label, "Join Game");
        assert_eq!(payload.color, EmbedColor::GREEN);
    }
}
