//! REST delivery to the chat platform's channel message endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::announcement::AnnouncementPayload;
use crate::config::DiscordConfig;
use crate::metrics::DispatchMetrics;

use super::{ChannelDispatcher, DeliveryReceipt, DispatchError};

/// Component type of an action row
const ACTION_ROW: u8 = 1;
/// Component type of a button
const BUTTON: u8 = 2;
/// Button style that opens a URL
const LINK_STYLE: u8 = 5;

#[derive(Debug, Deserialize)]
struct CreatedMessage {
    id: String,
}

/// Posts messages through the platform REST API with a bot token.
pub struct DiscordRestDispatcher {
    client: reqwest::Client,
    api_base: String,
}

impl DiscordRestDispatcher {
    pub fn new(token: &str, config: &DiscordConfig) -> Result<Self, DispatchError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bot {}", token))
            .map_err(|_| DispatchError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn post_message(&self, channel_id: u64, body: &Value) -> Result<String, DispatchError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedMessage = response.json().await?;
        Ok(created.id)
    }
}

/// Message body carrying the embed and its link buttons. Mentions inside
/// the embed never notify anyone.
pub fn embed_message(payload: &AnnouncementPayload) -> Value {
    let mut embed = json!({
        "title": payload.title,
        "description": payload.body,
        "color": payload.color.value(),
        "timestamp": payload.timestamp.to_rfc3339(),
    });

    if let Some(footer) = &payload.footer {
        embed["footer"] = json!({ "text": footer });
    }
    if let Some(image_url) = &payload.image_url {
        embed["image"] = json!({ "url": image_url });
    }
    if let Some(thumbnail_url) = &payload.thumbnail_url {
        embed["thumbnail"] = json!({ "url": thumbnail_url });
    }

    let mut message = json!({
        "embeds": [embed],
        "allowed_mentions": { "parse": [] },
    });

    if !payload.buttons.is_empty() {
        let buttons: Vec<Value> = payload
            .buttons
            .iter()
            .map(|button| {
                json!({
                    "type": BUTTON,
                    "style": LINK_STYLE,
                    "label": button.label,
                    "url": button.url,
                })
            })
            .collect();

        message["components"] = json!([{ "type": ACTION_ROW, "components": buttons }]);
    }

    message
}

/// Plain-text follow-up carrying the ping
pub fn ping_message(ping: &str) -> Value {
    json!({
        "content": ping,
        "allowed_mentions": { "parse": ["everyone", "roles"] },
    })
}

#[async_trait]
impl ChannelDispatcher for DiscordRestDispatcher {
    async fn deliver(
        &self,
        channel_id: u64,
        payload: &AnnouncementPayload,
    ) -> Result<DeliveryReceipt, DispatchError> {
        let mut message_ids = Vec::with_capacity(2);

        let result = self.post_message(channel_id, &embed_message(payload)).await;
        DispatchMetrics::record("embed", result.is_ok());
        message_ids.push(result?);

        if let Some(ping) = &payload.ping {
            match self.post_message(channel_id, &ping_message(ping)).await {
                Ok(id) => {
                    DispatchMetrics::record("ping", true);
                    message_ids.push(id);
                }
                Err(e) => {
                    // The embed is already out; report the missing ping only in logs
                    DispatchMetrics::record("ping", false);
                    tracing::warn!(
                        channel_id = channel_id,
                        error = %e,
                        "Failed to send ping follow-up"
                    );
                }
            }
        }

        tracing::info!(
            channel_id = channel_id,
            title = %payload.title,
            messages = message_ids.len(),
            "Announcement delivered"
        );

        Ok(DeliveryReceipt {
            channel_id,
            message_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcement::EmbedColor;
    use crate::template::LinkButton;
    use chrono::Utc;

    fn payload() -> AnnouncementPayload {
        AnnouncementPayload {
            title: "Join MD".to_string(),
            body: "Line1\nLine2".to_string(),
            image_url: Some("https://img/md.png".to_string()),
            thumbnail_url: None,
            footer: Some("Posted by Ranger".to_string()),
            color: EmbedColor::BLUE,
            buttons: vec![
                LinkButton {
                    label: "Apply".to_string(),
                    url: "https://x/y".to_string(),
                },
                LinkButton {
                    label: "Info".to_string(),
                    url: "https://x/z".to_string(),
                },
            ],
            ping: Some("<@&42>".to_string()),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_embed_message_shape() {
        let message = embed_message(&payload());

        let embed = &message["embeds"][0];
        assert_eq!(embed["title"], "Join MD");
        assert_eq!(embed["description"], "Line1\nLine2");
        assert_eq!(embed["color"], 0x3498DB);
        assert_eq!(embed["footer"]["text"], "Posted by Ranger");
        assert_eq!(embed["image"]["url"], "https://img/md.png");
        assert!(embed.get("thumbnail").is_none());

        let row = &message["components"][0];
        assert_eq!(row["type"], 1);
        assert_eq!(row["components"][1]["label"], "Info");
        assert_eq!(row["components"][1]["style"], 5);
        assert_eq!(message["allowed_mentions"]["parse"], json!([]));
    }

    #[test]
    fn test_no_buttons_no_components() {
        let mut p = payload();
        p.buttons.clear();
        assert!(embed_message(&p).get("components").is_none());
    }

    #[test]
    fn test_ping_message() {
        let message = ping_message("@everyone");
        assert_eq!(message["content"], "@everyone");
        assert_eq!(message["allowed_mentions"]["parse"], json!(["everyone", "roles"]));
    }

    #[test]
    fn test_new_trims_api_base() {
        let config = DiscordConfig {
            api_base: "https://example.test/api/".to_string(),
            ..Default::default()
        };
        let dispatcher = DiscordRestDispatcher::new("token", &config).unwrap();
        assert_eq!(dispatcher.api_base, "https://example.test/api");
    }

    #[test]
    fn test_new_rejects_token_with_control_characters() {
        let result = DiscordRestDispatcher::new("tok\nen", &DiscordConfig::default());
        assert!(matches!(result, Err(DispatchError::InvalidToken)));
    }
}
