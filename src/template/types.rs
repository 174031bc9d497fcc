//! Recruitment post types and error definitions

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Maximum number of link buttons a post can carry
pub const MAX_BUTTONS: usize = 2;

/// Token that clears a ping role instead of storing it. Matched exactly.
pub const PING_NONE: &str = "none";

/// Color token stored when a post is saved without one
pub const DEFAULT_POST_COLOR: &str = "blue";

/// Template store error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Storage is not connected")]
    StorageUnavailable,

    #[error("No recruitment post named '{0}'")]
    NotFound(String),

    #[error("Failed to persist recruitment post: {0}")]
    Persistence(String),

    #[error("Invalid recruitment post: {0}")]
    Validation(String),
}

/// Result type for template store operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// A link button attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

impl LinkButton {
    /// Build a button only when both label and url are non-empty.
    pub fn complete(label: Option<&str>, url: Option<&str>) -> Option<Self> {
        match (label, url) {
            (Some(label), Some(url)) if !label.is_empty() && !url.is_empty() => Some(Self {
                label: label.to_string(),
                url: url.to_string(),
            }),
            _ => None,
        }
    }
}

/// A stored recruitment post template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitmentPost {
    /// Guild the post belongs to
    pub guild_id: i64,

    /// Normalized (trimmed, lowercase) name, unique within the guild
    pub name: String,

    pub title: String,

    /// Body text, stored as supplied
    pub details: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// At most [`MAX_BUTTONS`] complete link buttons
    #[serde(default)]
    pub buttons: Vec<LinkButton>,

    /// Mention keyword or numeric role id; `None` means no ping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping_role: Option<String>,

    /// Palette token; `None` renders with the default color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Arguments for saving (upserting) a post.
///
/// Every field is written on save; a save over an existing name replaces
/// the whole row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavePostRequest {
    pub name: String,
    pub title: String,
    pub details: String,
    pub image_url: Option<String>,
    pub button1_label: Option<String>,
    pub button1_url: Option<String>,
    pub button2_label: Option<String>,
    pub button2_url: Option<String>,
    /// `"none"` or absent stores no ping
    pub ping_role: Option<String>,
    pub color: Option<String>,
}

/// Sparse update of a stored post.
///
/// `None` always means "keep the stored value". `image_url` can also be
/// cleared with `Some(None)` (an explicit JSON `null`); `ping_role` is
/// cleared with the `"none"` token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditPostRequest {
    pub title: Option<String>,
    pub details: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub image_url: Option<Option<String>>,
    pub button1_label: Option<String>,
    pub button1_url: Option<String>,
    pub button2_label: Option<String>,
    pub button2_url: Option<String>,
    pub ping_role: Option<String>,
    pub color: Option<String>,
}

impl EditPostRequest {
    /// True when no field was supplied at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.details.is_none()
            && self.image_url.is_none()
            && self.button1_label.is_none()
            && self.button1_url.is_none()
            && self.button2_label.is_none()
            && self.button2_url.is_none()
            && self.ping_role.is_none()
            && self.color.is_none()
    }
}

/// Maps a present JSON value (including `null`) to `Some`, so a missing
/// key and an explicit `null` stay distinguishable.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Outcome of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Response for the name search
#[derive(Debug, Serialize)]
pub struct PostNameList {
    pub names: Vec<String>,
    pub total: usize,
}
