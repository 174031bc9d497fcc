//! Record construction for save and sparse merge for edit.
//!
//! Both functions are pure: the store feeds them the caller's arguments
//! (and, for edit, the stored row) and persists whatever they return.

use super::types::{
    EditPostRequest, LinkButton, RecruitmentPost, SavePostRequest, TemplateError, TemplateResult,
    DEFAULT_POST_COLOR, MAX_BUTTONS, PING_NONE,
};

/// Normalize a post name for use as a key.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Resolve a caller-supplied ping token. Absent and exactly `"none"` mean
/// no ping; any other token is kept verbatim.
pub fn resolve_ping(token: Option<&str>) -> Option<String> {
    token.filter(|t| *t != PING_NONE).map(str::to_string)
}

fn normalize_color(token: &str) -> Option<String> {
    let token = token.trim().to_lowercase();
    (!token.is_empty()).then_some(token)
}

fn validate_title(title: &str) -> TemplateResult<()> {
    if title.trim().is_empty() {
        return Err(TemplateError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

/// Build the full record written by a save.
pub fn build_post(guild_id: i64, req: &SavePostRequest) -> TemplateResult<RecruitmentPost> {
    let name = normalize_name(&req.name);
    if name.is_empty() {
        return Err(TemplateError::Validation("name must not be empty".to_string()));
    }
    validate_title(&req.title)?;

    let buttons = [
        LinkButton::complete(req.button1_label.as_deref(), req.button1_url.as_deref()),
        LinkButton::complete(req.button2_label.as_deref(), req.button2_url.as_deref()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let color = match req.color.as_deref() {
        Some(token) => normalize_color(token),
        None => Some(DEFAULT_POST_COLOR.to_string()),
    };

    Ok(RecruitmentPost {
        guild_id,
        name,
        title: req.title.clone(),
        details: req.details.clone(),
        image_url: req.image_url.clone(),
        buttons,
        ping_role: resolve_ping(req.ping_role.as_deref()),
        color,
    })
}

/// Merge a sparse edit into the stored record.
pub fn apply_edit(
    existing: &RecruitmentPost,
    edit: &EditPostRequest,
) -> TemplateResult<RecruitmentPost> {
    if let Some(title) = &edit.title {
        validate_title(title)?;
    }

    let mut merged = existing.clone();

    if let Some(title) = &edit.title {
        merged.title = title.clone();
    }
    if let Some(details) = &edit.details {
        merged.details = details.clone();
    }
    if let Some(image_url) = &edit.image_url {
        merged.image_url = image_url.clone();
    }
    if let Some(color) = &edit.color {
        merged.color = normalize_color(color);
    }
    if let Some(ping) = &edit.ping_role {
        merged.ping_role = resolve_ping(Some(ping));
    }

    merged.buttons = merge_buttons(
        &existing.buttons,
        [
            (edit.button1_label.as_deref(), edit.button1_url.as_deref()),
            (edit.button2_label.as_deref(), edit.button2_url.as_deref()),
        ],
    );

    Ok(merged)
}

/// Positional button merge: each slot takes the override where given and
/// the stored value otherwise; incomplete slots are dropped afterwards.
fn merge_buttons(
    existing: &[LinkButton],
    overrides: [(Option<&str>, Option<&str>); MAX_BUTTONS],
) -> Vec<LinkButton> {
    overrides
        .into_iter()
        .enumerate()
        .filter_map(|(slot, (label, url))| {
            let current = existing.get(slot);
            let label = label.or(current.map(|b| b.label.as_str()));
            let url = url.or(current.map(|b| b.url.as_str()));
            LinkButton::complete(label, url)
        })
        .collect()
}
