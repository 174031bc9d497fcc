//! Recruitment post endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::dispatch::DeliveryReceipt;
use crate::error::Result;
use crate::server::AppState;
use crate::template::{
    EditPostRequest, PostNameList, RecruitmentPost, SavePostRequest, SEARCH_LIMIT,
};

use super::AuthUser;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Substring typed so far
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

/// POST /api/v1/guilds/{guild_id}/posts - Save (create or overwrite) a post
#[tracing::instrument(
    name = "http.save_post",
    skip(state, caller, request),
    fields(user_id = %caller.0.sub, name = %request.name)
)]
pub async fn save_post(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(guild_id): Path<i64>,
    Json(request): Json<SavePostRequest>,
) -> Result<Json<RecruitmentPost>> {
    let post = state.commands.save_post(&caller.0, guild_id, &request).await?;
    Ok(Json(post))
}

/// GET /api/v1/guilds/{guild_id}/posts?q=&limit= - Name autocomplete
#[tracing::instrument(name = "http.search_posts", skip(state, caller))]
pub async fn search_posts(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(guild_id): Path<i64>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PostNameList>> {
    let limit = params.limit.unwrap_or(SEARCH_LIMIT);
    let names = state
        .commands
        .search_posts(&caller.0, guild_id, &params.q, limit)
        .await?;
    let total = names.len();

    Ok(Json(PostNameList { names, total }))
}

/// GET /api/v1/guilds/{guild_id}/posts/{name} - Fetch a post
#[tracing::instrument(name = "http.fetch_post", skip(state, caller))]
pub async fn fetch_post(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((guild_id, name)): Path<(i64, String)>,
) -> Result<Json<RecruitmentPost>> {
    let post = state.commands.fetch_post(&caller.0, guild_id, &name).await?;
    Ok(Json(post))
}

/// PATCH /api/v1/guilds/{guild_id}/posts/{name} - Edit the supplied fields
#[tracing::instrument(name = "http.edit_post", skip(state, caller, edit))]
pub async fn edit_post(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((guild_id, name)): Path<(i64, String)>,
    Json(edit): Json<EditPostRequest>,
) -> Result<Json<RecruitmentPost>> {
    let post = state
        .commands
        .edit_post(&caller.0, guild_id, &name, &edit)
        .await?;
    Ok(Json(post))
}

/// DELETE /api/v1/guilds/{guild_id}/posts/{name} - Delete a post
#[tracing::instrument(name = "http.delete_post", skip(state, caller))]
pub async fn delete_post(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((guild_id, name)): Path<(i64, String)>,
) -> Result<StatusCode> {
    state.commands.delete_post(&caller.0, guild_id, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/guilds/{guild_id}/posts/{name}/send - Send to the recruitment channel
#[tracing::instrument(name = "http.send_post", skip(state, caller))]
pub async fn send_post(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((guild_id, name)): Path<(i64, String)>,
) -> Result<Json<DeliveryReceipt>> {
    let receipt = state.commands.repost(&caller.0, guild_id, &name).await?;
    Ok(Json(receipt))
}
