//! Announcement endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::announcement::AnnounceRequest;
use crate::dispatch::DeliveryReceipt;
use crate::error::Result;
use crate::server::AppState;

use super::AuthUser;

/// POST /api/v1/guilds/{guild_id}/announcements - Custom announcement
#[tracing::instrument(
    name = "http.announce",
    skip(state, caller, request),
    fields(user_id = %caller.0.sub, title = %request.title)
)]
pub async fn announce(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(guild_id): Path<i64>,
    Json(request): Json<AnnounceRequest>,
) -> Result<Json<DeliveryReceipt>> {
    let receipt = state.commands.announce(&caller.0, guild_id, &request).await?;
    Ok(Json(receipt))
}

/// POST /api/v1/guilds/{guild_id}/server-startup - Server startup announcement
#[tracing::instrument(name = "http.server_startup", skip(state, caller), fields(user_id = %caller.0.sub))]
pub async fn server_startup(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(guild_id): Path<i64>,
) -> Result<Json<DeliveryReceipt>> {
    let receipt = state.commands.server_startup(&caller.0, guild_id).await?;
    Ok(Json(receipt))
}
