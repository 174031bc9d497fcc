//! Announcement commands

use crate::announcement::{AnnounceRequest, AnnouncementPayload};
use crate::auth::{Capability, Claims};
use crate::dispatch::{DeliveryReceipt, Destination};
use crate::error::{AppError, Result};

use super::{finish, CommandService};

impl CommandService {
    /// Send a custom announcement to the announcements channel.
    pub async fn announce(
        &self,
        caller: &Claims,
        guild_id: i64,
        request: &AnnounceRequest,
    ) -> Result<DeliveryReceipt> {
        finish("announce", self.announce_inner(caller, guild_id, request).await)
    }

    async fn announce_inner(
        &self,
        caller: &Claims,
        guild_id: i64,
        request: &AnnounceRequest,
    ) -> Result<DeliveryReceipt> {
        self.authorize(caller, guild_id, Capability::Announce)?;
        let channel_id = self.channel_for(Destination::Announcements)?;

        let payload = AnnouncementPayload::from_request(request, caller.display_name())?;
        let receipt = self.deliver(channel_id, &payload).await?;

        tracing::info!(
            guild_id = guild_id,
            title = %payload.title,
            user_id = %caller.user_id(),
            "Announcement sent"
        );
        Ok(receipt)
    }

    /// Announce a server startup, at most once per cooldown window per guild.
    pub async fn server_startup(&self, caller: &Claims, guild_id: i64) -> Result<DeliveryReceipt> {
        finish("server_startup", self.server_startup_inner(caller, guild_id).await)
    }

    async fn server_startup_inner(&self, caller: &Claims, guild_id: i64) -> Result<DeliveryReceipt> {
        self.authorize(caller, guild_id, Capability::HostServerStartup)?;
        let channel_id = self.channel_for(Destination::ServerStartup)?;

        self.ssu_cooldown
            .try_acquire(guild_id)
            .map_err(|retry_after_secs| AppError::CooldownActive { retry_after_secs })?;

        let payload = AnnouncementPayload::server_startup(
            caller.user_id(),
            caller.display_name(),
            &self.discord.game_link,
        );
        let receipt = self.deliver(channel_id, &payload).await?;

        tracing::info!(
            guild_id = guild_id,
            user_id = %caller.user_id(),
            "Server startup announced"
        );
        Ok(receipt)
    }
}
