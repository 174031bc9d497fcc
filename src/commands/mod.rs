//! Guild commands.
//!
//! [`CommandService`] runs every bot command on behalf of an authenticated
//! caller: guild scope and capability checks first, then the template store,
//! announcement rendering and channel delivery.

mod announce;
mod posts;

use std::sync::Arc;

use crate::announcement::AnnouncementPayload;
use crate::auth::{Capability, Claims, PermissionPolicy};
use crate::config::DiscordConfig;
use crate::cooldown::GuildCooldown;
use crate::dispatch::{ChannelDispatcher, DeliveryReceipt, Destination};
use crate::error::{AppError, Result};
use crate::metrics::CommandMetrics;
use crate::template::TemplateStore;

/// Runs guild commands against the shared store and dispatcher.
pub struct CommandService {
    store: TemplateStore,
    dispatcher: Arc<dyn ChannelDispatcher>,
    policy: PermissionPolicy,
    discord: DiscordConfig,
    ssu_cooldown: GuildCooldown,
}

impl CommandService {
    pub fn new(
        store: TemplateStore,
        dispatcher: Arc<dyn ChannelDispatcher>,
        policy: PermissionPolicy,
        discord: DiscordConfig,
        ssu_cooldown: GuildCooldown,
    ) -> Self {
        Self {
            store,
            dispatcher,
            policy,
            discord,
            ssu_cooldown,
        }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Reject tokens scoped to another guild.
    fn check_guild(&self, caller: &Claims, guild_id: i64) -> Result<()> {
        if caller.can_act_in(guild_id) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %caller.user_id(),
                guild_id = guild_id,
                "Token is scoped to another guild"
            );
            Err(AppError::Forbidden(format!(
                "token is not valid for guild {}",
                guild_id
            )))
        }
    }

    /// Guild scope plus capability check.
    fn authorize(&self, caller: &Claims, guild_id: i64, capability: Capability) -> Result<()> {
        self.check_guild(caller, guild_id)?;

        if self.policy.allows(&caller.roles, capability) {
            return Ok(());
        }

        CommandMetrics::record_denied(capability.as_str());
        tracing::warn!(
            user_id = %caller.user_id(),
            guild_id = guild_id,
            capability = %capability,
            "Command refused: missing role"
        );
        Err(AppError::Forbidden(capability.to_string()))
    }

    /// Channel configured for the destination
    fn channel_for(&self, destination: Destination) -> Result<u64> {
        destination
            .channel_id(&self.discord)
            .ok_or_else(|| AppError::ChannelNotConfigured(destination.as_str().to_string()))
    }

    async fn deliver(
        &self,
        channel_id: u64,
        payload: &AnnouncementPayload,
    ) -> Result<DeliveryReceipt> {
        Ok(self.dispatcher.deliver(channel_id, payload).await?)
    }
}

/// Record a command's outcome and pass the result through
fn finish<T>(command: &str, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => CommandMetrics::record_success(command),
        Err(AppError::CooldownActive { .. }) => CommandMetrics::record_cooldown(),
        Err(_) => CommandMetrics::record_failure(command),
    }
    result
}
