//! Recruitment post commands

use crate::announcement::AnnouncementPayload;
use crate::auth::{Capability, Claims};
use crate::dispatch::{DeliveryReceipt, Destination};
use crate::error::{AppError, Result};
use crate::template::{
    normalize_name, DeleteOutcome, EditPostRequest, RecruitmentPost, SavePostRequest,
};

use super::{finish, CommandService};

impl CommandService {
    /// Save a post, overwriting any post with the same name.
    pub async fn save_post(
        &self,
        caller: &Claims,
        guild_id: i64,
        request: &SavePostRequest,
    ) -> Result<RecruitmentPost> {
        finish("save_post", self.save_post_inner(caller, guild_id, request).await)
    }

    async fn save_post_inner(
        &self,
        caller: &Claims,
        guild_id: i64,
        request: &SavePostRequest,
    ) -> Result<RecruitmentPost> {
        self.authorize(caller, guild_id, Capability::ManagePosts)?;
        Ok(self.store.save(guild_id, request).await?)
    }

    /// Change only the fields supplied in the edit.
    pub async fn edit_post(
        &self,
        caller: &Claims,
        guild_id: i64,
        name: &str,
        edit: &EditPostRequest,
    ) -> Result<RecruitmentPost> {
        finish("edit_post", self.edit_post_inner(caller, guild_id, name, edit).await)
    }

    async fn edit_post_inner(
        &self,
        caller: &Claims,
        guild_id: i64,
        name: &str,
        edit: &EditPostRequest,
    ) -> Result<RecruitmentPost> {
        self.authorize(caller, guild_id, Capability::ManagePosts)?;
        if edit.is_empty() {
            tracing::debug!(guild_id = guild_id, name = %name, "Edit supplied no fields");
        }
        Ok(self.store.edit(guild_id, name, edit).await?)
    }

    pub async fn fetch_post(
        &self,
        caller: &Claims,
        guild_id: i64,
        name: &str,
    ) -> Result<RecruitmentPost> {
        self.check_guild(caller, guild_id)?;
        Ok(self.store.fetch(guild_id, name).await?)
    }

    /// Autocomplete over post names; storage trouble yields no suggestions.
    pub async fn search_posts(
        &self,
        caller: &Claims,
        guild_id: i64,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        self.check_guild(caller, guild_id)?;
        Ok(self.store.search(guild_id, query, limit).await)
    }

    pub async fn delete_post(&self, caller: &Claims, guild_id: i64, name: &str) -> Result<()> {
        finish("delete_post", self.delete_post_inner(caller, guild_id, name).await)
    }

    async fn delete_post_inner(&self, caller: &Claims, guild_id: i64, name: &str) -> Result<()> {
        self.authorize(caller, guild_id, Capability::ManagePosts)?;

        match self.store.delete(guild_id, name).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(AppError::NotFound(format!(
                "No recruitment post named '{}'",
                normalize_name(name)
            ))),
        }
    }

    /// Render a saved post and send it to the recruitment channel.
    pub async fn repost(
        &self,
        caller: &Claims,
        guild_id: i64,
        name: &str,
    ) -> Result<DeliveryReceipt> {
        finish("repost", self.repost_inner(caller, guild_id, name).await)
    }

    async fn repost_inner(
        &self,
        caller: &Claims,
        guild_id: i64,
        name: &str,
    ) -> Result<DeliveryReceipt> {
        self.authorize(caller, guild_id, Capability::SendPosts)?;
        let channel_id = self.channel_for(Destination::Recruitment)?;

        let post = self.store.fetch(guild_id, name).await?;
        let payload = AnnouncementPayload::from_post(&post, caller.display_name());

        let receipt = self.deliver(channel_id, &payload).await?;
        tracing::info!(
            guild_id = guild_id,
            name = %post.name,
            user_id = %caller.user_id(),
            "Recruitment post sent"
        );
        Ok(receipt)
    }
}
