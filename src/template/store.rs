//! Recruitment post store with save / edit / fetch / search / delete

use std::sync::Arc;

use crate::metrics::StoreMetrics;

use super::backend::{PostBackend, PostBackendError};
use super::merge::{apply_edit, build_post, normalize_name};
use super::types::{
    DeleteOutcome, EditPostRequest, RecruitmentPost, SavePostRequest, TemplateError,
    TemplateResult,
};

/// Upper bound on names returned by [`TemplateStore::search`]
pub const SEARCH_LIMIT: usize = 25;

/// Guild-scoped recruitment post store.
///
/// Holds the process-wide backend handle. A store built without a backend
/// (storage failed to initialize) answers every operation with
/// [`TemplateError::StorageUnavailable`] and every search with an empty list.
#[derive(Clone)]
pub struct TemplateStore {
    backend: Option<Arc<dyn PostBackend>>,
}

impl TemplateStore {
    /// Create a store over a connected backend
    pub fn new(backend: Arc<dyn PostBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Create a store with no backend
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    /// Whether a backend is connected
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Backend name, or `"unavailable"`
    pub fn backend_type(&self) -> &'static str {
        self.backend
            .as_ref()
            .map(|b| b.backend_type())
            .unwrap_or("unavailable")
    }

    fn backend(&self) -> TemplateResult<&Arc<dyn PostBackend>> {
        self.backend.as_ref().ok_or(TemplateError::StorageUnavailable)
    }

    /// Save a post, replacing every field of any post with the same name.
    pub async fn save(
        &self,
        guild_id: i64,
        request: &SavePostRequest,
    ) -> TemplateResult<RecruitmentPost> {
        let result = self.save_inner(guild_id, request).await;
        StoreMetrics::record("save", &result);
        result
    }

    async fn save_inner(
        &self,
        guild_id: i64,
        request: &SavePostRequest,
    ) -> TemplateResult<RecruitmentPost> {
        let backend = self.backend()?;
        let post = build_post(guild_id, request)?;

        backend
            .upsert(&post)
            .await
            .map_err(|e| persistence_error("save", guild_id, &post.name, e))?;

        tracing::info!(
            guild_id = guild_id,
            name = %post.name,
            buttons = post.buttons.len(),
            "Recruitment post saved"
        );

        Ok(post)
    }

    /// Apply a sparse edit to an existing post.
    ///
    /// Reads the row, merges, then writes every column back. Two edits of
    /// the same post racing each other can lose one writer's changes.
    pub async fn edit(
        &self,
        guild_id: i64,
        name: &str,
        edit: &EditPostRequest,
    ) -> TemplateResult<RecruitmentPost> {
        let result = self.edit_inner(guild_id, name, edit).await;
        StoreMetrics::record("edit", &result);
        result
    }

    async fn edit_inner(
        &self,
        guild_id: i64,
        name: &str,
        edit: &EditPostRequest,
    ) -> TemplateResult<RecruitmentPost> {
        let backend = self.backend()?;
        let name = normalize_name(name);

        let existing = backend
            .get(guild_id, &name)
            .await
            .map_err(|e| persistence_error("edit", guild_id, &name, e))?
            .ok_or_else(|| TemplateError::NotFound(name.clone()))?;

        let merged = apply_edit(&existing, edit)?;

        let matched = backend
            .replace(&merged)
            .await
            .map_err(|e| persistence_error("edit", guild_id, &name, e))?;

        if !matched {
            // Deleted between the read and the write
            return Err(TemplateError::NotFound(name));
        }

        tracing::info!(guild_id = guild_id, name = %name, "Recruitment post edited");

        Ok(merged)
    }

    /// Fetch a post by name.
    pub async fn fetch(&self, guild_id: i64, name: &str) -> TemplateResult<RecruitmentPost> {
        let result = self.fetch_inner(guild_id, name).await;
        StoreMetrics::record("fetch", &result);
        result
    }

    async fn fetch_inner(&self, guild_id: i64, name: &str) -> TemplateResult<RecruitmentPost> {
        let backend = self.backend()?;
        let name = normalize_name(name);

        backend
            .get(guild_id, &name)
            .await
            .map_err(|e| persistence_error("fetch", guild_id, &name, e))?
            .ok_or(TemplateError::NotFound(name))
    }

    /// Names in the guild containing `query`, case-insensitive, at most
    /// `limit` of them (itself capped at [`SEARCH_LIMIT`]).
    ///
    /// Never fails: storage problems yield an empty list.
    pub async fn search(&self, guild_id: i64, query: &str, limit: usize) -> Vec<String> {
        let Some(backend) = self.backend.as_ref() else {
            return Vec::new();
        };

        let limit = limit.min(SEARCH_LIMIT);
        if limit == 0 {
            return Vec::new();
        }
        let needle = query.trim().to_lowercase();

        match backend.names_matching(guild_id, &needle, limit).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(
                    guild_id = guild_id,
                    query = %needle,
                    error = %e,
                    "Recruitment post search failed"
                );
                StoreMetrics::record_search_degraded();
                Vec::new()
            }
        }
    }

    /// Delete a post by name.
    pub async fn delete(&self, guild_id: i64, name: &str) -> TemplateResult<DeleteOutcome> {
        let result = self.delete_inner(guild_id, name).await;
        StoreMetrics::record("delete", &result);
        result
    }

    async fn delete_inner(&self, guild_id: i64, name: &str) -> TemplateResult<DeleteOutcome> {
        let backend = self.backend()?;
        let name = normalize_name(name);

        let removed = backend
            .remove(guild_id, &name)
            .await
            .map_err(|e| persistence_error("delete", guild_id, &name, e))?;

        if removed {
            tracing::info!(guild_id = guild_id, name = %name, "Recruitment post deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}

/// Log a backend failure and convert it into the store's taxonomy.
fn persistence_error(
    operation: &str,
    guild_id: i64,
    name: &str,
    err: PostBackendError,
) -> TemplateError {
    match err {
        PostBackendError::Unavailable(reason) => {
            tracing::warn!(
                operation = operation,
                guild_id = guild_id,
                name = %name,
                reason = %reason,
                "Recruitment post storage unavailable"
            );
            TemplateError::StorageUnavailable
        }
        other => {
            tracing::error!(
                operation = operation,
                guild_id = guild_id,
                name = %name,
                error = %other,
                "Recruitment post storage failure"
            );
            TemplateError::Persistence(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::memory_backend::MemoryPostBackend;

    fn store() -> TemplateStore {
        TemplateStore::new(Arc::new(MemoryPostBackend::new()))
    }

    fn request(name: &str, title: &str) -> SavePostRequest {
        SavePostRequest {
            name: name.to_string(),
            title: title.to_string(),
            details: "Line1\\nLine2".to_string(),
            button1_label: Some("Apply".to_string()),
            button1_url: Some("https://x/y".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_and_fetch() {
        let store = store();

        let saved = store.save(1, &request(" MD-Recruit ", "Join MD")).await.unwrap();
        assert_eq!(saved.name, "md-recruit");

        let fetched = store.fetch(1, "MD-RECRUIT").await.unwrap();
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn test_save_overwrites_without_merge() {
        let store = store();

        let mut first = request("md", "First");
        first.image_url = Some("https://img/1.png".to_string());
        first.ping_role = Some("@here".to_string());
        store.save(1, &first).await.unwrap();

        store.save(1, &request("md", "Second")).await.unwrap();

        let fetched = store.fetch(1, "md").await.unwrap();
        assert_eq!(fetched.title, "Second");
        assert_eq!(fetched.image_url, None);
        assert_eq!(fetched.ping_role, None);
    }

    #[tokio::test]
    async fn test_edit_missing_post() {
        let store = store();
        let result = store.edit(1, "ghost", &EditPostRequest::default()).await;
        assert!(matches!(result, Err(TemplateError::NotFound(name)) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_delete_reports_outcome() {
        let store = store();
        store.save(1, &request("md", "Join")).await.unwrap();

        assert_eq!(store.delete(1, " MD ").await.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(store.delete(1, "md").await.unwrap(), DeleteOutcome::NotFound);
        assert!(matches!(
            store.fetch(1, "md").await,
            Err(TemplateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_fast() {
        let store = TemplateStore::unavailable();

        assert!(!store.is_available());
        assert!(matches!(
            store.save(1, &request("md", "Join")).await,
            Err(TemplateError::StorageUnavailable)
        ));
        assert!(matches!(
            store.edit(1, "md", &EditPostRequest::default()).await,
            Err(TemplateError::StorageUnavailable)
        ));
        assert!(matches!(
            store.fetch(1, "md").await,
            Err(TemplateError::StorageUnavailable)
        ));
        assert!(matches!(
            store.delete(1, "md").await,
            Err(TemplateError::StorageUnavailable)
        ));
        assert!(store.search(1, "", SEARCH_LIMIT).await.is_empty());
    }

    #[tokio::test]
    async fn test_search_caps_limit() {
        let store = store();
        for i in 0..30 {
            store.save(1, &request(&format!("post-{:02}", i), "T")).await.unwrap();
        }

        assert_eq!(store.search(1, "", 100).await.len(), SEARCH_LIMIT);
        assert_eq!(store.search(1, "POST-1", SEARCH_LIMIT).await.len(), 10);
        assert_eq!(store.search(1, "POST-1", 3).await, vec!["post-10", "post-11", "post-12"]);
    }

    #[tokio::test]
    async fn test_search_zero_limit_returns_nothing() {
        let store = store();
        store.save(1, &request("a1", "T")).await.unwrap();
        store.save(1, &request("a2", "T")).await.unwrap();

        assert!(store.search(1, "", 0).await.is_empty());
        assert!(store.search(1, "a", 0).await.is_empty());
    }
}
