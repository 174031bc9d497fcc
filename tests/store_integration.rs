//! Recruitment post store integration tests
//!
//! Exercise the store end to end over the in-memory backend, plus a gated
//! backend that forces two edits to interleave.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Barrier;

use recruitment_bot::template::{
    DeleteOutcome, EditPostRequest, LinkButton, MemoryPostBackend, PostBackend,
    PostBackendError, RecruitmentPost, SavePostRequest, TemplateError, TemplateStore,
};

const GUILD: i64 = 1;

fn memory_store() -> TemplateStore {
    TemplateStore::new(Arc::new(MemoryPostBackend::new()))
}

fn md_recruit() -> SavePostRequest {
    SavePostRequest {
        name: " MD-Recruit ".to_string(),
        title: "Join MD".to_string(),
        details: "Line1\\nLine2".to_string(),
        button1_label: Some("Apply".to_string()),
        button1_url: Some("https://x/y".to_string()),
        ..Default::default()
    }
}

fn button(label: &str, url: &str) -> LinkButton {
    LinkButton {
        label: label.to_string(),
        url: url.to_string(),
    }
}

#[tokio::test]
async fn test_worked_example() {
    let store = memory_store();

    let saved = store.save(GUILD, &md_recruit()).await.unwrap();
    assert_eq!(saved.name, "md-recruit");
    assert_eq!(saved.buttons, vec![button("Apply", "https://x/y")]);

    let edited = store
        .edit(
            GUILD,
            "md-recruit",
            &EditPostRequest {
                button2_label: Some("Info".to_string()),
                button2_url: Some("https://x/z".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        edited.buttons,
        vec![button("Apply", "https://x/y"), button("Info", "https://x/z")]
    );
    assert_eq!(edited.title, "Join MD");
    assert_eq!(edited.details, "Line1\\nLine2");

    let fetched = store.fetch(GUILD, "MD-RECRUIT").await.unwrap();
    assert_eq!(fetched, edited);
}

#[tokio::test]
async fn test_save_overwrites_without_merge() {
    let store = memory_store();
    store.save(GUILD, &md_recruit()).await.unwrap();

    let replacement = SavePostRequest {
        name: "md-recruit".to_string(),
        title: "New title".to_string(),
        details: "Other".to_string(),
        ..Default::default()
    };
    store.save(GUILD, &replacement).await.unwrap();

    let fetched = store.fetch(GUILD, "md-recruit").await.unwrap();
    assert_eq!(fetched.title, "New title");
    assert!(fetched.buttons.is_empty());
}

#[tokio::test]
async fn test_empty_edit_keeps_record() {
    let store = memory_store();
    let saved = store.save(GUILD, &md_recruit()).await.unwrap();

    let edited = store
        .edit(GUILD, "md-recruit", &EditPostRequest::default())
        .await
        .unwrap();
    assert_eq!(edited, saved);
}

#[tokio::test]
async fn test_partial_button_edit() {
    let store = memory_store();
    let mut request = md_recruit();
    request.button2_label = Some("Info".to_string());
    request.button2_url = Some("https://x/z".to_string());
    store.save(GUILD, &request).await.unwrap();

    let edited = store
        .edit(
            GUILD,
            "md-recruit",
            &EditPostRequest {
                button1_url: Some("https://new".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        edited.buttons,
        vec![button("Apply", "https://new"), button("Info", "https://x/z")]
    );
}

#[tokio::test]
async fn test_ping_role_clear_and_keep() {
    let store = memory_store();
    let mut request = md_recruit();
    request.ping_role = Some("123".to_string());
    store.save(GUILD, &request).await.unwrap();

    let kept = store
        .edit(
            GUILD,
            "md-recruit",
            &EditPostRequest {
                title: Some("Still pinging".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(kept.ping_role.as_deref(), Some("123"));

    let cleared = store
        .edit(
            GUILD,
            "md-recruit",
            &EditPostRequest {
                ping_role: Some("none".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.ping_role, None);
}

#[tokio::test]
async fn test_ping_role_stored_verbatim() {
    let store = memory_store();
    let mut request = md_recruit();
    request.ping_role = Some(" @here ".to_string());
    let saved = store.save(GUILD, &request).await.unwrap();
    assert_eq!(saved.ping_role.as_deref(), Some(" @here "));

    let edited = store
        .edit(
            GUILD,
            "md-recruit",
            &EditPostRequest {
                ping_role: Some("None".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.ping_role.as_deref(), Some("None"));
    assert_eq!(store.fetch(GUILD, "md-recruit").await.unwrap(), edited);
}

#[tokio::test]
async fn test_delete_semantics() {
    let store = memory_store();

    assert_eq!(
        store.delete(GUILD, "md-recruit").await.unwrap(),
        DeleteOutcome::NotFound
    );

    store.save(GUILD, &md_recruit()).await.unwrap();
    assert_eq!(
        store.delete(GUILD, "MD-Recruit").await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert!(matches!(
        store.fetch(GUILD, "md-recruit").await,
        Err(TemplateError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_edit_missing_post() {
    let store = memory_store();

    let result = store
        .edit(
            GUILD,
            "ghost",
            &EditPostRequest {
                title: Some("x".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(TemplateError::NotFound(name)) if name == "ghost"));
}

#[tokio::test]
async fn test_search_is_guild_scoped_and_capped() {
    let store = memory_store();

    for i in 0..30 {
        let request = SavePostRequest {
            name: format!("post-{:02}", i),
            title: "T".to_string(),
            ..Default::default()
        };
        store.save(GUILD, &request).await.unwrap();
    }
    let other = SavePostRequest {
        name: "post-other-guild".to_string(),
        title: "T".to_string(),
        ..Default::default()
    };
    store.save(GUILD + 1, &other).await.unwrap();

    let names = store.search(GUILD, "", 100).await;
    assert_eq!(names.len(), 25);
    assert!(names.iter().all(|n| n.starts_with("post-") && n != "post-other-guild"));

    let filtered = store.search(GUILD, "POST-1", 25).await;
    assert_eq!(filtered.len(), 10);

    assert!(store.search(GUILD + 2, "", 25).await.is_empty());
}

#[tokio::test]
async fn test_unavailable_store() {
    let store = TemplateStore::unavailable();

    assert!(matches!(
        store.save(GUILD, &md_recruit()).await,
        Err(TemplateError::StorageUnavailable)
    ));
    assert!(matches!(
        store.fetch(GUILD, "md-recruit").await,
        Err(TemplateError::StorageUnavailable)
    ));
    assert!(matches!(
        store.delete(GUILD, "md-recruit").await,
        Err(TemplateError::StorageUnavailable)
    ));
    assert!(store.search(GUILD, "", 25).await.is_empty());
}

/// Holds the first `gated_reads` reads at a barrier so concurrent edits
/// both see the row before either writes.
struct GatedBackend {
    inner: MemoryPostBackend,
    barrier: Barrier,
    gated_reads: AtomicUsize,
}

impl GatedBackend {
    fn new(gated_reads: usize) -> Self {
        Self {
            inner: MemoryPostBackend::new(),
            barrier: Barrier::new(gated_reads),
            gated_reads: AtomicUsize::new(gated_reads),
        }
    }
}

#[async_trait]
impl PostBackend for GatedBackend {
    fn backend_type(&self) -> &'static str {
        "gated"
    }

    async fn get(
        &self,
        guild_id: i64,
        name: &str,
    ) -> Result<Option<RecruitmentPost>, PostBackendError> {
        let row = self.inner.get(guild_id, name).await?;

        let gated = self
            .gated_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if gated {
            self.barrier.wait().await;
        }

        Ok(row)
    }

    async fn upsert(&self, post: &RecruitmentPost) -> Result<(), PostBackendError> {
        self.inner.upsert(post).await
    }

    async fn replace(&self, post: &RecruitmentPost) -> Result<bool, PostBackendError> {
        self.inner.replace(post).await
    }

    async fn remove(&self, guild_id: i64, name: &str) -> Result<bool, PostBackendError> {
        self.inner.remove(guild_id, name).await
    }

    async fn names_matching(
        &self,
        guild_id: i64,
        needle: &str,
        limit: usize,
    ) -> Result<Vec<String>, PostBackendError> {
        self.inner.names_matching(guild_id, needle, limit).await
    }
}

#[tokio::test]
async fn test_concurrent_edits_last_writer_wins() {
    let store = TemplateStore::new(Arc::new(GatedBackend::new(2)));

    // Save before arming the gate: upsert does not read
    store.save(GUILD, &md_recruit()).await.unwrap();

    let title_edit = EditPostRequest {
        title: Some("Title from A".to_string()),
        ..Default::default()
    };
    let details_edit = EditPostRequest {
        details: Some("Details from B".to_string()),
        ..Default::default()
    };

    let (a, b) = tokio::join!(
        store.edit(GUILD, "md-recruit", &title_edit),
        store.edit(GUILD, "md-recruit", &details_edit),
    );
    a.unwrap();
    b.unwrap();

    let finished = store.fetch(GUILD, "md-recruit").await.unwrap();
    let title_applied = finished.title == "Title from A";
    let details_applied = finished.details == "Details from B";

    // Each writer merged into the same stale read, so one change is lost
    assert!(title_applied ^ details_applied);
}
