//! In-memory recruitment post backend using DashMap.
//!
//! Posts are kept per guild in a `BTreeMap` so name searches come back in a
//! stable order. Everything is lost on restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::{PostBackend, PostBackendError};
use super::types::RecruitmentPost;

/// In-memory post backend.
#[derive(Default)]
pub struct MemoryPostBackend {
    /// Per-guild posts keyed by normalized name
    guilds: DashMap<i64, BTreeMap<String, RecruitmentPost>>,
}

impl MemoryPostBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored posts across all guilds
    pub fn count(&self) -> usize {
        self.guilds.iter().map(|entry| entry.value().len()).sum()
    }
}

#[async_trait]
impl PostBackend for MemoryPostBackend {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn get(
        &self,
        guild_id: i64,
        name: &str,
    ) -> Result<Option<RecruitmentPost>, PostBackendError> {
        Ok(self
            .guilds
            .get(&guild_id)
            .and_then(|posts| posts.get(name).cloned()))
    }

    async fn upsert(&self, post: &RecruitmentPost) -> Result<(), PostBackendError> {
        self.guilds
            .entry(post.guild_id)
            .or_default()
            .insert(post.name.clone(), post.clone());
        Ok(())
    }

    async fn replace(&self, post: &RecruitmentPost) -> Result<bool, PostBackendError> {
        let Some(mut posts) = self.guilds.get_mut(&post.guild_id) else {
            return Ok(false);
        };

        match posts.get_mut(&post.name) {
            Some(slot) => {
                *slot = post.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, guild_id: i64, name: &str) -> Result<bool, PostBackendError> {
        Ok(self
            .guilds
            .get_mut(&guild_id)
            .map(|mut posts| posts.remove(name).is_some())
            .unwrap_or(false))
    }

    async fn names_matching(
        &self,
        guild_id: i64,
        needle: &str,
        limit: usize,
    ) -> Result<Vec<String>, PostBackendError> {
        let needle = needle.to_lowercase();
        let Some(posts) = self.guilds.get(&guild_id) else {
            return Ok(Vec::new());
        };

        Ok(posts
            .keys()
            .filter(|name| name.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(guild_id: i64, name: &str) -> RecruitmentPost {
        RecruitmentPost {
            guild_id,
            name: name.to_string(),
            title: format!("Title {}", name),
            details: String::new(),
            image_url: None,
            buttons: Vec::new(),
            ping_role: None,
            color: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let backend = MemoryPostBackend::new();
        backend.upsert(&post(1, "alpha")).await.unwrap();

        let found = backend.get(1, "alpha").await.unwrap().unwrap();
        assert_eq!(found.title, "Title alpha");
        assert!(backend.get(2, "alpha").await.unwrap().is_none());
        assert_eq!(backend.count(), 1);
    }

    #[tokio::test]
    async fn test_replace_requires_existing_row() {
        let backend = MemoryPostBackend::new();
        assert!(!backend.replace(&post(1, "alpha")).await.unwrap());

        backend.upsert(&post(1, "alpha")).await.unwrap();
        let mut updated = post(1, "alpha");
        updated.title = "Changed".to_string();
        assert!(backend.replace(&updated).await.unwrap());
        assert_eq!(backend.get(1, "alpha").await.unwrap().unwrap().title, "Changed");
    }

    #[tokio::test]
    async fn test_remove() {
        let backend = MemoryPostBackend::new();
        backend.upsert(&post(1, "alpha")).await.unwrap();

        assert!(backend.remove(1, "alpha").await.unwrap());
        assert!(!backend.remove(1, "alpha").await.unwrap());
        assert!(!backend.remove(9, "alpha").await.unwrap());
    }

    #[tokio::test]
    async fn test_names_matching_is_ordered_and_capped() {
        let backend = MemoryPostBackend::new();
        for name in ["md-b", "md-a", "sec", "md-c"] {
            backend.upsert(&post(1, name)).await.unwrap();
        }

        let names = backend.names_matching(1, "MD", 2).await.unwrap();
        assert_eq!(names, vec!["md-a".to_string(), "md-b".to_string()]);
    }
}
