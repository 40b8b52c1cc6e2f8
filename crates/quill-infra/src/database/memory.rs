//! In-memory post repository - used when no document store is configured,
//! and as the repository double in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

/// In-memory repository using a HashMap with async RwLock.
///
/// The repository is open from construction. Listings are returned newest
/// first. Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
    closed: AtomicBool,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), RepoError> {
        if self.closed.load(Ordering::Acquire) {
            Err(RepoError::NotOpen)
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn open(&self) -> Result<(), RepoError> {
        self.ensure_open()
    }

    async fn close(&self) -> Result<(), RepoError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    async fn save(&self, post: &Post) -> Result<(), RepoError> {
        self.ensure_open()?;
        let mut store = self.store.write().await;
        store.insert(post.id(), post.clone());
        Ok(())
    }

    async fn fetch_one(&self, id: Uuid) -> Result<Post, RepoError> {
        self.ensure_open()?;
        let store = self.store.read().await;
        store.get(&id).cloned().ok_or(RepoError::NotFound)
    }

    async fn fetch_many(
        &self,
        before: DateTime<Utc>,
        page_size: usize,
    ) -> Result<Vec<Post>, RepoError> {
        self.ensure_open()?;
        let store = self.store.read().await;

        let mut posts: Vec<Post> = store
            .values()
            .filter(|post| post.publish_date < before)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
        posts.truncate(page_size);

        for post in &mut posts {
            post.body.clear();
        }

        Ok(posts)
    }

    async fn remove(&self, id: Uuid) -> Result<(), RepoError> {
        self.ensure_open()?;
        let mut store = self.store.write().await;
        store.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post_at(title: &str, offset_days: i64) -> Post {
        Post::new(title, format!("# {title}"))
            .published_at(Utc::now() - Duration::days(offset_days))
    }

    #[tokio::test]
    async fn test_save_and_fetch_one() {
        let repo = InMemoryPostRepository::new();
        let post = post_at("hello", 1).with_summary("greeting");
        repo.save(&post).await.unwrap();

        assert_eq!(repo.fetch_one(post.id()).await.unwrap(), post);
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let repo = InMemoryPostRepository::new();
        let mut post = post_at("draft", 1);
        repo.save(&post).await.unwrap();

        post.title = "final".to_string();
        repo.save(&post).await.unwrap();

        assert_eq!(repo.fetch_one(post.id()).await.unwrap().title, "final");
    }

    #[tokio::test]
    async fn test_remove_then_fetch_is_not_found() {
        let repo = InMemoryPostRepository::new();
        let post = post_at("gone", 1);
        repo.save(&post).await.unwrap();
        repo.remove(post.id()).await.unwrap();

        assert!(matches!(
            repo.fetch_one(post.id()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_remove_unknown_id_succeeds() {
        let repo = InMemoryPostRepository::new();
        repo.remove(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_many_filters_limits_and_strips_body() {
        let repo = InMemoryPostRepository::new();
        for days in 1..=5 {
            repo.save(&post_at(&format!("post {days}"), days)).await.unwrap();
        }
        repo.save(&post_at("future", -3)).await.unwrap();

        let before = Utc::now() - Duration::hours(36);
        let page = repo.fetch_many(before, 3).await.unwrap();

        assert_eq!(page.len(), 3);
        assert!(page.iter().all(|p| p.publish_date < before));
        assert!(page.iter().all(|p| p.body.is_empty()));
        assert_eq!(page[0].title, "post 2");
    }

    #[tokio::test]
    async fn test_closed_repository_fails_fast() {
        let repo = InMemoryPostRepository::new();
        repo.close().await.unwrap();

        assert!(matches!(
            repo.fetch_one(Uuid::new_v4()).await,
            Err(RepoError::NotOpen)
        ));
        assert!(matches!(repo.open().await, Err(RepoError::NotOpen)));
    }
}
