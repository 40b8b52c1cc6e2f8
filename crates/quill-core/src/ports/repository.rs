use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Post;
use crate::error::RepoError;

/// Post repository - persistence contract for posts.
///
/// Every operation that reaches the store is bounded by an
/// implementation-defined timeout and fails with [`RepoError::Timeout`]
/// when it elapses. Operations issued before [`open`](Self::open) or after
/// [`close`](Self::close) fail with [`RepoError::NotOpen`].
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Open the store session. A no-op on an already-open repository.
    async fn open(&self) -> Result<(), RepoError>;

    /// Release the store session.
    async fn close(&self) -> Result<(), RepoError>;

    /// Insert the post, or fully replace the stored post with the same id.
    async fn save(&self, post: &Post) -> Result<(), RepoError>;

    /// Exact lookup by id. A miss is [`RepoError::NotFound`].
    async fn fetch_one(&self, id: Uuid) -> Result<Post, RepoError>;

    /// Up to `page_size` posts published strictly before `before`, with their
    /// body left empty. Ordering is implementation-defined.
    async fn fetch_many(
        &self,
        before: DateTime<Utc>,
        page_size: usize,
    ) -> Result<Vec<Post>, RepoError>;

    /// Delete by id. Removing an unknown id succeeds.
    async fn remove(&self, id: Uuid) -> Result<(), RepoError>;
}
