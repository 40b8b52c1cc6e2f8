//! MongoDB post repository.

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bson::{Document, doc};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, SecretName, SecretProvider};

use super::document::{
    collect_listing, decode, encode, id_filter, listing_projection, published_before,
};

const CREATED: u8 = 0;
const OPEN: u8 = 1;
const CLOSED: u8 = 2;

/// What `fetch_many` does with a stored document it cannot decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Abort the listing with [`RepoError::Decode`].
    #[default]
    FailFast,
    /// Log the failure, keep draining the cursor, return what decoded.
    SkipInvalid,
}

/// Configuration for the MongoDB repository.
#[derive(Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Bound on every single store operation.
    pub timeout: Duration,
    pub decode_policy: DecodePolicy,
}

impl MongoConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Resolve connection string, database and collection from secrets.
    pub fn from_secrets(secrets: &dyn SecretProvider) -> Self {
        Self {
            uri: secrets.secret(SecretName::Storage).to_string(),
            database: secrets.secret(SecretName::Database).to_string(),
            collection: secrets.secret(SecretName::Collection).to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            decode_policy: DecodePolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_decode_policy(mut self, decode_policy: DecodePolicy) -> Self {
        self.decode_policy = decode_policy;
        self
    }
}

// The connection string carries credentials.
impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoConfig")
            .field("uri", &"***")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("timeout", &self.timeout)
            .field("decode_policy", &self.decode_policy)
            .finish()
    }
}

/// Post repository backed by a single MongoDB collection.
///
/// The driver pools connections internally and is safe to share, so the
/// repository is used behind an `Arc` without any locking. Only the
/// open/closed flag is mutated after construction.
pub struct MongoPostRepository {
    client: Client,
    collection: Collection<Document>,
    config: MongoConfig,
    state: AtomicU8,
}

impl MongoPostRepository {
    /// Build the client from configuration and optionally open it right away.
    pub async fn connect(config: MongoConfig, open: bool) -> Result<Self, RepoError> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        options.app_name = Some("quill".to_string());
        options.connect_timeout = Some(config.timeout);
        options.server_selection_timeout = Some(config.timeout);

        let client =
            Client::with_options(options).map_err(|e| RepoError::Connection(e.to_string()))?;
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB post repository created"
        );

        let repo = Self {
            client,
            collection,
            config,
            state: AtomicU8::new(CREATED),
        };

        if open {
            repo.open().await?;
        }

        Ok(repo)
    }

    pub fn is_open(&self) -> bool {
        self.state.load(Ordering::Acquire) == OPEN
    }

    fn ensure_open(&self) -> Result<(), RepoError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(RepoError::NotOpen)
        }
    }

    /// Run one store operation under the configured timeout.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        tokio::time::timeout(self.config.timeout, fut)
            .await
            .map_err(|_| {
                tracing::warn!(operation, "Store operation timed out");
                RepoError::Timeout {
                    operation,
                    after: self.config.timeout,
                }
            })?
    }
}

fn query_error(err: mongodb::error::Error) -> RepoError {
    RepoError::Query(err.to_string())
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn open(&self) -> Result<(), RepoError> {
        match self.state.load(Ordering::Acquire) {
            OPEN => return Ok(()),
            CLOSED => {
                return Err(RepoError::Connection(
                    "repository was closed and cannot be reopened".to_string(),
                ));
            }
            _ => {}
        }

        self.bounded("open", async {
            self.client
                .database("admin")
                .run_command(doc! { "ping": 1 })
                .await
                .map_err(|e| RepoError::Connection(e.to_string()))
        })
        .await?;

        // A concurrent close wins; opening never resurrects a closed client.
        let _ = self
            .state
            .compare_exchange(CREATED, OPEN, Ordering::AcqRel, Ordering::Acquire);
        self.ensure_open()?;

        tracing::info!("MongoDB connection opened");
        Ok(())
    }

    async fn close(&self) -> Result<(), RepoError> {
        if self.state.swap(CLOSED, Ordering::AcqRel) != OPEN {
            return Ok(());
        }

        let client = self.client.clone();
        self.bounded("close", async move {
            client.shutdown().await;
            Ok::<_, RepoError>(())
        })
        .await?;

        tracing::info!("MongoDB connection closed");
        Ok(())
    }

    async fn save(&self, post: &Post) -> Result<(), RepoError> {
        self.ensure_open()?;
        let id = post.id();
        let document = encode(post)?;

        let result = self
            .bounded("save", async {
                self.collection
                    .replace_one(id_filter(id), document)
                    .upsert(true)
                    .await
                    .map_err(query_error)
            })
            .await?;

        tracing::debug!(
            post_id = %id,
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "Post saved"
        );
        Ok(())
    }

    async fn fetch_one(&self, id: Uuid) -> Result<Post, RepoError> {
        self.ensure_open()?;

        let found = self
            .bounded("fetch_one", async {
                self.collection
                    .find_one(id_filter(id))
                    .await
                    .map_err(query_error)
            })
            .await?;

        match found {
            Some(document) => decode(document),
            None => {
                tracing::debug!(post_id = %id, "Post not found");
                Err(RepoError::NotFound)
            }
        }
    }

    async fn fetch_many(
        &self,
        before: DateTime<Utc>,
        page_size: usize,
    ) -> Result<Vec<Post>, RepoError> {
        self.ensure_open()?;

        // A zero limit means "unlimited" to the server.
        if page_size == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(page_size).unwrap_or(i64::MAX);
        let policy = self.config.decode_policy;

        self.bounded("fetch_many", async {
            let cursor = self
                .collection
                .find(published_before(before))
                .projection(listing_projection())
                .limit(limit)
                .await
                .map_err(query_error)?;

            let documents: Vec<Document> = cursor.try_collect().await.map_err(query_error)?;
            let posts = collect_listing(documents, policy)?;

            tracing::debug!(
                before = %before.to_rfc3339(),
                returned = posts.len(),
                "Posts fetched"
            );
            Ok::<_, RepoError>(posts)
        })
        .await
    }

    async fn remove(&self, id: Uuid) -> Result<(), RepoError> {
        self.ensure_open()?;

        let result = self
            .bounded("remove", async {
                self.collection
                    .delete_one(id_filter(id))
                    .await
                    .map_err(query_error)
            })
            .await?;

        tracing::debug!(post_id = %id, deleted = result.deleted_count, "Post removed");
        Ok(())
    }
}
