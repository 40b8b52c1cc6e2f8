//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::error::{ConfigError, RepoError};
use quill_core::ports::{MarkupRenderer, PostRepository};
use quill_infra::CommonMarkRenderer;

#[cfg(not(feature = "mongodb"))]
use quill_infra::InMemoryPostRepository;
#[cfg(feature = "mongodb")]
use quill_infra::{FileSecretProvider, MongoConfig, MongoPostRepository};

use crate::config::AppConfig;

/// Fatal failures while assembling the application state.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unable to open post repository: {0}")]
    Store(#[from] RepoError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub renderer: Arc<dyn MarkupRenderer>,
    pub page_size: usize,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostRepository>, page_size: usize) -> Self {
        Self {
            posts,
            renderer: Arc::new(CommonMarkRenderer::new()),
            page_size,
        }
    }

    /// Build the application state with the configured repository, opened.
    pub async fn build(config: &AppConfig) -> Result<Self, StartupError> {
        #[cfg(feature = "mongodb")]
        let posts: Arc<dyn PostRepository> = {
            let secrets = FileSecretProvider::load(&config.storage.key_file)?;
            let mongo = MongoConfig::from_secrets(&secrets)
                .with_timeout(config.storage.timeout)
                .with_decode_policy(config.storage.decode_policy);
            Arc::new(MongoPostRepository::connect(mongo, true).await?)
        };

        #[cfg(not(feature = "mongodb"))]
        let posts: Arc<dyn PostRepository> = {
            tracing::warn!("Running without mongodb feature - posts are kept in memory");
            Arc::new(InMemoryPostRepository::new())
        };

        tracing::info!(page_size = config.page_size, "Application state initialized");

        Ok(Self::new(posts, config.page_size))
    }
}
