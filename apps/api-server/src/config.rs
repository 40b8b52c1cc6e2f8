//! Application configuration loaded from environment variables.

use std::env;
#[cfg(feature = "mongodb")]
use std::path::PathBuf;
#[cfg(feature = "mongodb")]
use std::time::Duration;

#[cfg(feature = "mongodb")]
use quill_infra::database::DecodePolicy;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Number of posts per listing page.
    pub page_size: usize,
    #[cfg(feature = "mongodb")]
    pub storage: StorageConfig,
}

/// Where and how to reach the document store.
#[cfg(feature = "mongodb")]
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Three-line key file: connection string, database, collection.
    pub key_file: PathBuf,
    pub timeout: Duration,
    pub decode_policy: DecodePolicy,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            page_size: lookup("POSTS_PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            #[cfg(feature = "mongodb")]
            storage: StorageConfig {
                key_file: lookup("STORAGE_CONFIG")
                    .unwrap_or_else(|| "storage.cfg".to_string())
                    .into(),
                timeout: Duration::from_secs(
                    lookup("STORE_TIMEOUT_SECS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(5),
                ),
                decode_policy: Self::parse_decode_policy(lookup("FETCH_MANY_DECODE")),
            },
        }
    }

    /// Format: FETCH_MANY_DECODE=fail-fast|skip-invalid
    #[cfg(feature = "mongodb")]
    fn parse_decode_policy(value: Option<String>) -> DecodePolicy {
        match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("skip-invalid") => DecodePolicy::SkipInvalid,
            Some("fail-fast") | None => DecodePolicy::FailFast,
            Some(other) => {
                tracing::warn!(value = other, "Unknown FETCH_MANY_DECODE, using fail-fast");
                DecodePolicy::FailFast
            }
        }
    }
}
