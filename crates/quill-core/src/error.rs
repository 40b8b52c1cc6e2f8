//! Domain-level error types.

use std::time::Duration;

use thiserror::Error;

/// Domain errors - failures turning client input into domain values.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid post id: {0}")]
    InvalidId(#[from] uuid::Error),

    #[error("invalid post document: {0}")]
    Deserialization(#[from] serde_json::Error),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store connection is not open")]
    NotOpen,

    #[error("query execution failed: {0}")]
    Query(String),

    #[error("{operation} timed out after {}s", after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("stored document could not be decoded: {0}")]
    Decode(String),

    #[error("post not found")]
    NotFound,
}

impl RepoError {
    /// Whether the failure happened while talking to the store (as opposed to
    /// a lookup that simply matched nothing).
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            RepoError::Query(_) | RepoError::Timeout { .. } | RepoError::Decode(_)
        )
    }
}

/// Startup configuration errors. These are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read storage configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage configuration must have exactly 3 lines, found {found}")]
    Malformed { found: usize },

    #[error("unknown secret named {0}")]
    UnknownSecret(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_operation() {
        let err = RepoError::Timeout {
            operation: "fetch_one",
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "fetch_one timed out after 5s");
        assert!(err.is_persistence());
    }

    #[test]
    fn not_found_is_not_a_persistence_failure() {
        assert!(!RepoError::NotFound.is_persistence());
        assert!(!RepoError::NotOpen.is_persistence());
    }
}
