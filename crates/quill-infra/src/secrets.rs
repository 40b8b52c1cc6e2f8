//! Key-file secret provider.

use std::fmt;
use std::path::Path;

use quill_core::error::ConfigError;
use quill_core::ports::{SecretName, SecretProvider};

/// Secrets read from a line-oriented key file.
///
/// The file holds exactly three lines, in order: connection string, database
/// name, collection name. Trailing blank lines are ignored.
pub struct FileSecretProvider {
    storage: String,
    database: String,
    collection: String,
}

impl FileSecretProvider {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let provider = Self::parse(&text)?;
        tracing::info!(path = %path.display(), "Storage configuration loaded");
        Ok(provider)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        match lines.as_slice() {
            [storage, database, collection] => Ok(Self {
                storage: storage.to_string(),
                database: database.to_string(),
                collection: collection.to_string(),
            }),
            _ => Err(ConfigError::Malformed { found: lines.len() }),
        }
    }
}

impl SecretProvider for FileSecretProvider {
    fn secret(&self, name: SecretName) -> &str {
        match name {
            SecretName::Storage => &self.storage,
            SecretName::Database => &self.database,
            SecretName::Collection => &self.collection,
        }
    }
}

impl fmt::Debug for FileSecretProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSecretProvider")
            .field("storage", &"***")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}
