use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The fixed set of secrets the post store needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretName {
    /// Store connection string.
    Storage,
    Database,
    Collection,
}

impl SecretName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretName::Storage => "storage",
            SecretName::Database => "database",
            SecretName::Collection => "collection",
        }
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names are matched case-insensitively.
impl FromStr for SecretName {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "storage" => Ok(SecretName::Storage),
            "database" => Ok(SecretName::Database),
            "collection" => Ok(SecretName::Collection),
            _ => Err(ConfigError::UnknownSecret(name.to_string())),
        }
    }
}

/// Secret provider - immutable key/value source loaded once at startup.
///
/// The name set is closed, so a lookup cannot miss; an incomplete source is
/// rejected when the provider is built.
pub trait SecretProvider: Send + Sync {
    fn secret(&self, name: SecretName) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_case_insensitively() {
        assert_eq!("Storage".parse::<SecretName>().unwrap(), SecretName::Storage);
        assert_eq!("DATABASE".parse::<SecretName>().unwrap(), SecretName::Database);
        assert_eq!("collection".parse::<SecretName>().unwrap(), SecretName::Collection);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        match "password".parse::<SecretName>() {
            Err(ConfigError::UnknownSecret(name)) => assert_eq!(name, "password"),
            other => panic!("unexpected lookup result: {other:?}"),
        }
    }
}
