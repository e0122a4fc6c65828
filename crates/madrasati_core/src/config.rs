//! Portal configuration.
//!
//! # Responsibility
//! - Describe where the store lives and which failure policies apply.
//! - Load settings from a TOML file for hosts that keep one on disk.
//!
//! # Invariants
//! - Every field has a lenient default: ignore missing targets, last write wins.
//! - Unknown keys are rejected so typos do not silently fall back to defaults.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// What an operation does when its target id, grade or index does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundPolicy {
    /// Log a warning and return success without changing anything.
    #[default]
    Lenient,
    /// Return `RepoError::NotFound`.
    Strict,
}

/// What `Store::commit` does when the persisted revision moved underneath it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Overwrite the newer revision and log a warning.
    #[default]
    LastWriteWins,
    /// Drop the local edit, reload the table and return `StoreError::StaleSnapshot`.
    RejectStale,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortalConfig {
    /// SQLite file backing the store. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    pub not_found: NotFoundPolicy,
    pub conflicts: ConflictPolicy,
    /// `trace|debug|info|warn|error`; defaults to the build-mode level.
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl PortalConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(ConfigError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        Self::from_toml_str(&raw)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid portal config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConflictPolicy, NotFoundPolicy, PortalConfig};
    use std::path::PathBuf;

    #[test]
    fn empty_config_uses_lenient_defaults() {
        let config = PortalConfig::from_toml_str("").unwrap();
        assert_eq!(config, PortalConfig::default());
        assert_eq!(config.not_found, NotFoundPolicy::Lenient);
        assert_eq!(config.conflicts, ConflictPolicy::LastWriteWins);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn full_config_parses() {
        let config = PortalConfig::from_toml_str(
            r#"
            db_path = "/var/lib/madrasati/portal.sqlite3"
            not_found = "strict"
            conflicts = "reject_stale"
            log_level = "debug"
            log_dir = "/var/log/madrasati"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/var/lib/madrasati/portal.sqlite3"))
        );
        assert_eq!(config.not_found, NotFoundPolicy::Strict);
        assert_eq!(config.conflicts, ConflictPolicy::RejectStale);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = PortalConfig::from_toml_str("not_found_policy = \"strict\"").unwrap_err();
        assert!(err.to_string().contains("invalid portal config"));
    }
}
