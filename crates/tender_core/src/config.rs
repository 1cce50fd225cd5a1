//! Registry bootstrap configuration.
//!
//! # Responsibility
//! - Load the initial owner identity and logging options from TOML.
//!
//! # Invariants
//! - `owner` must be non-blank and is stored exactly as written; surrounding
//!   whitespace is rejected rather than trimmed.
//! - Log level falls back to `default_log_level()` when omitted.
//!
//! Example:
//!
//! ```toml
//! owner = "0xA11CE"
//!
//! [log]
//! level = "info"
//! dir = "/var/log/tender"
//! ```

use crate::logging::default_log_level;
use crate::model::tender::Identity;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Parsed registry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub owner: Identity,
    pub log: LogConfig,
}

/// Logging section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Absolute directory for rolling log files. Logging stays off when unset.
    pub dir: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    owner: String,
    #[serde(default)]
    log: Option<RawLogConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLogConfig {
    level: Option<String>,
    dir: Option<String>,
}

impl RegistryConfig {
    /// Builds a configuration with default logging for `owner`.
    pub fn with_owner(owner: impl Into<Identity>) -> Self {
        Self {
            owner: owner.into(),
            log: LogConfig::default(),
        }
    }

    /// Parses configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text).map_err(ConfigError::Parse)?;

        if raw.owner.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "owner",
                reason: "must not be blank".to_string(),
            });
        }
        if raw.owner.trim() != raw.owner {
            return Err(ConfigError::InvalidField {
                field: "owner",
                reason: "must not have leading or trailing whitespace".to_string(),
            });
        }

        let log = match raw.log {
            Some(section) => LogConfig {
                level: section
                    .level
                    .unwrap_or_else(|| default_log_level().to_string()),
                dir: section.dir.filter(|dir| !dir.trim().is_empty()),
            },
            None => LogConfig::default(),
        };

        Ok(Self {
            owner: Identity::new(raw.owner),
            log,
        })
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Configuration load/parse error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::InvalidField { field, reason } => write!(f, "config field `{field}` {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidField { .. } => None,
        }
    }
}
