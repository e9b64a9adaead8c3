//! Evaluation configuration (YAML)
//!
//! ```yaml
//! version: 1
//! list:
//!   max_length: 100000   # omit for unbounded traversal
//! sqlite:
//!   path: /var/lib/triples.db   # omit for an in-memory database
//!   batch_size: 512
//! ```

pub mod error;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use error::{ConfigError, ConfigResult};

/// Supported schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    /// Schema version (always 1 for v1)
    pub version: u32,

    #[serde(default)]
    pub list: ListConfig,

    #[serde(default)]
    pub sqlite: SqliteConfig,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            version: 1,
            list: ListConfig::default(),
            sqlite: SqliteConfig::default(),
        }
    }
}

impl EvalConfig {
    /// Load and validate from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: EvalConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }
        self.list.validate()?;
        self.sqlite.validate()
    }
}

/// RDF collection traversal limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListConfig {
    /// Members yielded before traversal fails with `MalformedList`.
    /// `None` walks until `rdf:nil`, however long that takes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl ListConfig {
    pub const MAX_LENGTH_LIMIT: usize = 10_000_000;

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(n) = self.max_length {
            if n == 0 || n > Self::MAX_LENGTH_LIMIT {
                return Err(ConfigError::range_with_hint(
                    "list.max_length",
                    n,
                    1,
                    Self::MAX_LENGTH_LIMIT,
                    "Omit the field for unbounded traversal",
                ));
            }
        }
        Ok(())
    }
}

/// SQLite triple source settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteConfig {
    /// Database file; `None` opens an in-memory database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Rows fetched per cursor page
    #[serde(default = "SqliteConfig::default_batch_size")]
    pub batch_size: usize,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: None,
            batch_size: Self::default_batch_size(),
        }
    }
}

impl SqliteConfig {
    pub const MAX_BATCH_SIZE: usize = 100_000;

    fn default_batch_size() -> usize {
        256
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch_size == 0 || self.batch_size > Self::MAX_BATCH_SIZE {
            return Err(ConfigError::range_with_hint(
                "sqlite.batch_size",
                self.batch_size,
                1,
                Self::MAX_BATCH_SIZE,
                "Each cursor page must hold at least one row",
            ));
        }
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "sqlite.path must not be empty; omit it for an in-memory database".to_string(),
                ));
            }
        }
        Ok(())
    }
}
