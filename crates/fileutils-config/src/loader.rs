//! Loading the plugin configuration and zipping it into operation records.
//!
//! # Design
//! - Batch length is the longer of the operation and destination lists; a short list
//!   yields absent fields that the executor reports per record.
//! - `source` and `content` may be shorter than the batch but never longer.
//! - Validation runs before any record is produced, so a rejected document never
//!   reaches the filesystem.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use fileutils_core::{OperationKind, OperationRecord};

use crate::defaults::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{ListField, PluginConfig};
use crate::validate::{check_list_len, validate_logging, validate_policy};

const INLINE_ORIGIN: &str = "<inline>";

/// Resolve the configuration file location: explicit path, then environment, then default.
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || {
            env::var_os(CONFIG_PATH_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
        },
        Path::to_path_buf,
    )
}

impl PluginConfig {
    /// Read and validate the YAML document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, [`ConfigError::Parse`] when
    /// it is not a valid document, and validation errors for bad field values.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, &path.display().to_string())
    }

    /// Parse and validate a YAML document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents and validation errors for bad
    /// field values.
    pub fn from_yaml_str(raw: &str) -> ConfigResult<Self> {
        Self::parse(raw, INLINE_ORIGIN)
    }

    /// Build a configuration from parallel lists supplied on the command line.
    #[must_use]
    pub fn from_lists(
        operation: ListField,
        destination: ListField,
        source: ListField,
        content: ListField,
    ) -> Self {
        Self {
            operation,
            destination,
            source,
            content,
            ..Self::default()
        }
    }

    /// Number of records the configuration describes.
    #[must_use]
    pub fn batch_len(&self) -> usize {
        self.operation.len().max(self.destination.len())
    }

    /// Check policy, logging and list lengths.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_policy(&self.policy)?;
        validate_logging(&self.logging)?;
        let batch = self.batch_len();
        check_list_len("source", &self.source, batch)?;
        check_list_len("content", &self.content, batch)
    }

    /// Zip the parallel lists into ordered operation records.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnresolvableLengths`] when `source` or `content` overruns the
    /// batch.
    pub fn records(&self) -> ConfigResult<Vec<OperationRecord>> {
        let batch = self.batch_len();
        check_list_len("source", &self.source, batch)?;
        check_list_len("content", &self.content, batch)?;

        Ok((0..batch)
            .map(|index| OperationRecord {
                kind: self.operation.get(index).map(OperationKind::parse),
                destination: self.destination.get(index).map(PathBuf::from),
                source: self.source.get(index).map(PathBuf::from),
                content: self.content.get_raw(index).map(str::to_string),
            })
            .collect())
    }

    fn parse(raw: &str, origin: &str) -> ConfigResult<Self> {
        let config: Self = if raw.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
                origin: origin.to_string(),
                source,
            })?
        };
        config.validate()?;
        Ok(config)
    }
}
