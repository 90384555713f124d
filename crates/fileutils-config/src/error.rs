//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration failures; any of these aborts the run before a filesystem mutation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration document is not valid YAML or has the wrong shape.
    #[error("malformed configuration in {origin}: {source}")]
    Parse {
        /// Where the document came from (file path or `<inline>`).
        origin: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// A field contained an invalid value.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Human-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// An optional list is longer than the batch, so its surplus entries belong to no operation.
    #[error(
        "unresolvable list lengths: '{field}' has {len} entries but only {batch} operations are configured"
    )]
    UnresolvableLengths {
        /// List that overran the batch.
        field: &'static str,
        /// Entries in that list.
        len: usize,
        /// Batch length derived from the operation and destination lists.
        batch: usize,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
