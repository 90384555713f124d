//! # Design
//!
//! - Per-operation failures are values: the executor renders them into result messages
//!   and never propagates them past the batch runner.
//! - Messages name the offending path so a caller can remediate without reading logs.
//! - Preserve OS and traversal errors as `source` for callers that inspect the chain.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for a single filesystem operation.
pub type OperationOutcome<T> = Result<T, OperationError>;

/// Failures captured while executing a single operation record.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The record lacked an operation kind or a destination.
    #[error("operation and destination are required")]
    MissingFields,
    /// The operation kind is not one of the recognised values.
    #[error("unknown operation: {kind}")]
    UnknownOperation {
        /// Raw kind supplied by the caller.
        kind: String,
    },
    /// A move or rename record omitted its source path.
    #[error("source path required for {operation} operation")]
    MissingSource {
        /// Operation that needed the source.
        operation: String,
    },
    /// The source path of a move or rename does not exist.
    #[error("source path does not exist: {}", path.display())]
    SourceNotFound {
        /// Missing source path.
        path: PathBuf,
    },
    /// The path targeted by a delete does not exist.
    #[error("path does not exist: {}", path.display())]
    PathNotFound {
        /// Missing path.
        path: PathBuf,
    },
    /// The destination exists and the policy forbids replacing it.
    #[error("destination already exists: {}", path.display())]
    AlreadyExists {
        /// Existing destination.
        path: PathBuf,
    },
    /// A directory was requested where a non-directory entry already exists.
    #[error("destination exists and is not a directory: {}", path.display())]
    NotADirectory {
        /// Conflicting path.
        path: PathBuf,
    },
    /// A file was requested where a directory already exists.
    #[error("destination is a directory: {}", path.display())]
    IsADirectory {
        /// Conflicting path.
        path: PathBuf,
    },
    /// The path falls outside every configured allowed root.
    #[error("path is outside the permitted roots: {}", path.display())]
    NotPermitted {
        /// Rejected path.
        path: PathBuf,
    },
    /// Destructive operations are switched off by policy.
    #[error("destructive operation disabled by policy: {operation}")]
    DestructiveDisabled {
        /// Operation that was refused.
        operation: String,
    },
    /// Policy validation failures.
    #[error("invalid policy field '{field}': {reason}")]
    InvalidPolicy {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// IO failures while interacting with the filesystem.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        /// Action that triggered the IO failure.
        action: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Directory traversal failures during a cross-device copy.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        /// Root of the traversal.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
}

impl OperationError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walk(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::Walk {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn source_not_found(path: &Path) -> Self {
        Self::SourceNotFound {
            path: path.to_path_buf(),
        }
    }
}
