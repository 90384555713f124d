//! Domain models for declarative filesystem operations.
//!
//! # Design
//! - Records are plain data assembled by the configuration layer; they never hold IO handles.
//! - Operation kinds form a closed enum with an explicit `Unknown` fallback so unrecognised
//!   input is reported instead of dropped.
//! - Summary counters are private and only move through `BatchSummary::push`, keeping
//!   `successful + failed == total` true by construction.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

/// Filesystem action requested by a single record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Write a file, creating missing parent directories.
    CreateFile,
    /// Create a directory tree (`mkdir -p`).
    CreateDir,
    /// Move a file or directory, falling back to copy-and-remove across devices.
    Move,
    /// Remove a file or directory tree.
    Delete,
    /// Rename a file or directory with a single OS rename.
    Rename,
    /// Any value outside the recognised set, preserved verbatim for reporting.
    Unknown(String),
}

impl OperationKind {
    /// Parse the wire representation; unrecognised values map to [`OperationKind::Unknown`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "create_file" => Self::CreateFile,
            "create_dir" => Self::CreateDir,
            "move" => Self::Move,
            "delete" => Self::Delete,
            "rename" => Self::Rename,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreateFile => "create_file",
            Self::CreateDir => "create_dir",
            Self::Move => "move",
            Self::Delete => "delete",
            Self::Rename => "rename",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// Whether the kind reads from a `source` path.
    #[must_use]
    pub const fn requires_source(&self) -> bool {
        matches!(self, Self::Move | Self::Rename)
    }

    /// Whether the kind removes or relocates existing data.
    #[must_use]
    pub const fn is_destructive(&self) -> bool {
        matches!(self, Self::Move | Self::Delete | Self::Rename)
    }
}

impl Display for OperationKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for OperationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One requested filesystem action, as zipped from the configured parallel lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationRecord {
    /// Requested action; `None` when the operation list ran short.
    pub kind: Option<OperationKind>,
    /// Target path; required for every kind.
    pub destination: Option<PathBuf>,
    /// Origin path for `move` and `rename`.
    pub source: Option<PathBuf>,
    /// Payload for `create_file`.
    pub content: Option<String>,
}

impl OperationRecord {
    /// Build a record for `kind` targeting `destination`.
    #[must_use]
    pub fn new(kind: OperationKind, destination: impl Into<PathBuf>) -> Self {
        Self {
            kind: Some(kind),
            destination: Some(destination.into()),
            source: None,
            content: None,
        }
    }

    /// Record that writes `content` to `destination`.
    #[must_use]
    pub fn create_file(destination: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(OperationKind::CreateFile, destination).with_content(content)
    }

    /// Record that creates the directory tree at `destination`.
    #[must_use]
    pub fn create_dir(destination: impl Into<PathBuf>) -> Self {
        Self::new(OperationKind::CreateDir, destination)
    }

    /// Record that moves `source` to `destination`.
    #[must_use]
    pub fn move_entry(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::new(OperationKind::Move, destination).with_source(source)
    }

    /// Record that deletes `destination`.
    #[must_use]
    pub fn delete(destination: impl Into<PathBuf>) -> Self {
        Self::new(OperationKind::Delete, destination)
    }

    /// Record that renames `source` to `destination`.
    #[must_use]
    pub fn rename(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::new(OperationKind::Rename, destination).with_source(source)
    }

    /// Attach a source path.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach a file payload.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// File payload, empty when none was supplied.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Source path echoed in results; only `move` and `rename` carry one.
    fn reported_source(&self) -> Option<&Path> {
        self.kind
            .as_ref()
            .filter(|kind| kind.requires_source())
            .and(self.source.as_deref())
    }
}

/// Outcome of executing one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    /// Echo of the requested kind.
    pub operation: Option<String>,
    /// Echo of the destination path.
    pub destination: Option<PathBuf>,
    /// Echo of the source path for `move` and `rename`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Whether the filesystem action completed.
    pub success: bool,
    /// Human-readable failure description; present only when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    /// Successful outcome for `record`.
    #[must_use]
    pub fn succeeded(record: &OperationRecord) -> Self {
        Self::echo(record, true, None)
    }

    /// Failed outcome for `record` carrying `message`.
    #[must_use]
    pub fn failed(record: &OperationRecord, message: impl Into<String>) -> Self {
        Self::echo(record, false, Some(message.into()))
    }

    fn echo(record: &OperationRecord, success: bool, error: Option<String>) -> Self {
        Self {
            operation: record.kind.as_ref().map(|kind| kind.as_str().to_string()),
            destination: record.destination.clone(),
            source: record.reported_source().map(Path::to_path_buf),
            success,
            error,
        }
    }
}

/// Aggregate over one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    total_operations: usize,
    successful_operations: usize,
    failed_operations: usize,
    results: Vec<OperationResult>,
}

impl BatchSummary {
    /// Empty summary with room for `capacity` results.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Append a result, updating the counters.
    pub fn push(&mut self, result: OperationResult) {
        self.total_operations += 1;
        if result.success {
            self.successful_operations += 1;
        } else {
            self.failed_operations += 1;
        }
        self.results.push(result);
    }

    /// Number of records processed.
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.total_operations
    }

    /// Number of records that succeeded.
    #[must_use]
    pub const fn successful_operations(&self) -> usize {
        self.successful_operations
    }

    /// Number of records that failed.
    #[must_use]
    pub const fn failed_operations(&self) -> usize {
        self.failed_operations
    }

    /// Per-record results in input order.
    #[must_use]
    pub fn results(&self) -> &[OperationResult] {
        &self.results
    }
}

impl FromIterator<OperationResult> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = OperationResult>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut summary = Self::with_capacity(iter.size_hint().0);
        for result in iter {
            summary.push(result);
        }
        summary
    }
}
