//! Operation executor: turns one record into exactly one filesystem mutation (or none).
//!
//! # Design
//! - `plan` validates a record (required fields, known kind, source presence, allowlist,
//!   destructive switch) before anything touches the disk.
//! - `apply` performs the single mutation for a planned action.
//! - `execute` never fails: every error becomes a failed [`OperationResult`].

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::{OperationError, OperationOutcome};
use crate::model::{OperationKind, OperationRecord, OperationResult};
use crate::policy::OperationPolicy;
use crate::transfer::{move_tree, remove_entry};

/// Executes one operation record and reports the outcome.
pub trait Execute {
    /// Run `record`, capturing every failure in the returned result.
    fn execute(&self, record: &OperationRecord) -> OperationResult;
}

/// Validated action ready to touch the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action<'a> {
    CreateFile {
        destination: &'a Path,
        content: &'a str,
    },
    CreateDir {
        destination: &'a Path,
    },
    Move {
        source: &'a Path,
        destination: &'a Path,
    },
    Delete {
        destination: &'a Path,
    },
    Rename {
        source: &'a Path,
        destination: &'a Path,
    },
}

impl Action<'_> {
    const fn label(self) -> &'static str {
        match self {
            Self::CreateFile { .. } => "create_file",
            Self::CreateDir { .. } => "create_dir",
            Self::Move { .. } => "move",
            Self::Delete { .. } => "delete",
            Self::Rename { .. } => "rename",
        }
    }

    const fn is_destructive(self) -> bool {
        matches!(
            self,
            Self::Move { .. } | Self::Delete { .. } | Self::Rename { .. }
        )
    }
}

/// Executor backed by the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsExecutor {
    policy: OperationPolicy,
}

impl FsExecutor {
    /// Construct an executor enforcing `policy`.
    #[must_use]
    pub const fn new(policy: OperationPolicy) -> Self {
        Self { policy }
    }

    fn plan<'a>(&self, record: &'a OperationRecord) -> OperationOutcome<Action<'a>> {
        let (Some(kind), Some(destination)) = (
            record.kind.as_ref(),
            record
                .destination
                .as_deref()
                .filter(|path| !path.as_os_str().is_empty()),
        ) else {
            return Err(OperationError::MissingFields);
        };

        let action = match kind {
            OperationKind::CreateFile => Action::CreateFile {
                destination,
                content: record.content(),
            },
            OperationKind::CreateDir => Action::CreateDir { destination },
            OperationKind::Delete => Action::Delete { destination },
            OperationKind::Move => Action::Move {
                source: required_source(record, kind)?,
                destination,
            },
            OperationKind::Rename => Action::Rename {
                source: required_source(record, kind)?,
                destination,
            },
            OperationKind::Unknown(raw) => {
                return Err(OperationError::UnknownOperation { kind: raw.clone() });
            }
        };

        self.policy.enforce(destination)?;
        if let Action::Move { source, .. } | Action::Rename { source, .. } = action {
            self.policy.enforce(source)?;
        }

        if kind.is_destructive() && !self.policy.allow_destructive {
            return Err(OperationError::DestructiveDisabled {
                operation: kind.as_str().to_string(),
            });
        }

        Ok(action)
    }

    fn apply(&self, action: Action<'_>) -> OperationOutcome<()> {
        match action {
            Action::CreateFile {
                destination,
                content,
            } => self.create_file(destination, content),
            Action::CreateDir { destination } => create_dir(destination),
            Action::Move {
                source,
                destination,
            } => self.move_entry(source, destination),
            Action::Delete { destination } => delete(destination),
            Action::Rename {
                source,
                destination,
            } => self.rename(source, destination),
        }
    }

    /// Writes `content`, creating parent directories. An existing file is replaced
    /// unless `overwrite_existing` is off.
    fn create_file(&self, destination: &Path, content: &str) -> OperationOutcome<()> {
        if destination.is_dir() {
            return Err(OperationError::IsADirectory {
                path: destination.to_path_buf(),
            });
        }
        ensure_parent(destination)?;

        if self.policy.overwrite_existing {
            return fs::write(destination, content)
                .map_err(|source_err| OperationError::io("write", destination, source_err));
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .map_err(|source_err| {
                if source_err.kind() == io::ErrorKind::AlreadyExists {
                    OperationError::AlreadyExists {
                        path: destination.to_path_buf(),
                    }
                } else {
                    OperationError::io("create", destination, source_err)
                }
            })?;
        file.write_all(content.as_bytes())
            .map_err(|source_err| OperationError::io("write", destination, source_err))
    }

    /// Moves `source` to `destination`; an existing directory destination receives the
    /// entry under its original name.
    fn move_entry(&self, source: &Path, destination: &Path) -> OperationOutcome<()> {
        ensure_exists(source)?;

        let target = match source.file_name() {
            Some(name) if destination.is_dir() => destination.join(name),
            _ => destination.to_path_buf(),
        };
        if self.policy.create_move_parents {
            ensure_parent(&target)?;
        }
        move_tree(source, &target)
    }

    fn rename(&self, source: &Path, destination: &Path) -> OperationOutcome<()> {
        ensure_exists(source)?;
        if self.policy.create_move_parents {
            ensure_parent(destination)?;
        }
        fs::rename(source, destination)
            .map_err(|source_err| OperationError::io("rename", source, source_err))
    }
}

impl Execute for FsExecutor {
    fn execute(&self, record: &OperationRecord) -> OperationResult {
        let outcome = self.plan(record).and_then(|action| {
            if action.is_destructive() {
                warn!(
                    operation = action.label(),
                    destination = %path_label(record.destination.as_deref()),
                    source = %path_label(record.source.as_deref()),
                    "executing destructive operation; this cannot be undone"
                );
            }
            self.apply(action).map(|()| action.label())
        });

        match outcome {
            Ok(label) => {
                info!(
                    operation = label,
                    destination = %path_label(record.destination.as_deref()),
                    "operation completed"
                );
                OperationResult::succeeded(record)
            }
            Err(err) => {
                warn!(
                    operation = %record.kind.as_ref().map_or("<missing>", OperationKind::as_str),
                    destination = %path_label(record.destination.as_deref()),
                    error = %err,
                    "operation failed"
                );
                OperationResult::failed(record, err.to_string())
            }
        }
    }
}

fn required_source<'a>(
    record: &'a OperationRecord,
    kind: &OperationKind,
) -> OperationOutcome<&'a Path> {
    record
        .source
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or_else(|| OperationError::MissingSource {
            operation: kind.as_str().to_string(),
        })
}

fn create_dir(destination: &Path) -> OperationOutcome<()> {
    if fs::symlink_metadata(destination).is_ok() && !destination.is_dir() {
        return Err(OperationError::NotADirectory {
            path: destination.to_path_buf(),
        });
    }
    fs::create_dir_all(destination)
        .map_err(|source_err| OperationError::io("create directory", destination, source_err))
}

fn delete(destination: &Path) -> OperationOutcome<()> {
    match fs::symlink_metadata(destination) {
        Ok(_) => remove_entry(destination),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(OperationError::PathNotFound {
            path: destination.to_path_buf(),
        }),
        Err(err) => Err(OperationError::io("inspect", destination, err)),
    }
}

fn ensure_exists(source: &Path) -> OperationOutcome<()> {
    match fs::symlink_metadata(source) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(OperationError::source_not_found(source))
        }
        Err(err) => Err(OperationError::io("inspect", source, err)),
    }
}

fn ensure_parent(path: &Path) -> OperationOutcome<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|source_err| OperationError::io("create directory", parent, source_err)),
        _ => Ok(()),
    }
}

fn path_label(path: Option<&Path>) -> String {
    path.map_or_else(String::new, |path| path.display().to_string())
}
