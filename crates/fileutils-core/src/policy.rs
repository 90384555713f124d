//! Execution policy applied to every operation record.
//!
//! # Design
//! - Defaults reproduce the plain worker behaviour: overwrite on `create_file`, no implicit
//!   parent creation for `move`/`rename`, destructive operations enabled, no path allowlist.
//! - Allowlist checks compare canonical forms: the deepest existing ancestor is resolved
//!   through symlinks and the not-yet-existing tail is re-attached, so a link inside an
//!   allowed root cannot carry a write outside it.

use std::env;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OperationError, OperationOutcome};

/// Policy points consulted by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationPolicy {
    /// Replace an existing file on `create_file` instead of failing.
    pub overwrite_existing: bool,
    /// Create missing destination parents for `move` and `rename`.
    pub create_move_parents: bool,
    /// Permit `move`, `delete` and `rename`.
    pub allow_destructive: bool,
    /// Roots every touched path must live under; empty means unrestricted.
    pub allow_paths: Vec<PathBuf>,
}

impl Default for OperationPolicy {
    fn default() -> Self {
        Self {
            overwrite_existing: true,
            create_move_parents: false,
            allow_destructive: true,
            allow_paths: Vec::new(),
        }
    }
}

impl OperationPolicy {
    /// Reject malformed policy values.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidPolicy`] when an `allow_paths` entry is blank.
    pub fn validate(&self) -> OperationOutcome<()> {
        if let Some(entry) = self
            .allow_paths
            .iter()
            .find(|entry| entry.as_os_str().to_string_lossy().trim().is_empty())
        {
            return Err(OperationError::InvalidPolicy {
                field: "allow_paths",
                reason: "empty entry",
                value: Some(entry.to_string_lossy().into_owned()),
            });
        }
        Ok(())
    }

    /// Whether `path` lies under one of the allowed roots.
    #[must_use]
    pub fn permits(&self, path: &Path) -> bool {
        if self.allow_paths.is_empty() {
            return true;
        }

        let resolved = resolve(path);
        self.allow_paths
            .iter()
            .any(|allow| resolved.starts_with(resolve(allow)))
    }

    pub(crate) fn enforce(&self, path: &Path) -> OperationOutcome<()> {
        if self.permits(path) {
            Ok(())
        } else {
            Err(OperationError::NotPermitted {
                path: path.to_path_buf(),
            })
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    }
}

/// Absolute, lexically normalised form of `path` (`.` dropped, `..` folded).
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in absolute(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Canonical form of the deepest existing ancestor, with the remaining tail re-attached.
///
/// `..` segments are left to the OS while walking existing directories, so they are
/// resolved after any symlink they follow; only the missing tail is folded lexically.
fn resolve(path: &Path) -> PathBuf {
    let absolute = absolute(path);
    let mut existing = absolute.as_path();
    let mut tail = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let joined = tail
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
            return normalize(&joined);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return normalize(&absolute),
        }
    }
}
