//! Scratch-directory fixtures for filesystem tests.
//!
//! # Design
//! - Keep every test artefact under `<workspace>/.server_root` so suites never write
//!   outside the checkout.
//! - Hand out `TempDir` handles so directories are removed when a test finishes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

const SERVER_ROOT_DIR: &str = ".server_root";

/// Locate the workspace root by walking up from the calling crate's manifest directory.
///
/// Falls back to `manifest_dir` when no ancestor declares a `[workspace]` table.
#[must_use]
pub fn repo_root(manifest_dir: &Path) -> PathBuf {
    for ancestor in manifest_dir.ancestors() {
        let manifest = ancestor.join("Cargo.toml");
        if fs::read_to_string(&manifest).is_ok_and(|raw| raw.contains("[workspace]")) {
            return ancestor.to_path_buf();
        }
    }
    manifest_dir.to_path_buf()
}

/// Ensure the shared `.server_root` directory exists and return its path.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn server_root(manifest_dir: &Path) -> Result<PathBuf> {
    let root = repo_root(manifest_dir).join(SERVER_ROOT_DIR);
    fs::create_dir_all(&root)
        .with_context(|| format!("failed to create scratch root {}", root.display()))?;
    Ok(root)
}

/// Create a uniquely named scratch directory below `.server_root`.
///
/// # Errors
///
/// Returns an error if the scratch root or the temporary directory cannot be created.
pub fn scratch_dir(manifest_dir: &Path, prefix: &str) -> Result<TempDir> {
    let root = server_root(manifest_dir)?;
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir_in(&root)
        .with_context(|| format!("failed to create scratch directory in {}", root.display()))
}
