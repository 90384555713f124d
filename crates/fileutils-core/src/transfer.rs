//! Relocation primitives shared by `move`.
//!
//! A plain `rename` is attempted first; only a cross-device failure falls back to a
//! recursive copy followed by removal of the source. A copy that fails partway removes
//! what it wrote, so a failed move leaves the destination as it found it.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{OperationError, OperationOutcome};

/// Move `source` to `destination`, copying across filesystems when needed.
pub(crate) fn move_tree(source: &Path, destination: &Path) -> OperationOutcome<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                source = %source.display(),
                destination = %destination.display(),
                "rename crossed devices; copying instead"
            );
            relocate_by_copy(source, destination)
        }
        Err(err) => Err(OperationError::io("move", source, err)),
    }
}

fn relocate_by_copy(source: &Path, destination: &Path) -> OperationOutcome<()> {
    let preexisting = fs::symlink_metadata(destination).is_ok();
    if let Err(err) = copy_tree(source, destination) {
        let partial = !preexisting && fs::symlink_metadata(destination).is_ok();
        if let Some(cleanup) = partial
            .then(|| remove_entry(destination))
            .and_then(Result::err)
        {
            warn!(
                destination = %destination.display(),
                error = %cleanup,
                "failed to remove partial copy"
            );
        }
        return Err(err);
    }
    remove_entry(source)
}

/// Remove a file, symlink or directory tree without following symlinks.
pub(crate) fn remove_entry(path: &Path) -> OperationOutcome<()> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|source_err| OperationError::io("inspect", path, source_err))?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
            .map_err(|source_err| OperationError::io("remove directory", path, source_err))
    } else {
        fs::remove_file(path)
            .map_err(|source_err| OperationError::io("remove file", path, source_err))
    }
}

fn copy_tree(source: &Path, destination: &Path) -> OperationOutcome<()> {
    if !fs::symlink_metadata(source)
        .map_err(|source_err| OperationError::io("inspect", source, source_err))?
        .is_dir()
    {
        return copy_entry(source, destination);
    }

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|source_err| OperationError::walk(source, source_err))?;
        let relative = entry.path().strip_prefix(source).map_err(|_| {
            OperationError::io(
                "relativise",
                entry.path(),
                io::Error::other("entry escaped the copy root"),
            )
        })?;
        let target_path = destination.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path).map_err(|source_err| {
                OperationError::io("create directory", &target_path, source_err)
            })?;
        } else {
            copy_entry(entry.path(), &target_path)?;
        }
    }

    Ok(())
}

fn copy_entry(source: &Path, destination: &Path) -> OperationOutcome<()> {
    #[cfg(unix)]
    if fs::symlink_metadata(source).is_ok_and(|meta| meta.file_type().is_symlink()) {
        let target = fs::read_link(source)
            .map_err(|source_err| OperationError::io("read link", source, source_err))?;
        return std::os::unix::fs::symlink(&target, destination)
            .map_err(|source_err| OperationError::io("create link", destination, source_err));
    }

    fs::copy(source, destination)
        .map(|_| ())
        .map_err(|source_err| OperationError::io("copy", destination, source_err))
}
