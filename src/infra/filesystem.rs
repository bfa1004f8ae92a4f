//! Filesystem operations
//!
//! Handles file and directory operations.

use std::os::unix::fs::FileTypeExt;
use std::path::Path;

use crate::error::FilesystemError;

/// Check whether `path` exists and is a block special device
///
/// Symlinks are followed, so `/dev/block/by-name/boot` style links count when
/// their target is a block device.
pub fn is_block_device(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.file_type().is_block_device())
        .unwrap_or(false)
}

/// Read a file fully into memory
pub fn read_file(path: &Path) -> Result<Vec<u8>, FilesystemError> {
    std::fs::read(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a file, symlink or directory tree
///
/// A path that does not exist is not an error.
pub fn remove_path(path: &Path) -> Result<(), FilesystemError> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(FilesystemError::Remove {
                path: path.to_path_buf(),
                error: e.to_string(),
            })
        }
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    result.map_err(|e| FilesystemError::Remove {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove everything inside a directory, keeping the directory itself
///
/// Top-level entries named in `keep` are left untouched. A directory that
/// does not exist is treated as already empty.
pub fn remove_dir_contents(path: &Path, keep: &[&str]) -> Result<(), FilesystemError> {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(FilesystemError::ReadDir {
                path: path.to_path_buf(),
                error: e.to_string(),
            })
        }
    };

    for entry in entries {
        let entry = entry.map_err(|e| FilesystemError::ReadDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        if keep.iter().any(|name| entry.file_name() == *name) {
            continue;
        }
        remove_path(&entry.path())?;
    }

    Ok(())
}
