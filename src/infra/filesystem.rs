//! Filesystem operations
//!
//! Handles directory creation, forced removal, writability probing and
//! scoped working-directory changes.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::defaults::WRITE_CHECK_FILE;
use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a file if it exists
pub fn remove_file_if_exists(path: &Path) -> Result<(), FilesystemError> {
    if path.is_file() {
        fs::remove_file(path).map_err(|e| FilesystemError::RemoveFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Remove a directory and all its contents, clearing read-only flags first
///
/// Returns `Ok(false)` when there was nothing to remove.
pub fn remove_dir_all_forced(path: &Path) -> Result<bool, FilesystemError> {
    if !path.is_dir() {
        return Ok(false);
    }

    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        if entry.file_type().is_symlink() {
            continue;
        }
        make_writable(entry.path()).map_err(|e| FilesystemError::RemoveDir {
            path: entry.path().to_path_buf(),
            error: e.to_string(),
        })?;
    }

    fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(true)
}

fn make_writable(path: &Path) -> std::io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    if !perms.readonly() {
        return Ok(());
    }

    tracing::debug!("Clearing read-only flag on {}", path.display());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(perms.mode() | 0o200);
    }
    #[cfg(not(unix))]
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);

    fs::set_permissions(path, perms)
}

/// Make sure `dir` exists and can be written to
///
/// An existing directory is checked by creating and deleting a sentinel
/// file; a missing one is created. No permission repair is attempted.
pub fn ensure_writable(dir: &Path) -> Result<(), FilesystemError> {
    let not_writable = |e: std::io::Error| {
        tracing::debug!("Write check failed for {}: {e}", dir.display());
        FilesystemError::NotWritable {
            path: dir.to_path_buf(),
        }
    };

    if dir.is_dir() {
        let sentinel = dir.join(WRITE_CHECK_FILE);
        fs::File::create(&sentinel).map_err(not_writable)?;
        fs::remove_file(&sentinel).map_err(not_writable)?;
    } else {
        fs::create_dir_all(dir).map_err(not_writable)?;
    }
    Ok(())
}

/// Switches the process working directory and restores it when dropped
#[derive(Debug)]
pub struct WorkingDirGuard {
    previous: PathBuf,
}

impl WorkingDirGuard {
    /// Change into `dir`, remembering the current directory
    pub fn enter(dir: &Path) -> Result<Self, FilesystemError> {
        let change_err = |e: std::io::Error| FilesystemError::ChangeDir {
            path: dir.to_path_buf(),
            error: e.to_string(),
        };
        let previous = std::env::current_dir().map_err(change_err)?;
        std::env::set_current_dir(dir).map_err(change_err)?;
        tracing::debug!("Entered {}", dir.display());
        Ok(Self { previous })
    }

    /// Directory that will be restored on drop
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            tracing::warn!(
                "Could not restore working directory {}: {e}",
                self.previous.display()
            );
        }
    }
}
