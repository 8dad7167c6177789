//! Owner-only file persistence.
//!
//! Material is staged into a temporary file next to its destination and renamed
//! into place, so a reader never sees a half-written key or certificate.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{CertGenError, Result};

/// Mode of every written file: owner read/write, nothing for group or other.
pub const FILE_MODE: u32 = 0o600;

/// Contents written to a temporary file, waiting to be renamed over `destination`.
///
/// Dropping a staged file without committing removes the temporary file.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    destination: PathBuf,
}

impl StagedFile {
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Atomically replaces the destination with the staged contents.
    pub fn commit(self) -> Result<()> {
        let destination = self.destination;
        self.file
            .persist(&destination)
            .map_err(|e| CertGenError::StorageWrite {
                path: destination.clone(),
                source: e.error,
            })?;
        debug!(path = %destination.display(), "wrote file");
        Ok(())
    }
}

/// Creates `dir` and any missing parents.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| CertGenError::StorageWrite {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes `contents` to a restricted temporary file in the destination's directory.
pub fn stage(destination: PathBuf, contents: &[u8]) -> Result<StagedFile> {
    let write_error = |source| CertGenError::StorageWrite {
        path: destination.clone(),
        source,
    };

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    restrict_permissions(file.path()).map_err(write_error)?;
    file.write_all(contents).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;

    Ok(StagedFile { file, destination })
}

/// Reads a whole file.
pub fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| CertGenError::StorageRead {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(FILE_MODE))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
