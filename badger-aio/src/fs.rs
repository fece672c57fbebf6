/*
File: badger-aio/src/fs.rs
Purpose: Primitive synchronous filesystem operations.
*/
use std::{
    fs::{self, File, Permissions},
    io,
    os::unix::fs::{MetadataExt, PermissionsExt},
    path::Path,
};

use badger_common::error::{BadgerError, Result};
use tracing::{debug, error, warn};

/// Execute bits for owner, group and other.
pub const EXEC_BITS: u32 = 0o111;

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    debug!("Creating directory recursively: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        BadgerError::from(e)
    })
}

/// Removes a file. Returns `false` if it was already gone.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    debug!("Removing file: {}", path.display());
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("File {} already absent", path.display());
            Ok(false)
        }
        Err(e) => {
            error!("Failed remove file {}: {}", path.display(), e);
            Err(BadgerError::from(e))
        }
    }
}

/// Sets file permissions. Mode is standard Unix octal mode.
pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    debug!("Setting permissions on {}: {:o}", path.display(), mode);
    fs::set_permissions(path, Permissions::from_mode(mode)).map_err(|e| {
        error!("Failed set permissions on {}: {}", path.display(), e);
        BadgerError::from(e)
    })
}

/// ORs `bits` into the current mode of `path`.
pub fn add_mode_bits(path: &Path, bits: u32) -> Result<()> {
    let mode = fs::metadata(path)?.permissions().mode();
    set_permissions(path, mode | bits)
}

/// True if any execute bit is set on `path`.
pub fn is_executable(path: &Path) -> Result<bool> {
    let mode = fs::metadata(path)?.permissions().mode();
    Ok(mode & EXEC_BITS != 0)
}

/// True if both paths exist and name the same inode.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

/// Copies `src` over `dst` byte for byte, keeping permission bits and
/// (best effort) the modification time. Copying a file onto itself is a
/// no-op that returns its current size.
pub fn copy_file_preserving(src: &Path, dst: &Path) -> Result<u64> {
    if is_same_file(src, dst) {
        debug!("{} is already in place, skipping copy", dst.display());
        return Ok(fs::metadata(dst)?.len());
    }
    debug!("Copying {} -> {}", src.display(), dst.display());
    let bytes = fs::copy(src, dst).map_err(|e| {
        error!(
            "Failed copy {} -> {}: {}",
            src.display(),
            dst.display(),
            e
        );
        BadgerError::from(e)
    })?;

    let preserve_mtime = || -> io::Result<()> {
        let modified = fs::metadata(src)?.modified()?;
        File::options().write(true).open(dst)?.set_modified(modified)
    };
    if let Err(e) = preserve_mtime() {
        warn!(
            "Could not preserve modification time on {}: {}",
            dst.display(),
            e
        );
    }

    Ok(bytes)
}

/// Writes `content` to `path` (truncating) and sets `mode`.
pub fn write_file_with_mode(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    debug!(
        "Writing {} bytes to {} (mode {:o})",
        content.len(),
        path.display(),
        mode
    );
    fs::write(path, content).map_err(|e| {
        error!("Failed write file {}: {}", path.display(), e);
        BadgerError::from(e)
    })?;
    set_permissions(path, mode)
}
