//! Atomic file writes
//!
//! Exports and cached images are written to a temporary file next to the
//! target and renamed into place, so a reader sees either the old file or
//! the complete new one.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Mode of every file written here (owner rw, group and others r)
#[cfg(unix)]
pub const FILE_MODE: u32 = 0o644;

/// Writes `bytes` to `target` atomically, creating parent directories
///
/// The temporary file is created owner-only; it is widened to the usual
/// file mode before the rename so the result matches a plain `File::create`.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    set_file_mode(tmp.as_file())?;
    tmp.write_all(bytes)?;
    tmp.flush()?;

    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_file_mode(file: &std::fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(FILE_MODE))
}

#[cfg(not(unix))]
fn set_file_mode(_file: &std::fs::File) -> io::Result<()> {
    Ok(())
}
