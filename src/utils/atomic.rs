//! Atomic file replacement.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Replace `path` with `data` using a temp file + rename.
///
/// The temp file lives in the target's directory so the rename stays on one
/// filesystem. The original file's permissions are carried over. On any
/// failure the original file is left as it was and the temp file is removed.
///
/// When `path` is a symbolic link, the file it points to is replaced and the
/// link itself is kept.
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let target = resolve_symlink(path)?;
    let path = target.as_path();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.flush()?;

    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|err| err.error)?;

    debug!(path = %path.display(), bytes = data.len(), "Atomic write completed");
    Ok(())
}

fn resolve_symlink(path: &Path) -> io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => fs::canonicalize(path),
        _ => Ok(path.to_path_buf()),
    }
}
