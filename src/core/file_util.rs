//! File helpers for the single-file JSON database.

use std::fs::{File, OpenOptions};
use std::io::{self, Write as _};
use std::path::Path;

use tempfile::NamedTempFile;

/// Creates the database file (and, if asked, its parent directories) when it
/// does not exist yet. Existing contents are left alone.
pub(crate) fn create_if_missing(path: &Path, create_dirs: bool) -> io::Result<()> {
    if create_dirs {
        if let Some(parent) = parent_dir(path) {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    Ok(())
}

pub(crate) fn read_all(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// Replaces the data at `path` "atomically" via a rename.
pub(crate) fn save_data(path: &Path, data: &[u8]) -> io::Result<()> {
    replace_with(path, |file| file.write_all(data))
}

/// Fills a tmp file next to `path` with `write`, syncs it, then renames it
/// over `path`. If any step fails, `path` keeps its previous contents and
/// the tmp file is removed.
fn replace_with<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let dir = parent_dir(path).unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    if let Ok(metadata) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
