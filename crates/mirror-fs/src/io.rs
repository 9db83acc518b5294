//! Mutating filesystem operations with path-annotated errors

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Copy `from` onto `to` atomically.
///
/// Copies into a temp file in the destination folder (same filesystem), stamps
/// it with the source modification time, then renames it over the target so a
/// reader never observes a half-written file.
pub fn copy_atomic(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_path_for(to);
    if let Err(e) = copy_into(from, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, to).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(to, e)
    })
}

fn copy_into(from: &Path, temp_path: &Path) -> Result<()> {
    fs::copy(from, temp_path).map_err(|e| Error::io(from, e))?;

    let modified = fs::metadata(from)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::io(from, e))?;

    let file = OpenOptions::new()
        .write(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;
    file.set_modified(modified)
        .map_err(|e| Error::io(temp_path, e))?;
    file.sync_all().map_err(|e| Error::io(temp_path, e))
}

/// `.{name}.{pid}.tmp` beside the target
fn temp_path_for(target: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        target
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    target.with_file_name(temp_name)
}

/// Create a folder and any missing parents.
pub fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Rename a file or folder, creating the target's parent folder if needed.
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::rename(from, to).map_err(|e| Error::io(from, e))
}

pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

pub fn remove_dir_all(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_atomic_creates_parents_and_preserves_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("src.txt");
        let to = dir.path().join("deep").join("nested").join("dst.txt");
        fs::write(&from, "payload").unwrap();

        copy_atomic(&from, &to).unwrap();

        assert_eq!(fs::read_to_string(&to).unwrap(), "payload");
        let src_mtime = fs::metadata(&from).unwrap().modified().unwrap();
        let dst_mtime = fs::metadata(&to).unwrap().modified().unwrap();
        assert_eq!(src_mtime, dst_mtime);
    }

    #[test]
    fn copy_atomic_overwrites_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");
        fs::write(&from, "new").unwrap();
        fs::write(&to, "old content").unwrap();

        copy_atomic(&from, &to).unwrap();

        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left: {:?}", leftovers);
    }

    #[test]
    fn copy_atomic_missing_source_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let result = copy_atomic(&dir.path().join("nope"), &dir.path().join("out"));

        assert!(result.is_err());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn rename_creates_target_parent() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("file.txt");
        let to = dir.path().join("moved").join("file.txt");
        fs::write(&from, "x").unwrap();

        rename(&from, &to).unwrap();

        assert!(!from.exists());
        assert!(to.exists());
    }
}
