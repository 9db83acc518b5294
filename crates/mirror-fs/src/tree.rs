//! Point-in-time listing of a folder tree

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::{Error, RelPath, Result};

/// Size and modification time of a file, as seen during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl FileMeta {
    /// True when size and modification time both match, which is treated as
    /// "unchanged" without reading contents.
    pub fn same_stamp(&self, other: &FileMeta) -> bool {
        self.size == other.size && self.modified.is_some() && self.modified == other.modified
    }
}

/// Every folder and regular file below a root, keyed by [`RelPath`].
///
/// Symbolic links are not followed and not listed. Entries whose names are not
/// valid UTF-8 are skipped with a warning.
#[derive(Debug, Clone)]
pub struct TreeSnapshot {
    root: PathBuf,
    folders: BTreeSet<RelPath>,
    files: BTreeMap<RelPath, FileMeta>,
}

impl TreeSnapshot {
    /// Walk `root` and record its contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotADirectory`] if `root` is missing or not a folder,
    /// and [`Error::Io`] if any folder cannot be listed.
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut snapshot = Self {
            root: root.to_path_buf(),
            folders: BTreeSet::new(),
            files: BTreeMap::new(),
        };

        let mut pending: Vec<(PathBuf, Option<RelPath>)> = vec![(root.to_path_buf(), None)];
        while let Some((dir, rel)) = pending.pop() {
            let entries = fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| Error::io(&dir, e))?;
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    tracing::warn!(path = %entry.path().display(), "Skipping entry with non UTF-8 name");
                    continue;
                };
                let child = match &rel {
                    Some(parent) => parent.join(&name),
                    None => RelPath::top(&name),
                };

                let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
                if file_type.is_dir() {
                    snapshot.folders.insert(child.clone());
                    pending.push((entry.path(), Some(child)));
                } else if file_type.is_file() {
                    let meta = entry.metadata().map_err(|e| Error::io(entry.path(), e))?;
                    snapshot.files.insert(
                        child,
                        FileMeta {
                            size: meta.len(),
                            modified: meta.modified().ok(),
                        },
                    );
                } else {
                    tracing::debug!(path = %entry.path().display(), "Skipping non-regular entry");
                }
            }
        }

        tracing::debug!(
            root = %root.display(),
            folders = snapshot.folders.len(),
            files = snapshot.files.len(),
            "Scanned tree"
        );
        Ok(snapshot)
    }

    pub fn folders(&self) -> &BTreeSet<RelPath> {
        &self.folders
    }

    pub fn files(&self) -> &BTreeMap<RelPath, FileMeta> {
        &self.files
    }

    pub fn has_folder(&self, path: &RelPath) -> bool {
        self.folders.contains(path)
    }

    pub fn file(&self, path: &RelPath) -> Option<&FileMeta> {
        self.files.get(path)
    }

    /// Native path of an entry in this tree.
    pub fn native(&self, path: &RelPath) -> PathBuf {
        path.under(&self.root)
    }

    /// Files anywhere below `folder`.
    pub fn files_within<'a>(
        &'a self,
        folder: &'a RelPath,
    ) -> impl Iterator<Item = (&'a RelPath, &'a FileMeta)> + 'a {
        self.files.iter().filter(move |(path, _)| path.is_within(folder))
    }

    /// Folders anywhere below `folder`.
    pub fn folders_within<'a>(&'a self, folder: &'a RelPath) -> impl Iterator<Item = &'a RelPath> + 'a {
        self.folders.iter().filter(move |path| path.is_within(folder))
    }

    /// Sorted `(path below folder, size)` pairs describing a folder's content.
    ///
    /// Two folders with equal non-empty signatures are considered the same
    /// folder under different names.
    pub fn signature(&self, folder: &RelPath) -> Vec<(RelPath, u64)> {
        self.files_within(folder)
            .filter_map(|(path, meta)| path.strip_prefix(folder).map(|rel| (rel, meta.size)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rel(path: &str) -> RelPath {
        RelPath::parse(path).unwrap()
    }

    #[test]
    fn scan_lists_folders_and_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("a/b/one.txt"), "1").unwrap();
        fs::write(dir.path().join("top.txt"), "top").unwrap();

        let snapshot = TreeSnapshot::scan(dir.path()).unwrap();

        let folders: Vec<&str> = snapshot.folders().iter().map(RelPath::as_str).collect();
        assert_eq!(folders, vec!["a", "a/b", "empty"]);
        assert_eq!(snapshot.file(&rel("top.txt")).unwrap().size, 3);
        assert!(snapshot.file(&rel("a/b/one.txt")).is_some());
    }

    #[test]
    fn scan_missing_root_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = TreeSnapshot::scan(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }));
    }

    #[test]
    fn signature_is_relative_to_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs/sub")).unwrap();
        fs::write(dir.path().join("docs/a.txt"), "aa").unwrap();
        fs::write(dir.path().join("docs/sub/b.txt"), "bbb").unwrap();
        fs::write(dir.path().join("outside.txt"), "x").unwrap();

        let snapshot = TreeSnapshot::scan(dir.path()).unwrap();

        assert_eq!(
            snapshot.signature(&rel("docs")),
            vec![(rel("a.txt"), 2), (rel("sub/b.txt"), 3)]
        );
    }

    #[cfg(unix)]
    #[test]
    fn scan_does_not_follow_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("real")).unwrap();
        fs::write(dir.path().join("real/file.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let snapshot = TreeSnapshot::scan(dir.path()).unwrap();

        assert!(!snapshot.has_folder(&rel("link")));
        assert!(snapshot.file(&rel("link/file.txt")).is_none());
    }
}
