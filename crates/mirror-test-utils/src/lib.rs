//! Shared test utilities for the dirmirror workspace.
//!
//! Provides [`TestTree`], a temporary source/destination pair with helpers to
//! populate either side and to assert that the destination mirrors the source.
//! It is a dev-dependency only, never published.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// One entry in a flattened tree listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Entry {
    Folder,
    File(Vec<u8>),
}

/// A temporary directory holding a `source/` and a `destination/` tree.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write_source("docs/readme.txt", "hello");
/// tree.write_destination("stale.txt", "old");
/// // ... run a sync ...
/// tree.assert_mirrored();
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create empty `source/` and `destination/` folders.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("source")).unwrap();
        fs::create_dir_all(temp_dir.path().join("destination")).unwrap();
        Self { temp_dir }
    }

    /// Create only `source/`, leaving the destination absent.
    pub fn without_destination() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("source")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn destination(&self) -> PathBuf {
        self.root().join("destination")
    }

    pub fn write_source(&self, path: &str, content: &str) {
        write_under(&self.source(), path, content);
    }

    pub fn write_destination(&self, path: &str, content: &str) {
        write_under(&self.destination(), path, content);
    }

    pub fn mkdir_source(&self, path: &str) {
        fs::create_dir_all(self.source().join(path)).unwrap();
    }

    pub fn mkdir_destination(&self, path: &str) {
        fs::create_dir_all(self.destination().join(path)).unwrap();
    }

    /// Read a destination file as text.
    ///
    /// # Panics
    /// Panics with the path if the file cannot be read.
    pub fn read_destination(&self, path: &str) -> String {
        let full_path = self.destination().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Flattened `relative path -> entry` listing of a tree.
    pub fn listing(root: &Path) -> BTreeMap<String, Entry> {
        let mut listing = BTreeMap::new();
        collect(root, root, &mut listing);
        listing
    }

    /// Assert that the destination is an exact copy of the source.
    ///
    /// # Panics
    /// Panics with a diff of the two listings if they differ.
    pub fn assert_mirrored(&self) {
        let source = Self::listing(&self.source());
        let destination = Self::listing(&self.destination());
        pretty_assertions::assert_eq!(source, destination, "destination does not mirror source");
    }

    /// Assert that `path` (relative to the destination) exists.
    pub fn assert_destination_exists(&self, path: &str) {
        let full_path = self.destination().join(path);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the destination) does **not** exist.
    pub fn assert_destination_missing(&self, path: &str) {
        let full_path = self.destination().join(path);
        assert!(
            !full_path.exists(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }
}

fn write_under(root: &Path, path: &str, content: &str) {
    let full_path = root.join(path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full_path, content).unwrap();
}

fn collect(root: &Path, dir: &Path, listing: &mut BTreeMap<String, Entry>) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        let rel = path
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        if path.is_dir() {
            listing.insert(rel, Entry::Folder);
            collect(root, &path, listing);
        } else {
            listing.insert(rel, Entry::File(fs::read(&path).unwrap()));
        }
    }
}
