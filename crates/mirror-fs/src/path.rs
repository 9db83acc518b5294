//! Root-relative paths used as keys when comparing two trees

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path relative to a tree root, stored with forward slashes.
///
/// The same `RelPath` addresses corresponding entries in the source and
/// destination trees; it is converted to a platform-native path only at I/O
/// boundaries via [`RelPath::under`]. Components are never empty, `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelPath {
    inner: String,
}

impl RelPath {
    /// Parse a relative path, accepting either separator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRelativePath`] for empty input, absolute paths,
    /// or paths containing `.`/`..` components.
    pub fn parse(path: &str) -> Result<Self> {
        let normalized = path.replace('\\', "/");
        if normalized.starts_with('/') {
            return Err(Error::InvalidRelativePath {
                path: path.to_string(),
            });
        }

        let components: Vec<&str> = normalized.split('/').filter(|c| !c.is_empty()).collect();
        if components.is_empty() || components.iter().any(|c| *c == "." || *c == "..") {
            return Err(Error::InvalidRelativePath {
                path: path.to_string(),
            });
        }

        Ok(Self {
            inner: components.join("/"),
        })
    }

    /// A single-component path directly under the root.
    pub(crate) fn top(name: &str) -> Self {
        Self {
            inner: name.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Append one component.
    pub fn join(&self, name: &str) -> Self {
        Self {
            inner: format!("{}/{}", self.inner, name),
        }
    }

    /// The containing folder, or `None` for entries directly under the root.
    pub fn parent(&self) -> Option<Self> {
        self.inner.rfind('/').map(|idx| Self {
            inner: self.inner[..idx].to_string(),
        })
    }

    /// The last component.
    pub fn file_name(&self) -> &str {
        self.inner.rsplit('/').next().unwrap_or(&self.inner)
    }

    /// True if `self` lies strictly below `ancestor`.
    pub fn is_within(&self, ancestor: &RelPath) -> bool {
        self.inner.len() > ancestor.inner.len()
            && self.inner.starts_with(&ancestor.inner)
            && self.inner.as_bytes()[ancestor.inner.len()] == b'/'
    }

    /// The remainder of `self` below `ancestor`.
    pub fn strip_prefix(&self, ancestor: &RelPath) -> Option<Self> {
        if !self.is_within(ancestor) {
            return None;
        }
        Some(Self {
            inner: self.inner[ancestor.inner.len() + 1..].to_string(),
        })
    }

    /// Resolve against a tree root into a native path.
    pub fn under(&self, root: &Path) -> PathBuf {
        self.inner
            .split('/')
            .fold(root.to_path_buf(), |acc, component| acc.join(component))
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
