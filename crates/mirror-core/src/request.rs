//! The source/destination pair a run operates on

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// One-way mirror request: make `destination` match `source`.
///
/// Existence of either path is not checked here; the passes report missing
/// trees when they scan them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    source: PathBuf,
    destination: PathBuf,
}

impl SyncRequest {
    /// # Errors
    ///
    /// Returns [`Error::EmptyPath`] if either path is empty.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let destination = destination.into();
        if source.as_os_str().is_empty() {
            return Err(Error::EmptyPath { role: "Source" });
        }
        if destination.as_os_str().is_empty() {
            return Err(Error::EmptyPath {
                role: "Destination",
            });
        }
        Ok(Self {
            source,
            destination,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}
