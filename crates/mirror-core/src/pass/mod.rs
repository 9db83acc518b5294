//! The two phases of a mirror run
//!
//! - **folders**: bring the destination folder layout in line with the source,
//!   renaming whole folders when they were moved
//! - **files**: bring file contents in line, renaming individual files when
//!   they were moved

mod files;
mod folders;

use std::collections::BTreeSet;

use mirror_fs::RelPath;

use crate::{Result, SyncRequest, SyncStatistics};

pub use files::FilePass;
pub use folders::FolderPass;

/// One phase of a synchronization run.
///
/// A pass mutates the destination tree and reports what it did as a fresh
/// [`SyncStatistics`] value. It may fail, in which case the run stops.
pub trait SyncPass: Send + Sync {
    /// Short name used in logs and cancellation errors
    fn name(&self) -> &'static str;

    fn run(&self, request: &SyncRequest) -> Result<SyncStatistics>;
}

/// Entries of `set` that have no ancestor in `set`.
pub(crate) fn top_most(set: &BTreeSet<RelPath>) -> Vec<RelPath> {
    set.iter()
        .filter(|path| {
            let mut current = path.parent();
            while let Some(ancestor) = current {
                if set.contains(&ancestor) {
                    return false;
                }
                current = ancestor.parent();
            }
            true
        })
        .cloned()
        .collect()
}
