//! Folder layout reconciliation

use std::collections::BTreeSet;

use mirror_fs::{RelPath, TreeSnapshot, io};

use super::{SyncPass, top_most};
use crate::{Result, SyncRequest, SyncStatistics};

/// Makes the destination's folders match the source's.
///
/// Order of work:
/// 1. files standing where a folder is needed are removed
/// 2. destination-only folders whose content signature matches a source-only
///    folder are renamed into place, at any depth
/// 3. remaining source-only folders are created
/// 4. remaining destination-only folders are removed with their contents
#[derive(Debug, Default, Clone, Copy)]
pub struct FolderPass;

impl FolderPass {
    pub fn new() -> Self {
        Self
    }
}

impl SyncPass for FolderPass {
    fn name(&self) -> &'static str {
        "folder"
    }

    fn run(&self, request: &SyncRequest) -> Result<SyncStatistics> {
        let mut stats = SyncStatistics::new();
        let source = TreeSnapshot::scan(request.source())?;
        io::create_dir_all(request.destination())?;
        let destination = TreeSnapshot::scan(request.destination())?;

        let missing: BTreeSet<RelPath> = source
            .folders()
            .difference(destination.folders())
            .cloned()
            .collect();

        for path in &missing {
            if destination.file(path).is_some() {
                tracing::debug!(path = %path, "Removing file that blocks a folder");
                io::remove_file(&destination.native(path))?;
                stats.record_deleted_file();
            }
        }

        let moved = move_folders(&source, &destination, &missing, &mut stats)?;
        let destination = if moved {
            TreeSnapshot::scan(request.destination())?
        } else {
            destination
        };

        for path in source.folders().difference(destination.folders()) {
            tracing::debug!(path = %path, "Creating folder");
            io::create_dir_all(&destination.native(path))?;
            stats.record_changed_folder();
        }

        let extra: BTreeSet<RelPath> = destination
            .folders()
            .difference(source.folders())
            .cloned()
            .collect();
        for path in top_most(&extra) {
            let removed = 1 + destination.folders_within(&path).count() as u64;
            tracing::debug!(path = %path, folders = removed, "Removing folder");
            io::remove_dir_all(&destination.native(&path))?;
            stats.record_deleted_folders(removed);
        }

        Ok(stats)
    }
}

/// Rename destination-only folders onto matching source-only locations.
///
/// Source-only folders are visited parents first, so the outermost match
/// wins. Missing ancestors of a move target are created (and counted) before
/// the rename. Returns whether anything was moved.
fn move_folders(
    source: &TreeSnapshot,
    destination: &TreeSnapshot,
    missing: &BTreeSet<RelPath>,
    stats: &mut SyncStatistics,
) -> Result<bool> {
    let mut candidates: Vec<(RelPath, Vec<(RelPath, u64)>)> = destination
        .folders()
        .difference(source.folders())
        .map(|path| (path.clone(), destination.signature(path)))
        .filter(|(_, signature)| !signature.is_empty())
        .collect();
    if candidates.is_empty() {
        return Ok(false);
    }

    let mut created: BTreeSet<RelPath> = BTreeSet::new();
    let mut moved_to: Vec<RelPath> = Vec::new();
    for target in missing {
        if created.contains(target) || moved_to.iter().any(|m| target.is_within(m)) {
            continue;
        }
        let wanted = source.signature(target);
        if wanted.is_empty() {
            continue;
        }

        let Some(idx) = candidates
            .iter()
            .position(|(_, signature)| *signature == wanted)
        else {
            continue;
        };
        let (from, _) = candidates.swap_remove(idx);
        // Folders inside or around `from` no longer exist where they were.
        candidates.retain(|(path, _)| !path.is_within(&from) && !from.is_within(path));

        let mut ancestors = Vec::new();
        let mut current = target.parent();
        while let Some(ancestor) = current {
            if missing.contains(&ancestor) && !created.contains(&ancestor) {
                ancestors.push(ancestor.clone());
            }
            current = ancestor.parent();
        }
        for ancestor in ancestors.into_iter().rev() {
            tracing::debug!(path = %ancestor, "Creating folder");
            io::create_dir_all(&destination.native(&ancestor))?;
            stats.record_changed_folder();
            created.insert(ancestor);
        }

        tracing::info!(from = %from, to = %target, "Moving folder");
        io::rename(&destination.native(&from), &destination.native(target))?;
        stats.record_moved_folder(wanted.len() as u64);
        created.insert(target.clone());
        moved_to.push(target.clone());
    }

    Ok(!moved_to.is_empty())
}
