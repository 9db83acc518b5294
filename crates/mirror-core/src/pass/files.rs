//! File content reconciliation

use std::collections::{BTreeMap, BTreeSet, HashMap};

use mirror_fs::{RelPath, TreeSnapshot, checksum, io};

use super::SyncPass;
use crate::{Result, SyncRequest, SyncStatistics};

/// Makes the destination's files match the source's.
///
/// Expects the folder layout to be reconciled already. Destination-only files
/// whose content hash equals a source-only file are renamed into place; other
/// source-only or differing files are copied; leftovers are deleted. Files with
/// equal size and modification time are not read.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilePass;

impl FilePass {
    pub fn new() -> Self {
        Self
    }
}

impl SyncPass for FilePass {
    fn name(&self) -> &'static str {
        "file"
    }

    fn run(&self, request: &SyncRequest) -> Result<SyncStatistics> {
        let mut stats = SyncStatistics::new();
        let source = TreeSnapshot::scan(request.source())?;
        io::create_dir_all(request.destination())?;
        let destination = TreeSnapshot::scan(request.destination())?;

        let mut leftovers: BTreeMap<u64, Vec<RelPath>> = BTreeMap::new();
        for (path, meta) in destination.files() {
            if source.file(path).is_none() {
                leftovers.entry(meta.size).or_default().push(path.clone());
            }
        }

        let moved = move_files(&source, &destination, &mut leftovers, &mut stats)?;

        for (path, meta) in source.files() {
            if moved.contains(path) {
                continue;
            }
            let needs_copy = match destination.file(path) {
                None => true,
                Some(existing) if meta.same_stamp(existing) => false,
                Some(existing) if meta.size != existing.size => true,
                Some(_) => {
                    checksum::compute_file_checksum(&source.native(path))?
                        != checksum::compute_file_checksum(&destination.native(path))?
                }
            };
            if needs_copy {
                tracing::debug!(path = %path, "Copying file");
                io::copy_atomic(&source.native(path), &destination.native(path))?;
                stats.record_changed_file();
            }
        }

        for path in leftovers.into_values().flatten() {
            tracing::debug!(path = %path, "Deleting file");
            io::remove_file(&destination.native(&path))?;
            stats.record_deleted_file();
        }

        Ok(stats)
    }
}

/// Rename destination-only files onto source-only paths with identical content.
///
/// Matched files are removed from `leftovers`; the returned set holds the
/// source paths now satisfied by a move.
fn move_files(
    source: &TreeSnapshot,
    destination: &TreeSnapshot,
    leftovers: &mut BTreeMap<u64, Vec<RelPath>>,
    stats: &mut SyncStatistics,
) -> Result<BTreeSet<RelPath>> {
    let mut moved = BTreeSet::new();
    let mut destination_checksums: HashMap<RelPath, String> = HashMap::new();

    for (target, meta) in source.files() {
        if destination.file(target).is_some() {
            continue;
        }
        let Some(candidates) = leftovers.get_mut(&meta.size) else {
            continue;
        };
        if candidates.is_empty() {
            continue;
        }

        let wanted = checksum::compute_file_checksum(&source.native(target))?;
        let mut found = None;
        for (idx, candidate) in candidates.iter().enumerate() {
            let actual = match destination_checksums.get(candidate) {
                Some(actual) => actual.clone(),
                None => {
                    let actual = checksum::compute_file_checksum(&destination.native(candidate))?;
                    destination_checksums.insert(candidate.clone(), actual.clone());
                    actual
                }
            };
            if actual == wanted {
                found = Some(idx);
                break;
            }
        }
        let Some(idx) = found else {
            continue;
        };
        let from = candidates.swap_remove(idx);

        tracing::info!(from = %from, to = %target, "Moving file");
        io::rename(&destination.native(&from), &destination.native(target))?;
        stats.record_moved_file();
        moved.insert(target.clone());
    }

    Ok(moved)
}
