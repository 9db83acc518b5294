//! Change counters for a single synchronization run

use std::fmt;

use serde::Serialize;

/// Counters filled in by the sync passes.
///
/// Each pass returns its own `SyncStatistics`; the orchestrator folds them into
/// one fresh value per run with [`SyncStatistics::absorb`]. Nothing here derives
/// new figures from the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStatistics {
    changed_files: u64,
    changed_folders: u64,
    files_moved_individually: u64,
    folders_moved: u64,
    files_in_moved_folders: u64,
    deleted_files: u64,
    deleted_folders: u64,
}

impl SyncStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A file was created or its content replaced.
    pub fn record_changed_file(&mut self) {
        self.changed_files += 1;
    }

    /// A folder was created.
    pub fn record_changed_folder(&mut self) {
        self.changed_folders += 1;
    }

    /// A single file was renamed into place instead of copied.
    pub fn record_moved_file(&mut self) {
        self.files_moved_individually += 1;
    }

    /// A folder was renamed into place, carrying `files_inside` files with it.
    pub fn record_moved_folder(&mut self, files_inside: u64) {
        self.folders_moved += 1;
        self.files_in_moved_folders += files_inside;
    }

    pub fn record_deleted_file(&mut self) {
        self.deleted_files += 1;
    }

    /// A folder tree was removed, `count` folders in all.
    pub fn record_deleted_folders(&mut self, count: u64) {
        self.deleted_folders += count;
    }

    /// Add another pass's counters into this one.
    pub fn absorb(&mut self, other: SyncStatistics) {
        self.changed_files += other.changed_files;
        self.changed_folders += other.changed_folders;
        self.files_moved_individually += other.files_moved_individually;
        self.folders_moved += other.folders_moved;
        self.files_in_moved_folders += other.files_in_moved_folders;
        self.deleted_files += other.deleted_files;
        self.deleted_folders += other.deleted_folders;
    }

    /// Read-only view of the current counter values.
    pub fn summary(&self) -> SyncSummary {
        SyncSummary {
            changed_files: self.changed_files,
            changed_folders: self.changed_folders,
            files_moved_individually: self.files_moved_individually,
            folders_moved: self.folders_moved,
            files_in_moved_folders: self.files_in_moved_folders,
            deleted_files: self.deleted_files,
            deleted_folders: self.deleted_folders,
        }
    }
}

/// Final counter values of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub changed_files: u64,
    pub changed_folders: u64,
    pub files_moved_individually: u64,
    pub folders_moved: u64,
    pub files_in_moved_folders: u64,
    pub deleted_files: u64,
    pub deleted_folders: u64,
}

impl SyncSummary {
    /// Label and value of every counter, in report order.
    pub fn items(&self) -> [(&'static str, u64); 7] {
        [
            ("Changed files", self.changed_files),
            ("Changed folders", self.changed_folders),
            ("Files moved individually", self.files_moved_individually),
            ("Folders moved", self.folders_moved),
            ("Files in moved folders", self.files_in_moved_folders),
            ("Deleted files", self.deleted_files),
            ("Deleted folders", self.deleted_folders),
        ]
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (label, value)) in self.items().iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<26}{}", format!("{label}:"), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_statistics_are_zero() {
        assert_eq!(SyncStatistics::new().summary(), SyncSummary::default());
    }

    #[test]
    fn moved_folder_counts_its_files() {
        let mut stats = SyncStatistics::new();
        stats.record_moved_folder(4);
        stats.record_moved_folder(0);

        let summary = stats.summary();
        assert_eq!(summary.folders_moved, 2);
        assert_eq!(summary.files_in_moved_folders, 4);
    }

    #[test]
    fn deleted_folder_trees_count_every_folder() {
        let mut stats = SyncStatistics::new();
        stats.record_deleted_folders(3);
        stats.record_deleted_folders(1);

        assert_eq!(stats.summary().deleted_folders, 4);
    }

    #[test]
    fn absorb_adds_every_counter() {
        let mut folders = SyncStatistics::new();
        folders.record_changed_folder();
        folders.record_moved_folder(3);
        folders.record_deleted_folders(1);

        let mut files = SyncStatistics::new();
        files.record_changed_file();
        files.record_changed_file();
        files.record_moved_file();
        files.record_deleted_file();

        let mut run = SyncStatistics::new();
        run.absorb(folders);
        run.absorb(files);

        assert_eq!(
            run.summary(),
            SyncSummary {
                changed_files: 2,
                changed_folders: 1,
                files_moved_individually: 1,
                folders_moved: 1,
                files_in_moved_folders: 3,
                deleted_files: 1,
                deleted_folders: 1,
            }
        );
    }

    #[test]
    fn display_lists_every_counter() {
        let summary = SyncSummary {
            changed_files: 7,
            deleted_folders: 2,
            ..SyncSummary::default()
        };

        let text = summary.to_string();

        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("Changed files:"), "got: {}", text);
        assert!(text.lines().next().unwrap().ends_with('7'));
        assert!(text.lines().last().unwrap().ends_with('2'));
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = SyncSummary {
            files_moved_individually: 1,
            ..SyncSummary::default()
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["filesMovedIndividually"], 1);
        assert_eq!(json["changedFolders"], 0);
    }
}
