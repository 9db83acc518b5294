//! Sequencing of the folder and file passes into one run

use tokio_util::sync::CancellationToken;

use crate::pass::{FilePass, FolderPass, SyncPass};
use crate::{Error, Result, SyncRequest, SyncStatistics, SyncSummary};

/// Something that performs one complete synchronization run.
///
/// Implemented by [`Orchestrator`]; the scheduler depends only on this trait so
/// it can be driven by test doubles.
pub trait SyncRunner: Send + Sync {
    fn run(&self, request: &SyncRequest) -> Result<SyncSummary>;
}

/// Runs the folder pass to completion, then the file pass.
///
/// Each run starts from fresh statistics; the orchestrator keeps no state
/// between calls. A failing pass ends the run at once and its error is
/// returned as is.
pub struct Orchestrator {
    folders: Box<dyn SyncPass>,
    files: Box<dyn SyncPass>,
}

impl Orchestrator {
    /// Create an orchestrator over the given passes
    ///
    /// # Arguments
    ///
    /// * `folders` - Pass that reconciles the folder layout; always runs first
    /// * `files` - Pass that reconciles file contents
    pub fn new(folders: Box<dyn SyncPass>, files: Box<dyn SyncPass>) -> Self {
        Self { folders, files }
    }

    /// Orchestrator over the built-in [`FolderPass`] and [`FilePass`].
    pub fn mirror() -> Self {
        Self::new(Box::new(FolderPass::new()), Box::new(FilePass::new()))
    }

    /// Perform one run to completion.
    pub fn run(&self, request: &SyncRequest) -> Result<SyncSummary> {
        self.run_until(request, &CancellationToken::new())
    }

    /// Perform one run, checking `cancel` before each pass starts.
    ///
    /// A pass already in progress is not interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] naming the pass that was not started, or
    /// the first pass error unchanged.
    pub fn run_until(&self, request: &SyncRequest, cancel: &CancellationToken) -> Result<SyncSummary> {
        tracing::info!(
            source = %request.source().display(),
            destination = %request.destination().display(),
            "Starting synchronization"
        );

        let mut stats = SyncStatistics::new();
        for pass in [&self.folders, &self.files] {
            if cancel.is_cancelled() {
                tracing::warn!(pass = pass.name(), "Synchronization cancelled");
                return Err(Error::Cancelled { phase: pass.name() });
            }
            tracing::debug!(pass = pass.name(), "Running pass");
            stats.absorb(pass.run(request)?);
        }

        let summary = stats.summary();
        tracing::info!(
            changed_files = summary.changed_files,
            changed_folders = summary.changed_folders,
            files_moved_individually = summary.files_moved_individually,
            folders_moved = summary.folders_moved,
            files_in_moved_folders = summary.files_in_moved_folders,
            deleted_files = summary.deleted_files,
            deleted_folders = summary.deleted_folders,
            "Synchronization complete"
        );
        Ok(summary)
    }
}

impl SyncRunner for Orchestrator {
    fn run(&self, request: &SyncRequest) -> Result<SyncSummary> {
        Orchestrator::run(self, request)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("folders", &self.folders.name())
            .field("files", &self.files.name())
            .finish()
    }
}
