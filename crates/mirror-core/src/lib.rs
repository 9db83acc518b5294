//! Synchronization orchestration and scheduling for dirmirror
//!
//! This crate sequences the two passes of a one-way mirror and runs them on a
//! schedule:
//!
//! - **Interval grammar**: `<n>[smhdy]` or bare minutes, parsed into a [`Schedule`]
//! - **Statistics**: seven counters filled in by the passes, reported as a [`SyncSummary`]
//! - **Passes**: [`FolderPass`] reconciles the folder layout, [`FilePass`] the file contents
//! - **Orchestrator**: runs the folder pass to completion, then the file pass
//! - **Scheduler**: repeats runs on a fixed cadence, never two at once
//!
//! # Architecture
//!
//! ```text
//!              dirmirror (CLI)
//!                    |
//!               Scheduler
//!                    |
//!              Orchestrator
//!               /        \
//!         FolderPass   FilePass
//!               \        /
//!               mirror-fs
//! ```

pub mod error;
pub mod interval;
pub mod orchestrator;
pub mod pass;
pub mod request;
pub mod scheduler;
pub mod stats;

pub use error::{Error, Result};
pub use interval::{IntervalError, Schedule, parse_interval};
pub use orchestrator::{Orchestrator, SyncRunner};
pub use pass::{FilePass, FolderPass, SyncPass};
pub use request::SyncRequest;
pub use scheduler::{Scheduler, SchedulerState};
pub use stats::{SyncStatistics, SyncSummary};

pub use tokio_util::sync::CancellationToken;
