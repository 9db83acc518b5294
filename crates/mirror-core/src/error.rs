//! Error types for mirror-core

use crate::interval::IntervalError;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required path was given as an empty string
    #[error("{role} path must not be empty")]
    EmptyPath { role: &'static str },

    /// Interval text did not match either grammar
    #[error(transparent)]
    Interval(#[from] IntervalError),

    /// A schedule was started with a zero period
    #[error("Schedule interval must be greater than zero")]
    ZeroInterval,

    /// A schedule period too long to place on the clock
    #[error("Schedule interval {period:?} is too long to schedule")]
    IntervalOutOfRange { period: std::time::Duration },

    /// `Scheduler::start` called while a schedule is active
    #[error("Scheduler is already running")]
    AlreadyRunning,

    /// The run was cancelled at a phase boundary
    #[error("Synchronization cancelled before the {phase} pass")]
    Cancelled { phase: &'static str },

    /// A pass failed for a reason other than I/O
    #[error("{pass} pass failed: {message}")]
    Pass { pass: &'static str, message: String },

    /// A background run panicked or was aborted
    #[error("Background synchronization task failed: {message}")]
    Task { message: String },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}

impl Error {
    /// Create a pass failure with the given message
    pub fn pass(pass: &'static str, message: impl Into<String>) -> Self {
        Self::Pass {
            pass,
            message: message.into(),
        }
    }
}
