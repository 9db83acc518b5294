//! Periodic execution of synchronization runs
//!
//! The scheduler owns a single tick loop task. Every tick either starts a run
//! on the blocking pool or, if the previous run has not finished, is skipped
//! and logged. At most one run is ever in flight, so the destination tree has
//! a single writer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{Error, Result, SyncRequest, SyncRunner, SyncSummary};

/// Lifecycle state of a [`Scheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

struct ActiveSchedule {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Repeats synchronization runs on a fixed cadence.
///
/// Ticks are anchored to the start time: with a one-minute interval started at
/// 12:00:00, runs are attempted at 12:01:00, 12:02:00, and so on, regardless of
/// how long each run takes.
pub struct Scheduler {
    runner: Arc<dyn SyncRunner>,
    active: Option<ActiveSchedule>,
    skipped: Arc<AtomicU64>,
}

impl Scheduler {
    pub fn new(runner: Arc<dyn SyncRunner>) -> Self {
        Self {
            runner,
            active: None,
            skipped: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.active.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    /// Ticks skipped so far because a run was still in flight.
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Begin running `request` once per `interval`.
    ///
    /// The first run happens one interval after this call. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRunning`] if a schedule is active,
    /// [`Error::ZeroInterval`] for a zero period, and
    /// [`Error::IntervalOutOfRange`] when the tick times cannot be represented.
    pub fn start(&mut self, request: SyncRequest, interval: Duration) -> Result<()> {
        if self.active.is_some() {
            tracing::warn!("Start requested while the scheduler is already running");
            return Err(Error::AlreadyRunning);
        }
        if interval.is_zero() {
            return Err(Error::ZeroInterval);
        }
        // The ticker adds the period to each deadline, so two steps must fit.
        let Some(first_tick) = Instant::now()
            .checked_add(interval)
            .filter(|first| first.checked_add(interval).is_some())
        else {
            return Err(Error::IntervalOutOfRange { period: interval });
        };

        tracing::info!(
            source = %request.source().display(),
            destination = %request.destination().display(),
            interval = ?interval,
            "Starting scheduled synchronization"
        );

        let cancel = CancellationToken::new();
        let task = tokio::spawn(tick_loop(
            Arc::clone(&self.runner),
            Arc::new(request),
            first_tick,
            interval,
            cancel.clone(),
            Arc::clone(&self.skipped),
        ));
        self.active = Some(ActiveSchedule { cancel, task });
        Ok(())
    }

    /// Stop scheduling further runs and wait for an in-flight run to finish.
    ///
    /// Does nothing when the scheduler is idle.
    pub async fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            tracing::debug!("Stop requested while idle");
            return;
        };

        tracing::info!("Stopping scheduled synchronization");
        active.cancel.cancel();
        if let Err(e) = active.task.await {
            tracing::error!(error = %e, "Scheduler task ended abnormally");
        }
        tracing::info!(skipped_ticks = self.skipped_ticks(), "Scheduler stopped");
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state())
            .field("skipped_ticks", &self.skipped_ticks())
            .finish()
    }
}

type RunHandle = JoinHandle<Result<SyncSummary>>;

async fn tick_loop(
    runner: Arc<dyn SyncRunner>,
    request: Arc<SyncRequest>,
    first_tick: Instant,
    interval: Duration,
    cancel: CancellationToken,
    skipped: Arc<AtomicU64>,
) {
    let mut ticker = time::interval_at(first_tick, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: Option<RunHandle> = None;

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            outcome = join_in_flight(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
                report(outcome);
            }

            _ = ticker.tick() => {
                if in_flight.is_some() {
                    let total = skipped.fetch_add(1, Ordering::Relaxed) + 1;
                    tracing::warn!(
                        skipped_ticks = total,
                        "Previous synchronization still running, skipping this tick"
                    );
                    continue;
                }

                tracing::debug!("Tick: starting synchronization run");
                let runner = Arc::clone(&runner);
                let request = Arc::clone(&request);
                in_flight = Some(tokio::task::spawn_blocking(move || runner.run(&request)));
            }
        }
    }

    if let Some(handle) = in_flight {
        tracing::info!("Waiting for the in-flight synchronization to finish");
        report(handle.await);
    }
}

async fn join_in_flight(
    in_flight: &mut Option<RunHandle>,
) -> std::result::Result<Result<SyncSummary>, JoinError> {
    match in_flight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// A failed run is logged and the schedule carries on.
fn report(outcome: std::result::Result<Result<SyncSummary>, JoinError>) {
    match outcome {
        Ok(Ok(_)) => tracing::debug!("Scheduled synchronization finished"),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Scheduled synchronization failed; schedule continues")
        }
        Err(e) => {
            let e = Error::Task {
                message: e.to_string(),
            };
            tracing::error!(error = %e, "Scheduled synchronization failed; schedule continues")
        }
    }
}
