//! Dispatch from raw arguments to a single run or a schedule
//!
//! Order of work: resolve arguments (prompting when there are none), validate,
//! relaunch elevated if asked to, set up logging, then run.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use tokio::signal;

use mirror_core::{CancellationToken, Orchestrator, Schedule, Scheduler, SyncSummary};

use crate::cli::Cli;
use crate::config::SyncConfig;
use crate::elevation::Elevation;
use crate::error::{CliError, Result};
use crate::interactive::{Prompter, resolve_arguments};
use crate::logging::{resolve_log_path, set_active_log_path};

/// Arguments ready to run, along with their validated configuration
#[derive(Debug)]
pub struct Prepared {
    pub args: Vec<String>,
    pub config: SyncConfig,
}

/// Resolve and validate arguments.
///
/// Returns `None` when clap handled the invocation itself (`--help`,
/// `--version`) and there is nothing left to do.
pub fn prepare(raw: Vec<String>, prompter: &mut dyn Prompter) -> Result<Option<Prepared>> {
    let args = resolve_arguments(raw, prompter)?;

    let argv = std::iter::once("dirmirror".to_string()).chain(args.iter().cloned());
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let config = SyncConfig::from_cli(cli)?;
    Ok(Some(Prepared { args, config }))
}

/// Relaunch elevated when `--admin` was given and the process lacks rights.
///
/// Returns the elevated child's exit code, or `None` to continue in this
/// process.
pub fn elevate_if_requested(
    config: &SyncConfig,
    args: &[String],
    elevation: &dyn Elevation,
) -> Result<Option<ExitCode>> {
    if !config.admin {
        return Ok(None);
    }
    if elevation.is_elevated() {
        tracing::debug!("Already running with administrator privileges");
        return Ok(None);
    }
    elevation.restart_elevated(args).map(Some)
}

/// Run the whole program for `raw` arguments (without the program name).
pub async fn run(
    raw: Vec<String>,
    prompter: &mut dyn Prompter,
    elevation: &dyn Elevation,
) -> Result<ExitCode> {
    let Some(Prepared { args, config }) = prepare(raw, prompter)? else {
        return Ok(ExitCode::SUCCESS);
    };

    if let Some(code) = elevate_if_requested(&config, &args, elevation)? {
        return Ok(code);
    }

    let log_path = resolve_log_path(
        &config.log_target,
        config.request.source(),
        config.request.destination(),
        Local::now(),
    );
    set_active_log_path(&log_path, config.verbose)?;
    tracing::info!(log_file = %log_path.display(), "Logging to file");

    let signals = ShutdownSignals::install()?;
    let shutdown = CancellationToken::new();
    let forwarder = tokio::spawn(forward_shutdown(signals, shutdown.clone()));

    let result = match config.schedule {
        Schedule::Once => run_once(&config, &shutdown).await,
        Schedule::Every(interval) => run_scheduled(&config, interval, &shutdown).await,
    };

    forwarder.abort();
    result
}

async fn run_once(config: &SyncConfig, shutdown: &CancellationToken) -> Result<ExitCode> {
    if !config.json {
        println!(
            "{} Mirroring {} -> {}",
            "=>".blue().bold(),
            config.request.source().display().to_string().cyan(),
            config.request.destination().display().to_string().cyan()
        );
    }

    let request = config.request.clone();
    let cancel = shutdown.clone();
    let summary = tokio::task::spawn_blocking(move || {
        Orchestrator::mirror().run_until(&request, &cancel)
    })
    .await
    .map_err(|e| mirror_core::Error::Task {
        message: e.to_string(),
    })??;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_scheduled(
    config: &SyncConfig,
    interval: Duration,
    shutdown: &CancellationToken,
) -> Result<ExitCode> {
    let mut scheduler = Scheduler::new(Arc::new(Orchestrator::mirror()));
    scheduler.start(config.request.clone(), interval)?;

    println!(
        "{} Mirroring {} -> {} every {}; press Ctrl+C to stop",
        "=>".blue().bold(),
        config.request.source().display().to_string().cyan(),
        config.request.destination().display().to_string().cyan(),
        humanize(interval)
    );

    shutdown.cancelled().await;
    scheduler.stop().await;

    println!("{} Schedule stopped", "OK".green().bold());
    Ok(ExitCode::SUCCESS)
}

fn print_summary(summary: &SyncSummary) {
    println!("{} Synchronization complete", "OK".green().bold());
    for (label, value) in summary.items() {
        let value = if value > 0 {
            value.to_string().bold()
        } else {
            value.to_string().dimmed()
        };
        println!("   {:<26}{}", format!("{label}:"), value);
    }
}

/// Largest whole unit that divides `interval`, for display.
fn humanize(interval: Duration) -> String {
    const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];
    let secs = interval.as_secs();
    for (size, suffix) in UNITS {
        if secs >= size && secs % size == 0 {
            return format!("{}{}", secs / size, suffix);
        }
    }
    format!("{:?}", interval)
}

/// Cancel `token` once the process is asked to terminate.
async fn forward_shutdown(signals: ShutdownSignals, token: CancellationToken) {
    signals.recv().await;
    tracing::info!("Shutdown signal received");
    token.cancel();
}

/// Interrupt listeners, registered up front so a signal that arrives before
/// anyone waits on them is still delivered.
#[cfg(unix)]
struct ShutdownSignals {
    sigint: signal::unix::Signal,
    sigterm: signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        use signal::unix::{SignalKind, signal};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(mut self) {
        tokio::select! {
            _ = self.sigint.recv() => tracing::debug!("Received SIGINT"),
            _ = self.sigterm.recv() => tracing::debug!("Received SIGTERM"),
        }
    }
}

#[cfg(windows)]
struct ShutdownSignals {
    ctrl_c: signal::windows::CtrlC,
}

#[cfg(windows)]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        Ok(Self {
            ctrl_c: signal::windows::ctrl_c()?,
        })
    }

    async fn recv(mut self) {
        self.ctrl_c.recv().await;
        tracing::debug!("Received Ctrl+C");
    }
}
