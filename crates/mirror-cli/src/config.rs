//! Validated run configuration
//!
//! Parsed flags become a [`SyncConfig`] through a single validation path,
//! whether they were typed on the command line or synthesized from
//! interactive answers.

use std::path::PathBuf;

use mirror_core::{Schedule, SyncRequest, parse_interval};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Where the log file should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Generated name in the default log folder
    Default,
    /// Generated name in this folder
    Directory(PathBuf),
    /// Exactly this file
    File(PathBuf),
}

impl LogTarget {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(str::trim) {
            None | Some("") => Self::Default,
            Some(path) if path.ends_with('/') || path.ends_with('\\') => {
                Self::Directory(PathBuf::from(path))
            }
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }
}

/// Everything a run needs, validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub request: SyncRequest,
    pub schedule: Schedule,
    pub log_target: LogTarget,
    pub admin: bool,
    pub verbose: bool,
    pub json: bool,
}

impl SyncConfig {
    /// Validate parsed flags.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingArgument`] when source or destination is
    /// absent or empty, and an interval error when `--interval` matches
    /// neither grammar.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let source = cli
            .source
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(CliError::MissingArgument { flag: "--source" })?;
        let destination = cli
            .destination
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(CliError::MissingArgument {
                flag: "--destination",
            })?;

        let schedule =
            parse_interval(cli.interval.as_deref()).map_err(mirror_core::Error::from)?;

        Ok(Self {
            request: SyncRequest::new(source, destination)?,
            schedule,
            log_target: LogTarget::from_arg(cli.log_file.as_deref()),
            admin: cli.admin,
            verbose: cli.verbose,
            json: cli.json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;
    use std::time::Duration;

    fn config(args: &[&str]) -> Result<SyncConfig> {
        let cli = Cli::try_parse_from(std::iter::once("dirmirror").chain(args.iter().copied()))?;
        SyncConfig::from_cli(cli)
    }

    #[test]
    fn minimal_flags_mean_single_run() {
        let config = config(&["-s", "src", "-d", "dst"]).unwrap();

        assert_eq!(config.request, SyncRequest::new("src", "dst").unwrap());
        assert_eq!(config.schedule, Schedule::Once);
        assert_eq!(config.log_target, LogTarget::Default);
        assert!(!config.admin);
    }

    #[test]
    fn interval_becomes_schedule() {
        let config = config(&["-s", "src", "-d", "dst", "-i", "90s"]).unwrap();
        assert_eq!(config.schedule, Schedule::Every(Duration::from_secs(90)));
    }

    #[rstest]
    #[case(&["-d", "dst"], "--source")]
    #[case(&["-s", "src"], "--destination")]
    #[case(&[], "--source")]
    fn missing_paths_are_reported(#[case] args: &[&str], #[case] flag: &str) {
        match config(args) {
            Err(CliError::MissingArgument { flag: missing }) => assert_eq!(missing, flag),
            other => panic!("expected missing {}, got {:?}", flag, other),
        }
    }

    #[test]
    fn malformed_interval_fails_validation() {
        let err = config(&["-s", "src", "-d", "dst", "-i", "often"]).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("often"), "got: {}", err);
    }

    #[rstest]
    #[case(None, LogTarget::Default)]
    #[case(Some(""), LogTarget::Default)]
    #[case(Some("logs/"), LogTarget::Directory(PathBuf::from("logs/")))]
    #[case(Some("C:\\logs\\"), LogTarget::Directory(PathBuf::from("C:\\logs\\")))]
    #[case(Some("logs/run.log"), LogTarget::File(PathBuf::from("logs/run.log")))]
    fn log_target_from_arg(#[case] arg: Option<&str>, #[case] expected: LogTarget) {
        assert_eq!(LogTarget::from_arg(arg), expected);
    }
}
