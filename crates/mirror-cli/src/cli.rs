//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// dirmirror - Mirror a source folder onto a destination, once or on a schedule
///
/// Run without arguments for guided setup.
///
/// Examples:
///   dirmirror -s ~/docs -d /mnt/backup/docs          # Mirror once
///   dirmirror -s ~/docs -d /mnt/backup/docs -i 15m   # Mirror every 15 minutes
///   dirmirror -s ~/docs -d /mnt/backup/docs -l logs/ # Log into logs/sync_docs_to_docs_<time>.log
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "dirmirror")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Folder to mirror from
    #[arg(short, long, value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Folder to mirror onto
    #[arg(short, long, value_name = "PATH")]
    pub destination: Option<PathBuf>,

    /// Repeat the mirror every INTERVAL (30s, 15m, 2h, 1d, 1y; a bare number means minutes)
    #[arg(short, long, value_name = "INTERVAL")]
    pub interval: Option<String>,

    /// Relaunch with administrator privileges before syncing
    #[arg(long)]
    pub admin: bool,

    /// Log file; a path ending in a separator names a folder for a generated file
    #[arg(short, long, value_name = "PATH")]
    pub log_file: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the summary of a single run as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dirmirror").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn long_flags() {
        let cli = parse(&[
            "--source",
            "a",
            "--destination",
            "b",
            "--interval",
            "5m",
            "--log-file",
            "logs/",
            "--admin",
        ]);
        assert_eq!(cli.source, Some(PathBuf::from("a")));
        assert_eq!(cli.destination, Some(PathBuf::from("b")));
        assert_eq!(cli.interval.as_deref(), Some("5m"));
        assert_eq!(cli.log_file.as_deref(), Some("logs/"));
        assert!(cli.admin);
    }

    #[test]
    fn short_flags() {
        let cli = parse(&["-s", "a", "-d", "b", "-i", "1h", "-l", "out.log", "-v"]);
        assert_eq!(cli.source, Some(PathBuf::from("a")));
        assert_eq!(cli.destination, Some(PathBuf::from("b")));
        assert_eq!(cli.interval.as_deref(), Some("1h"));
        assert_eq!(cli.log_file.as_deref(), Some("out.log"));
        assert!(cli.verbose);
        assert!(!cli.admin);
    }

    #[test]
    fn paths_are_optional_at_parse_time() {
        let cli = parse(&["--source", "only"]);
        assert!(cli.destination.is_none());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let result = Cli::try_parse_from(["dirmirror", "--frobnicate"]);
        assert!(result.is_err());
    }
}
