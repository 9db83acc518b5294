//! Log file naming and tracing setup
//!
//! Generated log names follow `sync_<sourceLeaf>_to_<destLeaf>_<yyyyMMdd_HHmmss>.log`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogTarget;
use crate::error::{CliError, Result};

/// Folder under the platform data directory that holds default logs
const APP_DIR: &str = "dirmirror";

/// Default folder for generated log files.
///
/// Falls back to `./logs` when the platform has no data directory.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Generated log file in the default log folder.
pub fn default_log_path(source: &Path, destination: &Path, now: DateTime<Local>) -> PathBuf {
    default_log_dir().join(log_file_name(source, destination, now))
}

/// Generated log file name for a source/destination pair.
pub fn log_file_name(source: &Path, destination: &Path, now: DateTime<Local>) -> String {
    format!(
        "sync_{}_to_{}_{}.log",
        leaf_name(source),
        leaf_name(destination),
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Decide which file to log to.
pub fn resolve_log_path(
    target: &LogTarget,
    source: &Path,
    destination: &Path,
    now: DateTime<Local>,
) -> PathBuf {
    match target {
        LogTarget::Default => default_log_path(source, destination, now),
        LogTarget::Directory(dir) => dir.join(log_file_name(source, destination, now)),
        LogTarget::File(path) => path.clone(),
    }
}

/// Last path component, or a sanitized form of the whole path when there is
/// none (filesystem roots, `.`).
fn leaf_name(path: &Path) -> String {
    if let Some(name) = path.file_name().and_then(|n| n.to_str())
        && !name.is_empty()
    {
        return name.to_string();
    }

    let sanitized: String = path
        .to_string_lossy()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let sanitized = sanitized.trim_matches('_');
    if sanitized.is_empty() {
        "root".to_string()
    } else {
        sanitized.to_string()
    }
}

/// Install the global subscriber: console output on stderr plus the log file.
///
/// Creates the log file's folder if needed. `RUST_LOG` overrides the level;
/// otherwise it is `info`, or `debug` when verbose.
pub fn set_active_log_path(path: &Path, verbose: bool) -> Result<()> {
    if path.is_dir() {
        return Err(CliError::user(format!(
            "Log file {} is a folder; end the path with a separator to log into it",
            path.display()
        )));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()
        .map_err(|e| CliError::Logging {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap()
    }

    #[test]
    fn generated_name_uses_leaves_and_timestamp() {
        let name = log_file_name(
            Path::new("/home/me/Documents"),
            Path::new("/mnt/backup/docs/"),
            fixed_time(),
        );
        assert_eq!(name, "sync_Documents_to_docs_20240309_070502.log");
    }

    #[rstest]
    #[case("/", "root")]
    #[case(".", "root")]
    #[case("photos", "photos")]
    #[case("a/b/c", "c")]
    fn leaf_names(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(leaf_name(Path::new(path)), expected);
    }

    #[test]
    fn directory_target_gets_generated_name() {
        let path = resolve_log_path(
            &LogTarget::Directory(PathBuf::from("logs/")),
            Path::new("src"),
            Path::new("dst"),
            fixed_time(),
        );
        assert_eq!(path, Path::new("logs").join("sync_src_to_dst_20240309_070502.log"));
    }

    #[test]
    fn file_target_is_used_verbatim() {
        let path = resolve_log_path(
            &LogTarget::File(PathBuf::from("custom/run.log")),
            Path::new("src"),
            Path::new("dst"),
            fixed_time(),
        );
        assert_eq!(path, PathBuf::from("custom/run.log"));
    }

    #[test]
    fn default_target_lives_in_default_dir() {
        let path = resolve_log_path(
            &LogTarget::Default,
            Path::new("src"),
            Path::new("dst"),
            fixed_time(),
        );
        assert_eq!(path.parent().unwrap(), default_log_dir());
        assert_eq!(
            path.file_name().unwrap(),
            "sync_src_to_dst_20240309_070502.log"
        );
    }
}
