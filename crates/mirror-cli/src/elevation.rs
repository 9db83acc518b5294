//! Administrator privilege checks and elevated relaunch

use std::process::{Command, ExitCode, Stdio};

use crate::error::Result;

/// Platform privilege handling
pub trait Elevation {
    /// True when the current process already has administrator rights.
    fn is_elevated(&self) -> bool;

    /// Run this executable again with `args` and administrator rights, wait
    /// for it, and return its exit code.
    fn restart_elevated(&self, args: &[String]) -> Result<ExitCode>;
}

/// Uses `id -u`/`sudo` on unix and `net session`/`Start-Process -Verb RunAs`
/// on Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemElevation;

impl Elevation for SystemElevation {
    #[cfg(unix)]
    fn is_elevated(&self) -> bool {
        Command::new("id")
            .arg("-u")
            .stderr(Stdio::null())
            .output()
            .map(|out| out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "0")
            .unwrap_or(false)
    }

    #[cfg(windows)]
    fn is_elevated(&self) -> bool {
        Command::new("net")
            .arg("session")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[cfg(not(any(unix, windows)))]
    fn is_elevated(&self) -> bool {
        false
    }

    #[cfg(unix)]
    fn restart_elevated(&self, args: &[String]) -> Result<ExitCode> {
        let exe = std::env::current_exe()?;
        tracing::info!(exe = %exe.display(), "Relaunching through sudo");
        let status = Command::new("sudo").arg(exe).args(args).status()?;
        Ok(exit_code_of(status.code()))
    }

    #[cfg(windows)]
    fn restart_elevated(&self, args: &[String]) -> Result<ExitCode> {
        let exe = std::env::current_exe()?;
        tracing::info!(exe = %exe.display(), "Relaunching with RunAs");
        let script = run_as_script(&exe.to_string_lossy(), args);
        let status = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .status()?;
        Ok(exit_code_of(status.code()))
    }

    #[cfg(not(any(unix, windows)))]
    fn restart_elevated(&self, _args: &[String]) -> Result<ExitCode> {
        Err(crate::error::CliError::user(
            "Administrator relaunch is not supported on this platform",
        ))
    }
}

/// Exit code to report for a child that exited with `code`. A child killed by
/// a signal has no code and counts as a failed run.
fn exit_code_of(code: Option<i32>) -> ExitCode {
    match code.and_then(|c| u8::try_from(c).ok()) {
        Some(code) => ExitCode::from(code),
        None => ExitCode::from(2),
    }
}

/// PowerShell single-quoted literal.
#[cfg_attr(not(windows), allow(dead_code))]
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// PowerShell command that relaunches `exe` elevated, waits, and exits with
/// the child's code.
#[cfg_attr(not(windows), allow(dead_code))]
fn run_as_script(exe: &str, args: &[String]) -> String {
    let mut script = format!(
        "$p = Start-Process -FilePath {} -Verb RunAs -Wait -PassThru",
        ps_quote(exe)
    );
    if !args.is_empty() {
        let quoted: Vec<String> = args
            .iter()
            .map(|arg| ps_quote(&format!("\"{}\"", arg.replace('"', "\\\""))))
            .collect();
        script.push_str(" -ArgumentList ");
        script.push_str(&quoted.join(","));
    }
    script.push_str("; exit $p.ExitCode");
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(ps_quote("C:\\it's here"), "'C:\\it''s here'");
    }

    #[test]
    fn script_without_arguments() {
        assert_eq!(
            run_as_script("C:\\bin\\dirmirror.exe", &[]),
            "$p = Start-Process -FilePath 'C:\\bin\\dirmirror.exe' -Verb RunAs -Wait -PassThru; exit $p.ExitCode"
        );
    }

    #[test]
    fn script_passes_each_argument_quoted() {
        let args = vec![
            "--source".to_string(),
            "C:\\My Docs".to_string(),
            "--admin".to_string(),
        ];
        let script = run_as_script("dirmirror.exe", &args);
        assert!(
            script.contains(r#"-ArgumentList '"--source"','"C:\My Docs"','"--admin"'"#),
            "got: {}",
            script
        );
        assert!(script.ends_with("; exit $p.ExitCode"));
    }

    #[test]
    fn signal_death_counts_as_failure() {
        assert_eq!(exit_code_of(None), ExitCode::from(2));
        assert_eq!(exit_code_of(Some(0)), ExitCode::SUCCESS);
        assert_eq!(exit_code_of(Some(1)), ExitCode::from(1));
    }
}
