//! dirmirror CLI
//!
//! One-way folder mirroring, once or on a schedule.

mod cli;
mod config;
mod driver;
mod elevation;
mod error;
mod interactive;
mod logging;

use std::process::ExitCode;

use colored::Colorize;

use elevation::SystemElevation;
use error::CliError;
use interactive::TerminalPrompter;

#[tokio::main]
async fn main() -> ExitCode {
    let raw: Vec<String> = std::env::args().skip(1).collect();

    match driver::run(raw, &mut TerminalPrompter, &SystemElevation).await {
        Ok(code) => code,
        Err(e) => {
            report(&e);
            e.exit_code()
        }
    }
}

fn report(error: &CliError) {
    match error {
        // clap renders its own usage block
        CliError::Usage(e) => {
            let _ = e.print();
        }
        _ => eprintln!("{}: {}", "error".red().bold(), error),
    }
}
