//! Error types for mirror-cli

use std::process::ExitCode;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mirror-core
    #[error(transparent)]
    Core(#[from] mirror_core::Error),

    /// A required flag was not supplied
    #[error("Missing required argument {flag}")]
    MissingArgument { flag: &'static str },

    /// Flags could not be parsed
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Log file or subscriber could not be set up
    #[error("Logging setup failed: {message}")]
    Logging { message: String },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// True for problems with what the user asked for, as opposed to failures
    /// while carrying it out.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. }
                | Self::Usage(_)
                | Self::Core(mirror_core::Error::Interval(_))
                | Self::Core(mirror_core::Error::EmptyPath { .. })
        )
    }

    /// Process exit code: `1` for configuration errors, `2` otherwise.
    pub fn exit_code(&self) -> ExitCode {
        if self.is_configuration() {
            ExitCode::from(1)
        } else {
            ExitCode::from(2)
        }
    }
}
