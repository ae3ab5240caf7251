//! CLI error types.

use std::fmt;

use incident_alerts::AlertError;

/// Exit status for every failure.
pub const EXIT_FAILURE: u8 = 2;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Invalid configuration.
    Config(String),
    /// Building or delivering the alert failed.
    Alert(AlertError),
    /// Output formatting error.
    Format(String),
    /// IO error.
    Io(std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Alert(e) => write!(f, "{e}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Alert(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AlertError> for CliError {
    fn from(err: AlertError) -> Self {
        match err {
            AlertError::InvalidConfig { reason } => Self::Config(reason),
            other => Self::Alert(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
