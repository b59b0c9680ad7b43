//! CLI error types.

use std::fmt;

use recfetch::{DownloadError, TransportError};

/// Errors that can occur while running the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Failed to build the HTTP transport.
    Transport(TransportError),

    /// The download itself failed after all attempts.
    Download(DownloadError),

    /// Failed to write the recording to disk.
    Write(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Transport(e) => {
                write!(f, "Failed to create HTTP client: {}", e)
            }
            CliError::Download(e) => {
                write!(f, "Download failed: {}", e)
            }
            CliError::Write(e) => {
                write!(f, "Failed to write output file: {}", e)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Transport(e) => Some(e),
            CliError::Download(e) => Some(e),
            CliError::Write(e) => Some(e),
        }
    }
}

impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        CliError::Transport(e)
    }
}

impl From<DownloadError> for CliError {
    fn from(e: DownloadError) -> Self {
        CliError::Download(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Write(e)
    }
}
