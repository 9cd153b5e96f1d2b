/*!
 * Error types for the restrans application.
 *
 * Provider errors never leave a provider: they are logged and collapsed into
 * "no result". Job errors are the failures discovered before any work unit
 * runs and are reported once to the caller.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Endpoint, credentials or model were not configured
    #[error("Provider settings incomplete: {0}")]
    MissingSettings(String),

    /// The request did not finish within the fixed timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Non-2xx status returned by the API
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Body returned with the status
        message: String,
    },

    /// The response body was not what the wire format promises
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Cancellation was observed at a poll point around the call
    #[error("Translation cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(crate::providers::REQUEST_TIMEOUT_SECS)
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else if let Some(status) = error.status() {
            Self::ApiError {
                status_code: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            Self::ConnectionError(error.to_string())
        }
    }
}

/// Failures that stop a job before any work unit executes
#[derive(Error, Debug)]
pub enum JobError {
    /// Missing endpoint, credentials or another required setting
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source document unreadable or not valid markup
    #[error("Could not parse {path:?}: {reason}")]
    Parse {
        /// File that failed to load
        path: PathBuf,
        /// Parser or IO message
        reason: String,
    },

    /// Writing the translated output failed
    #[error("File error: {0}")]
    Io(String),

    /// A directory scan found nothing to translate
    #[error("No files matching {pattern} found in {directory:?}")]
    NoMatchingFiles {
        /// Scanned root
        directory: PathBuf,
        /// Filename pattern used for the scan
        pattern: String,
    },
}

impl JobError {
    pub fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
