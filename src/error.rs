//! Error types for the azureappscan application.
//!
//! Uses `thiserror` for library-style errors with automatic `Display` and `Error` implementations.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures inside a single token endpoint probe.
///
/// These never leave the probe client as errors; they are flattened into a
/// transport failure result for the candidate being probed.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Response is not valid JSON (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e)
        } else {
            Self::Request(e)
        }
    }
}

/// Identifier source errors. Fatal to the run.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Unable to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited data in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No valid application ID data found in {}", .path.display())]
    Empty { path: PathBuf },
}

/// Result file errors. Reported as warnings only.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Returns a user-friendly message for console output.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Input(InputError::Unreadable { .. }) => "Unable to read the input file.",
            Self::Input(InputError::Malformed { .. }) => {
                "The input file could not be parsed as CSV/TSV."
            }
            Self::Input(InputError::Empty { .. }) => "No valid application ID data found.",
            Self::Output(_) => "Unable to save results.",
            Self::Config(_) => "Configuration error. Please check environment overrides.",
        }
    }

    /// Returns true if this error must abort the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Output(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = AppError::Input(InputError::Empty {
            path: PathBuf::from("apps.txt"),
        });
        assert_eq!(err.user_message(), "No valid application ID data found.");

        let err = AppError::Config("bad".into());
        assert_eq!(
            err.user_message(),
            "Configuration error. Please check environment overrides."
        );
    }

    #[test]
    fn test_is_fatal() {
        let err = AppError::Input(InputError::Unreadable {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        assert!(err.is_fatal());

        let err = AppError::Output(OutputError::Write {
            path: PathBuf::from("/readonly/out.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_empty_input_display_names_path() {
        let err = InputError::Empty {
            path: PathBuf::from("apps.csv"),
        };
        assert!(err.to_string().contains("apps.csv"));
    }
}
