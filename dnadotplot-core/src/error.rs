//! Error taxonomy shared by every stage of a comparison.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a dot plot
#[derive(Debug, Error)]
pub enum DotPlotError {
    #[error("malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("window length {window} exceeds length {length} of {sequence}")]
    WindowTooLarge {
        window: usize,
        length: usize,
        sequence: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("cannot write output {}: {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DotPlotError {
    pub fn malformed<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn output<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::OutputWriteFailure {
            path: path.into(),
            source,
        }
    }
}

/// Result type for dot plot operations
pub type Result<T> = std::result::Result<T, DotPlotError>;
