//! Error types for the rpyview environment abstraction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the outside world.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The data file could not be opened or read
    #[error("cannot read {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file was read but is not valid UTF-8 text
    #[error("{} is not valid UTF-8: {source}", .path.display())]
    InvalidEncoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl EnvError {
    /// Creates a file access error.
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid encoding error.
    pub fn invalid_encoding(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        Self::InvalidEncoding {
            path: path.into(),
            source,
        }
    }
}
