//! Log writer error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by log sinks and the archiving writer.
#[derive(Debug, Error)]
pub enum LogError {
    /// The base directory does not exist or is not a directory.
    #[error("Must provide an existing log directory: {}", path.display())]
    MissingDirectory {
        /// The directory that was given.
        path: PathBuf,
    },

    /// Size rotation needs a non-empty base name.
    #[error("Must provide the prefix when rotating by size")]
    MissingPrefix,

    /// The date mask has a specifier `strftime` does not know.
    #[error("Invalid date mask: {mask}")]
    InvalidDateMask {
        /// The mask that was given.
        mask: String,
    },

    /// Reading, writing or renaming a log file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The log file could not be reopened after rotation.
    #[error("\"{}\" cannot be opened for appending: {source}", path.display())]
    Reopen {
        /// The active log path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl LogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<LogError> for io::Error {
    fn from(err: LogError) -> Self {
        match err {
            LogError::Io { source, .. } | LogError::Reopen { source, .. } => source,
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}
