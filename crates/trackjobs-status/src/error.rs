//! Error types for the status reconciler.

use std::path::PathBuf;

use thiserror::Error;
use trackjobs_store::StoreError;

#[derive(Debug, Error)]
pub enum StatusError {
    /// No usable queue-query command file and no built-in default to fall back on.
    #[error("no status query command configured: {} is missing or empty", path.display())]
    MissingConfig { path: PathBuf },

    /// The query command could not be started or exited unsuccessfully.
    #[error("status query command `{command}` failed: {reason}")]
    CommandExecution { command: String, reason: String },

    /// Reading or writing the command file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, StatusError>;
