use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the job table file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file exists but does not hold a job table we can read.
    #[error("job table {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Writing the table failed; the previously saved file is unchanged.
    #[error("failed to save job table to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn persistence<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        StoreError::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
