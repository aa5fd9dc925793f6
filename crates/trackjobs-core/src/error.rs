use thiserror::Error;

/// Errors raised by mutation and query operations on a [`crate::table::JobTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// A record with this id is already in the table.
    #[error("job with ID {id} already exists in database")]
    DuplicateId { id: i64 },

    /// No record with this id exists in the table.
    #[error("no job with ID {id} exists in database")]
    NotFound { id: i64 },

    /// The column name is unknown, or the column may not be targeted by this operation.
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The value cannot be converted to the column's semantic type.
    #[error("cannot convert '{value}' for column '{column}': expected {expected}")]
    TypeCoercion {
        column: String,
        value: String,
        expected: &'static str,
    },

    /// Multi-id operation where some ids failed; the others were applied.
    #[error("{} of the requested jobs failed: {}", failures.len(), join_failures(failures))]
    Partial { failures: Vec<JobError> },
}

fn join_failures(failures: &[JobError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that are not tied to a single table operation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Job(#[from] JobError),
}

pub type Result<T> = std::result::Result<T, JobError>;
