use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a tracked job.
///
/// The canonical codes are matched exactly (case-sensitive); anything else the
/// scheduler reports is kept verbatim in [`JobStatus::Other`], so
/// `JobStatus::from(s).to_string() == s` holds for every string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    /// Recorded by `add`, not yet seen by a status check.
    #[default]
    Submitted,
    Running,
    Pending,
    /// Outcome set by the user: job succeeded.
    Ok,
    /// Outcome set by the user: job failed.
    Failed,
    /// The job left the scheduler queue; waiting for the user to classify it.
    Finished,
    /// Raw scheduler code without a canonical meaning (e.g. `COMPLETING`).
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Submitted => "submitted",
            JobStatus::Running => "RUNNING",
            JobStatus::Pending => "PENDING",
            JobStatus::Ok => "OK",
            JobStatus::Failed => "FAILED",
            JobStatus::Finished => "Finished?",
            JobStatus::Other(code) => code,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        match s {
            "submitted" => JobStatus::Submitted,
            "RUNNING" => JobStatus::Running,
            "PENDING" => JobStatus::Pending,
            "OK" => JobStatus::Ok,
            "FAILED" => JobStatus::Failed,
            "Finished?" => JobStatus::Finished,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(JobStatus::from(s))
    }
}

impl Serialize for JobStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(JobStatus::from(s.as_str()))
    }
}

/// Verdict the user records for a job that is no longer running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Failed,
}

impl From<Outcome> for JobStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Ok => JobStatus::Ok,
            Outcome::Failed => JobStatus::Failed,
        }
    }
}

/// One tracked job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Scheduler job id, primary key.
    pub id: i64,
    pub name: String,
    /// Path of the submission script.
    pub script: Option<String>,
    /// Directory the job runs in.
    pub directory: Option<String>,
    /// Free-form notes; `set-ok`/`set-fail` append to it.
    pub comment: Option<String>,
    pub status: JobStatus,
    /// True once the user has recorded an outcome for the job.
    pub checked: bool,
    /// Creation time, never changed after `add`.
    pub date_added: DateTime<Utc>,
}

impl Record {
    /// Append `text` to the comment, creating it if there is none yet.
    pub fn append_comment(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.comment.as_mut() {
            Some(existing) => existing.push_str(text),
            None => self.comment = Some(text.to_string()),
        }
    }
}

/// Input for [`crate::table::JobTable::add`].
#[derive(Debug, Clone, Default)]
pub struct NewJob {
    pub id: i64,
    pub name: String,
    pub script: Option<String>,
    pub directory: Option<String>,
    pub comment: Option<String>,
    /// Initial status; defaults to `submitted`.
    pub status: Option<JobStatus>,
}

impl NewJob {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_codes_round_trip() {
        for code in ["submitted", "RUNNING", "PENDING", "OK", "FAILED", "Finished?"] {
            let status = JobStatus::from(code);
            assert!(!matches!(status, JobStatus::Other(_)), "{code} should be canonical");
            assert_eq!(status.to_string(), code);
        }
    }

    #[test]
    fn unknown_code_passes_through_verbatim() {
        let status = JobStatus::from("COMPLETING");
        assert_eq!(status, JobStatus::Other("COMPLETING".to_string()));
        assert_eq!(status.to_string(), "COMPLETING");
    }

    #[test]
    fn matching_is_case_sensitive() {
        // squeue never reports lower-case states; keep what we were given.
        assert_eq!(JobStatus::from("running"), JobStatus::Other("running".into()));
    }

    #[test]
    fn append_comment_concatenates() {
        let mut record = Record {
            id: 1,
            name: "relax".into(),
            script: None,
            directory: None,
            comment: None,
            status: JobStatus::Submitted,
            checked: false,
            date_added: Utc::now(),
        };
        record.append_comment("first.");
        record.append_comment("");
        record.append_comment(" second.");
        assert_eq!(record.comment.as_deref(), Some("first. second."));
    }
}
