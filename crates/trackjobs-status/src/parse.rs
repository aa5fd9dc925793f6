use std::collections::BTreeMap;

use tracing::debug;

/// Job id -> scheduler status code, as reported by one query run.
pub type QueueSnapshot = BTreeMap<i64, String>;

/// Parse `JOB_ID STATUS [...]` lines.
///
/// Double quotes are dropped (command files written for a shell often quote
/// the format string, which squeue then echoes). Tokens after the status are
/// ignored. Lines without two tokens or with a non-numeric id are skipped.
/// For array jobs the first line seen for a base id wins.
pub fn parse_queue_output(output: &str) -> QueueSnapshot {
    let mut snapshot = QueueSnapshot::new();
    for line in output.lines() {
        let line = line.replace('"', "");
        let mut tokens = line.split_whitespace();
        let (Some(raw_id), Some(status)) = (tokens.next(), tokens.next()) else {
            if !line.trim().is_empty() {
                debug!(line = %line, "skipping queue line without id and status");
            }
            continue;
        };
        let Some(id) = base_job_id(raw_id) else {
            debug!(line = %line, "skipping queue line with unparsable job id");
            continue;
        };
        snapshot.entry(id).or_insert_with(|| status.to_string());
    }
    snapshot
}

/// Strip array-task and server suffixes: `123_4`, `123.pbs01`, `123[7]` -> 123.
fn base_job_id(raw: &str) -> Option<i64> {
    let end = raw.find(['_', '.', '[']).unwrap_or(raw.len());
    raw[..end].parse().ok()
}
