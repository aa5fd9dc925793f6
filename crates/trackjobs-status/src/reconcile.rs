use tracing::{debug, info, warn};
use trackjobs_core::{JobStatus, JobTable};
use trackjobs_store::TableStore;

use crate::{
    command::StatusCommand,
    error::Result,
    parse::{parse_queue_output, QueueSnapshot},
    runner::CommandRunner,
};

/// Status change applied to one job during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub id: i64,
    pub from: JobStatus,
    pub to: JobStatus,
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Number of unchecked jobs that were examined.
    pub examined: usize,
    /// Jobs whose status changed.
    pub transitions: Vec<Transition>,
    /// Jobs no longer listed by the scheduler, now marked `Finished?`.
    pub vanished: Vec<i64>,
    /// False when there was nothing unchecked and the command was not run.
    pub queried: bool,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        !self.transitions.is_empty()
    }
}

/// Merge a queue snapshot into every unchecked job of `table`.
///
/// Listed jobs take the reported code verbatim; unlisted jobs are marked
/// [`JobStatus::Finished`]. The `checked` flag, comments and every other
/// field are left alone, and OK/FAILED are never assigned here.
pub fn reconcile(table: &mut JobTable, snapshot: &QueueSnapshot) -> ReconcileReport {
    let mut report = ReconcileReport {
        queried: true,
        ..ReconcileReport::default()
    };

    table.for_each_unchecked(|id, status| {
        report.examined += 1;
        let next = match snapshot.get(&id) {
            Some(code) => JobStatus::from(code.as_str()),
            None => {
                report.vanished.push(id);
                JobStatus::Finished
            }
        };
        if *status != next {
            debug!(job_id = id, from = %status, to = %next, "status changed");
            report.transitions.push(Transition {
                id,
                from: std::mem::replace(status, next.clone()),
                to: next,
            });
        }
    });
    report
}

/// One status-check pass against the persisted table.
pub struct Reconciler<R: CommandRunner> {
    command: StatusCommand,
    runner: R,
}

impl<R: CommandRunner> Reconciler<R> {
    pub fn new(command: StatusCommand, runner: R) -> Self {
        Self { command, runner }
    }

    /// Run the query command once and merge its output into `table`.
    ///
    /// A failed command returns before anything is merged.
    pub fn refresh(&self, table: &mut JobTable) -> Result<ReconcileReport> {
        if table.records().iter().all(|r| r.checked) {
            debug!("no unchecked jobs, skipping status query");
            return Ok(ReconcileReport::default());
        }

        let output = self.runner.run(&self.command)?;
        let snapshot = parse_queue_output(&output);
        debug!(listed = snapshot.len(), "queue snapshot parsed");

        let report = reconcile(table, &snapshot);
        if !report.vanished.is_empty() {
            warn!(
                count = report.vanished.len(),
                "jobs left the queue and need an OK/FAILED verdict"
            );
        }
        Ok(report)
    }

    /// Load the table, refresh it and save it once if anything changed.
    ///
    /// Returns the refreshed table together with the report.
    pub fn check_status(&self, store: &TableStore) -> Result<(JobTable, ReconcileReport)> {
        let mut table = store.load()?;
        let report = self.refresh(&mut table)?;
        if report.changed() {
            store.save(&table)?;
        }
        info!(
            examined = report.examined,
            changed = report.transitions.len(),
            vanished = report.vanished.len(),
            "status check complete"
        );
        Ok((table, report))
    }
}
