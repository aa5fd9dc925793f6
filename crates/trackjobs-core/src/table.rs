use std::borrow::Borrow;

use chrono::Utc;
use tracing::{debug, info};

use crate::column::Column;
use crate::error::{JobError, Result};
use crate::types::{JobStatus, NewJob, Outcome, Record};

/// The full, ordered collection of tracked jobs.
///
/// Row order is insertion order; only [`JobTable::reorder_by`] changes it.
/// Every mutation either succeeds completely or leaves the table untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobTable {
    records: Vec<Record>,
}

/// Result of a multi-id `set_status` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Ids that were updated, in request order.
    pub applied: Vec<i64>,
    /// One error per id that could not be updated.
    pub failures: Vec<JobError>,
}

impl StatusUpdate {
    /// `Ok(applied)` when every id succeeded, otherwise [`JobError::Partial`].
    pub fn into_result(self) -> Result<Vec<i64>> {
        if self.failures.is_empty() {
            Ok(self.applied)
        } else {
            Err(JobError::Partial {
                failures: self.failures,
            })
        }
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows in persisted order.
    ///
    /// Fails with `DuplicateId` if two rows share an id.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut table = Self::new();
        for record in records {
            if table.contains(record.id) {
                return Err(JobError::DuplicateId { id: record.id });
            }
            table.records.push(record);
        }
        Ok(table)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: i64) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Append a new job stamped with the current time.
    pub fn add(&mut self, job: NewJob) -> Result<&Record> {
        if self.contains(job.id) {
            return Err(JobError::DuplicateId { id: job.id });
        }
        Column::Name.coerce(&job.name)?;

        let record = Record {
            id: job.id,
            name: job.name,
            script: job.script.filter(|s| !s.is_empty()),
            directory: job.directory.filter(|s| !s.is_empty()),
            comment: job.comment.filter(|s| !s.is_empty()),
            status: job.status.unwrap_or_default(),
            checked: false,
            date_added: Utc::now(),
        };
        info!(job_id = record.id, name = %record.name, "job added");
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Remove a job and return it.
    pub fn delete(&mut self, id: i64) -> Result<Record> {
        let idx = self.position(id).ok_or(JobError::NotFound { id })?;
        let record = self.records.remove(idx);
        info!(job_id = id, "job deleted");
        Ok(record)
    }

    /// Overwrite one field of a job with a value coerced to the column's type.
    ///
    /// `id` and `date_added` cannot be modified; comments are replaced, not appended.
    pub fn modify(&mut self, id: i64, field: &str, value: &str) -> Result<&Record> {
        let column: Column = field.parse()?;
        if !column.is_modifiable() {
            let reason = match column {
                Column::Id => "use update-id to change a job ID",
                _ => "column is read-only",
            };
            return Err(JobError::InvalidField {
                field: field.to_string(),
                reason: reason.to_string(),
            });
        }
        if !self.contains(id) {
            return Err(JobError::NotFound { id });
        }
        let value = column.coerce(value)?;

        let record = self.get_mut(id).ok_or(JobError::NotFound { id })?;
        column.assign(record, value)?;
        info!(job_id = id, column = %column, "job modified");
        Ok(record)
    }

    /// Give a job a new id; the new id must not be in use.
    pub fn replace_id(&mut self, old_id: i64, new_id: i64) -> Result<&Record> {
        let idx = self.position(old_id).ok_or(JobError::NotFound { id: old_id })?;
        if self.contains(new_id) {
            return Err(JobError::DuplicateId { id: new_id });
        }
        self.records[idx].id = new_id;
        info!(old_id, new_id, "job id replaced");
        Ok(&self.records[idx])
    }

    /// Record the user's verdict for each id and mark it checked.
    ///
    /// Ids are processed independently: a missing id is reported in
    /// [`StatusUpdate::failures`] and does not undo or block the others.
    pub fn set_status(&mut self, ids: &[i64], outcome: Outcome, comment: Option<&str>) -> StatusUpdate {
        let mut update = StatusUpdate::default();
        let status = JobStatus::from(outcome);

        for &id in ids {
            let Some(record) = self.get_mut(id) else {
                update.failures.push(JobError::NotFound { id });
                continue;
            };
            record.status = status.clone();
            if let Some(text) = comment {
                record.append_comment(text);
            }
            record.checked = true;
            info!(job_id = id, status = %status, "job outcome recorded");
            update.applied.push(id);
        }
        update
    }

    /// Directory of a job, if one was recorded.
    pub fn directory_of(&self, id: i64) -> Result<Option<&str>> {
        self.get(id)
            .map(|r| r.directory.as_deref())
            .ok_or(JobError::NotFound { id })
    }

    /// Persistently reorder the rows by `key` (stable).
    ///
    /// This is the only operation that changes stored row order.
    pub fn reorder_by(&mut self, key: &str, descending: bool) -> Result<()> {
        let column: Column = key.parse()?;
        sort_records(&mut self.records, column, descending);
        debug!(column = %column, descending, "table reordered");
        Ok(())
    }

    /// Visit the status of every unchecked job, in table order.
    ///
    /// Only the status is exposed, so ids and user-owned fields cannot change.
    pub fn for_each_unchecked(&mut self, mut visit: impl FnMut(i64, &mut JobStatus)) {
        for record in self.records.iter_mut().filter(|r| !r.checked) {
            visit(record.id, &mut record.status);
        }
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

/// Stable sort; equal keys keep their relative order in both directions.
pub(crate) fn sort_records<R: Borrow<Record>>(records: &mut [R], column: Column, descending: bool) {
    records.sort_by(|a, b| {
        let ord = column.compare(
            <R as Borrow<Record>>::borrow(a),
            <R as Borrow<Record>>::borrow(b),
        );
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(ids: &[i64]) -> JobTable {
        let mut table = JobTable::new();
        for &id in ids {
            table.add(NewJob::new(id, format!("job-{id}"))).unwrap();
        }
        table
    }

    #[test]
    fn add_defaults() {
        let mut table = JobTable::new();
        let record = table.add(NewJob::new(7, "relax")).unwrap();
        assert_eq!(record.status, JobStatus::Submitted);
        assert!(!record.checked);
        assert!(record.comment.is_none());
    }

    #[test]
    fn add_duplicate_fails_and_keeps_table() {
        let mut table = table_with(&[1]);
        let before = table.clone();
        let err = table.add(NewJob::new(1, "again")).unwrap_err();
        assert_eq!(err, JobError::DuplicateId { id: 1 });
        assert_eq!(table, before);
    }

    #[test]
    fn add_then_delete_restores_table() {
        let mut table = table_with(&[1, 2]);
        let before = table.clone();
        table.add(NewJob::new(3, "tmp")).unwrap();
        table.delete(3).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut table = table_with(&[1]);
        assert_eq!(table.delete(9).unwrap_err(), JobError::NotFound { id: 9 });
    }

    #[test]
    fn modify_rejects_id_and_date_columns() {
        let mut table = table_with(&[1]);
        assert!(matches!(
            table.modify(1, "id", "5"),
            Err(JobError::InvalidField { .. })
        ));
        assert!(matches!(
            table.modify(1, "date_added", "2025-01-01"),
            Err(JobError::InvalidField { .. })
        ));
        assert!(matches!(
            table.modify(1, "nodes", "4"),
            Err(JobError::InvalidField { .. })
        ));
    }

    #[test]
    fn modify_checks_existence_and_type() {
        let mut table = table_with(&[1]);
        assert_eq!(
            table.modify(2, "name", "x").unwrap_err(),
            JobError::NotFound { id: 2 }
        );
        assert!(matches!(
            table.modify(1, "checked", "perhaps"),
            Err(JobError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn modify_overwrites_comment() {
        let mut table = table_with(&[1]);
        table.modify(1, "comment", "first").unwrap();
        table.modify(1, "Comments", "second").unwrap();
        assert_eq!(table.get(1).unwrap().comment.as_deref(), Some("second"));
        table.modify(1, "checked", "true").unwrap();
        assert!(table.get(1).unwrap().checked);
    }

    #[test]
    fn replace_id_keeps_ids_unique() {
        let mut table = table_with(&[1, 2]);
        assert_eq!(
            table.replace_id(1, 2).unwrap_err(),
            JobError::DuplicateId { id: 2 }
        );
        assert_eq!(
            table.replace_id(5, 6).unwrap_err(),
            JobError::NotFound { id: 5 }
        );
        table.replace_id(1, 10).unwrap();
        let ids: Vec<_> = table.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 2]);
    }

    #[test]
    fn set_status_is_partial() {
        let mut table = table_with(&[42]);
        let update = table.set_status(&[42, 99], Outcome::Failed, Some("bad node"));
        assert_eq!(update.applied, vec![42]);
        assert_eq!(update.failures, vec![JobError::NotFound { id: 99 }]);

        let record = table.get(42).unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert!(record.checked);
        assert_eq!(record.comment.as_deref(), Some("bad node"));

        assert!(matches!(
            update.into_result(),
            Err(JobError::Partial { ref failures }) if failures.len() == 1
        ));
    }

    #[test]
    fn set_status_appends_comment() {
        let mut table = JobTable::new();
        let mut job = NewJob::new(3, "md");
        job.comment = Some("restart from step 5.".into());
        table.add(job).unwrap();
        table.set_status(&[3], Outcome::Ok, Some(" converged")).into_result().unwrap();
        assert_eq!(
            table.get(3).unwrap().comment.as_deref(),
            Some("restart from step 5. converged")
        );
    }

    #[test]
    fn from_records_rejects_duplicates() {
        let table = table_with(&[1]);
        let mut rows = table.clone().into_records();
        rows.push(rows[0].clone());
        assert_eq!(
            JobTable::from_records(rows).unwrap_err(),
            JobError::DuplicateId { id: 1 }
        );
    }

    #[test]
    fn reorder_by_is_persistent_and_stable() {
        let mut table = table_with(&[3, 1, 2]);
        table.modify(3, "name", "same").unwrap();
        table.modify(1, "name", "same").unwrap();
        table.reorder_by("name", false).unwrap();
        let ids: Vec<_> = table.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
