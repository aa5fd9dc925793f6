//! Read-only views over a [`JobTable`].
//!
//! None of these change the table; persisted reordering goes through
//! [`JobTable::reorder_by`].

use crate::column::{Column, ColumnKind};
use crate::error::{JobError, Result};
use crate::table::{sort_records, JobTable};
use crate::types::Record;

/// Records whose `key` column equals `value` after coercion, in table order.
pub fn filter<'a>(table: &'a JobTable, key: &str, value: &str) -> Result<Vec<&'a Record>> {
    let column: Column = key.parse()?;
    let needle = column.coerce(value)?;
    Ok(table
        .iter()
        .filter(|r| column.value_of(r).matches(&needle))
        .collect())
}

/// Substring match on text and status columns; exact match on the others.
pub fn filter_contains<'a>(table: &'a JobTable, key: &str, value: &str) -> Result<Vec<&'a Record>> {
    let column: Column = key.parse()?;
    match column.kind() {
        ColumnKind::Text | ColumnKind::Status => Ok(table
            .iter()
            .filter(|r| column.text_of(r).is_some_and(|text| text.contains(value)))
            .collect()),
        _ => filter(table, key, value),
    }
}

/// Records sorted by `key`; stable, so ties keep their relative order.
pub fn sort<'a>(records: &[&'a Record], key: &str, descending: bool) -> Result<Vec<&'a Record>> {
    let column: Column = key.parse()?;
    let mut sorted = records.to_vec();
    sort_records(&mut sorted, column, descending);
    Ok(sorted)
}

/// The `n` most recently added records, oldest first. `n` is at least 1.
pub fn tail(table: &JobTable, n: usize) -> Vec<&Record> {
    let mut records = by_date_added(table.iter());
    let skip = records.len().saturating_sub(n.max(1));
    records.drain(..skip);
    records
}

/// Records whose outcome has not been recorded yet, ordered by `date_added`.
pub fn unchecked(table: &JobTable) -> Vec<&Record> {
    by_date_added(table.iter().filter(|r| !r.checked))
}

/// The records with the given ids, in table order.
///
/// Every id that is not in the table is reported; nothing is returned then.
pub fn select<'a>(table: &'a JobTable, ids: &[i64]) -> Result<Vec<&'a Record>> {
    let mut missing: Vec<JobError> = ids
        .iter()
        .filter(|&&id| !table.contains(id))
        .map(|&id| JobError::NotFound { id })
        .collect();
    match missing.len() {
        0 => Ok(table.iter().filter(|r| ids.contains(&r.id)).collect()),
        1 => Err(missing.remove(0)),
        _ => Err(JobError::Partial { failures: missing }),
    }
}

fn by_date_added<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<&'a Record> {
    let mut records: Vec<_> = records.collect();
    sort_records(&mut records, Column::DateAdded, false);
    records
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::types::{JobStatus, Outcome};

    /// Table with ids 1..=n added one minute apart, in that order.
    fn table(n: i64) -> JobTable {
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        let records = (1..=n)
            .map(|id| Record {
                id,
                name: format!("job-{id}"),
                script: Some(format!("run-{id}.sh")),
                directory: None,
                comment: None,
                status: JobStatus::Submitted,
                checked: false,
                date_added: start + Duration::minutes(id),
            })
            .collect();
        JobTable::from_records(records).unwrap()
    }

    fn ids(records: &[&Record]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn filter_unknown_key_is_invalid_field() {
        let t = table(2);
        assert!(matches!(
            filter(&t, "queue", "gpu"),
            Err(JobError::InvalidField { .. })
        ));
    }

    #[test]
    fn filter_integer_column_requires_integer() {
        let t = table(2);
        assert!(matches!(
            filter(&t, "id", "two"),
            Err(JobError::TypeCoercion { .. })
        ));
        assert_eq!(ids(&filter(&t, "id", "2").unwrap()), vec![2]);
    }

    #[test]
    fn filter_by_status_partitions_table() {
        let mut t = table(6);
        t.set_status(&[1, 4], Outcome::Failed, None);
        t.set_status(&[2], Outcome::Ok, None);
        t.modify(5, "status", "RUNNING").unwrap();

        let failed = filter(&t, "status", "FAILED").unwrap();
        assert_eq!(ids(&failed), vec![1, 4]);

        let statuses: BTreeSet<String> =
            t.records().iter().map(|r| r.status.to_string()).collect();
        let mut seen = Vec::new();
        for status in &statuses {
            seen.extend(ids(&filter(&t, "status", status).unwrap()));
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn filter_contains_matches_substrings() {
        let t = table(12);
        let hits = filter_contains(&t, "script", "run-1").unwrap();
        assert_eq!(ids(&hits), vec![1, 10, 11, 12]);
        // Integer columns still compare exactly.
        assert_eq!(ids(&filter_contains(&t, "id", "1").unwrap()), vec![1]);
    }

    #[test]
    fn sort_desc_reverses_sort_asc() {
        let t = table(5);
        let all: Vec<&Record> = t.records().iter().collect();
        for key in ["id", "name", "date_added"] {
            let asc = sort(&all, key, false).unwrap();
            let mut desc = sort(&asc, key, true).unwrap();
            desc.reverse();
            assert_eq!(ids(&asc), ids(&desc), "key {key}");
        }
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut t = table(4);
        t.set_status(&[3, 1], Outcome::Ok, None);
        let all: Vec<&Record> = t.records().iter().collect();
        assert_eq!(ids(&sort(&all, "checked", false).unwrap()), vec![2, 4, 1, 3]);
        assert_eq!(ids(&sort(&all, "checked", true).unwrap()), vec![1, 3, 2, 4]);
        // Sorting a view does not touch stored order.
        assert_eq!(ids(&t.records().iter().collect::<Vec<_>>()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn tail_returns_most_recent_last() {
        let t = table(8);
        assert_eq!(ids(&tail(&t, 5)), vec![4, 5, 6, 7, 8]);
        assert_eq!(ids(&tail(&t, 0)), vec![8]);
    }

    #[test]
    fn tail_on_short_table_returns_everything() {
        let t = table(3);
        assert_eq!(ids(&tail(&t, 5)), vec![1, 2, 3]);
    }

    #[test]
    fn tail_orders_by_date_not_position() {
        let mut t = table(3);
        t.reorder_by("id", true).unwrap();
        assert_eq!(ids(&tail(&t, 2)), vec![2, 3]);
    }

    #[test]
    fn unchecked_skips_resolved_jobs() {
        let mut t = table(4);
        t.set_status(&[2], Outcome::Ok, None);
        assert_eq!(ids(&unchecked(&t)), vec![1, 3, 4]);
    }

    #[test]
    fn select_reports_all_missing_ids() {
        let t = table(3);
        assert_eq!(ids(&select(&t, &[3, 1]).unwrap()), vec![1, 3]);
        assert_eq!(select(&t, &[7]).unwrap_err(), JobError::NotFound { id: 7 });
        assert!(matches!(
            select(&t, &[7, 8, 1]),
            Err(JobError::Partial { ref failures }) if failures.len() == 2
        ));
    }
}
