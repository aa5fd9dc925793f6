//! Column descriptors shared by filter, sort, modify and presentation.
//!
//! The table has a fixed set of columns. Each one knows its semantic kind, how
//! to coerce a user-supplied string into a value of that kind, how to read the
//! value out of a [`Record`], and how to order two records by it.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{JobError, Result};
use crate::types::{JobStatus, Record};

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    Status,
    Boolean,
    Date,
}

impl ColumnKind {
    fn expected(self) -> &'static str {
        match self {
            ColumnKind::Integer => "an integer",
            ColumnKind::Text => "text",
            ColumnKind::Status => "a status code",
            ColumnKind::Boolean => "true or false",
            ColumnKind::Date => "an RFC 3339 timestamp or a YYYY-MM-DD date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Name,
    Script,
    Directory,
    Comment,
    Status,
    Checked,
    DateAdded,
}

/// A coerced cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Integer(i64),
    Text(Option<String>),
    Status(JobStatus),
    Boolean(bool),
    Date(DateTime<Utc>),
    /// Calendar day (UTC); only produced when coercing a filter value.
    Day(NaiveDate),
}

impl CellValue {
    /// Equality used by `filter`: a [`CellValue::Day`] matches any timestamp on that day.
    pub fn matches(&self, needle: &CellValue) -> bool {
        match (self, needle) {
            (CellValue::Date(at), CellValue::Day(day)) => at.date_naive() == *day,
            (lhs, rhs) => lhs == rhs,
        }
    }
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Id,
        Column::Name,
        Column::Script,
        Column::Directory,
        Column::Comment,
        Column::Status,
        Column::Checked,
        Column::DateAdded,
    ];

    /// Canonical column name, as used in the store schema and in `--key`.
    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::Script => "script",
            Column::Directory => "directory",
            Column::Comment => "comment",
            Column::Status => "status",
            Column::Checked => "checked",
            Column::DateAdded => "date_added",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Id => ColumnKind::Integer,
            Column::Name | Column::Script | Column::Directory | Column::Comment => {
                ColumnKind::Text
            }
            Column::Status => ColumnKind::Status,
            Column::Checked => ColumnKind::Boolean,
            Column::DateAdded => ColumnKind::Date,
        }
    }

    /// Whether `modify` may write this column.
    ///
    /// `id` changes go through `replace_id`; `date_added` is immutable.
    pub fn is_modifiable(self) -> bool {
        !matches!(self, Column::Id | Column::DateAdded)
    }

    /// Convert user input into a value of this column's kind.
    ///
    /// For optional text columns the empty string means "no value".
    pub fn coerce(self, raw: &str) -> Result<CellValue> {
        let mismatch = || JobError::TypeCoercion {
            column: self.name().to_string(),
            value: raw.to_string(),
            expected: self.kind().expected(),
        };

        match self.kind() {
            ColumnKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(CellValue::Integer)
                .map_err(|_| mismatch()),
            ColumnKind::Text if self == Column::Name => {
                if raw.is_empty() {
                    Err(JobError::TypeCoercion {
                        column: self.name().to_string(),
                        value: raw.to_string(),
                        expected: "a non-empty name",
                    })
                } else {
                    Ok(CellValue::Text(Some(raw.to_string())))
                }
            }
            ColumnKind::Text => Ok(CellValue::Text(
                (!raw.is_empty()).then(|| raw.to_string()),
            )),
            ColumnKind::Status => Ok(CellValue::Status(JobStatus::from(raw))),
            ColumnKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(CellValue::Boolean(true)),
                "false" | "no" | "0" => Ok(CellValue::Boolean(false)),
                _ => Err(mismatch()),
            },
            ColumnKind::Date => {
                let raw = raw.trim();
                if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
                    return Ok(CellValue::Date(at.with_timezone(&Utc)));
                }
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map(CellValue::Day)
                    .map_err(|_| mismatch())
            }
        }
    }

    pub fn value_of(self, record: &Record) -> CellValue {
        match self {
            Column::Id => CellValue::Integer(record.id),
            Column::Name => CellValue::Text(Some(record.name.clone())),
            Column::Script => CellValue::Text(record.script.clone()),
            Column::Directory => CellValue::Text(record.directory.clone()),
            Column::Comment => CellValue::Text(record.comment.clone()),
            Column::Status => CellValue::Status(record.status.clone()),
            Column::Checked => CellValue::Boolean(record.checked),
            Column::DateAdded => CellValue::Date(record.date_added),
        }
    }

    /// Text form of the cell, if the column holds text or a status code.
    pub fn text_of(self, record: &Record) -> Option<&str> {
        match self {
            Column::Name => Some(&record.name),
            Column::Script => record.script.as_deref(),
            Column::Directory => record.directory.as_deref(),
            Column::Comment => record.comment.as_deref(),
            Column::Status => Some(record.status.as_str()),
            Column::Id | Column::Checked | Column::DateAdded => None,
        }
    }

    /// Human-readable cell text for tabular output.
    pub fn display(self, record: &Record) -> String {
        match self {
            Column::Id => record.id.to_string(),
            Column::Checked => record.checked.to_string(),
            Column::DateAdded => record.date_added.format("%Y-%m-%d %H:%M").to_string(),
            other => other.text_of(record).unwrap_or_default().to_string(),
        }
    }

    /// Natural order of two records by this column.
    ///
    /// Lexicographic for text (absent values first), numeric for integers,
    /// chronological for dates, `false < true` for booleans.
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            Column::Id => a.id.cmp(&b.id),
            Column::Name => a.name.cmp(&b.name),
            Column::Script => a.script.cmp(&b.script),
            Column::Directory => a.directory.cmp(&b.directory),
            Column::Comment => a.comment.cmp(&b.comment),
            Column::Status => a.status.as_str().cmp(b.status.as_str()),
            Column::Checked => a.checked.cmp(&b.checked),
            Column::DateAdded => a.date_added.cmp(&b.date_added),
        }
    }

    /// Write a coerced value into `record`.
    ///
    /// Callers check [`Column::is_modifiable`] and coerce through this column
    /// first; a value of the wrong kind is reported as a coercion failure.
    pub(crate) fn assign(self, record: &mut Record, value: CellValue) -> Result<()> {
        match (self, value) {
            (Column::Name, CellValue::Text(Some(name))) => record.name = name,
            (Column::Script, CellValue::Text(text)) => record.script = text,
            (Column::Directory, CellValue::Text(text)) => record.directory = text,
            (Column::Comment, CellValue::Text(text)) => record.comment = text,
            (Column::Status, CellValue::Status(status)) => record.status = status,
            (Column::Checked, CellValue::Boolean(flag)) => record.checked = flag,
            (column, value) => {
                return Err(JobError::TypeCoercion {
                    column: column.name().to_string(),
                    value: format!("{value:?}"),
                    expected: column.kind().expected(),
                })
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Column {
    type Err = JobError;

    /// Case-insensitive; also accepts the header spellings of older job databases.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let column = match s.trim().to_ascii_lowercase().as_str() {
            "id" => Column::Id,
            "name" => Column::Name,
            "script" | "job_script" => Column::Script,
            "directory" | "dir" => Column::Directory,
            "comment" | "comments" => Column::Comment,
            "status" => Column::Status,
            "checked" | "checked?" | "finished" => Column::Checked,
            "date_added" | "date" => Column::DateAdded,
            _ => {
                return Err(JobError::InvalidField {
                    field: s.to_string(),
                    reason: format!(
                        "unknown column (expected one of: {})",
                        Column::ALL.map(Column::name).join(", ")
                    ),
                })
            }
        };
        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> Record {
        Record {
            id,
            name: format!("job-{id}"),
            script: None,
            directory: Some("/scratch/run".into()),
            comment: None,
            status: JobStatus::Submitted,
            checked: false,
            date_added: DateTime::parse_from_rfc3339("2025-03-04T10:20:30Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn legacy_header_names_resolve() {
        assert_eq!("ID".parse::<Column>().unwrap(), Column::Id);
        assert_eq!("Job_script".parse::<Column>().unwrap(), Column::Script);
        assert_eq!("Checked?".parse::<Column>().unwrap(), Column::Checked);
        assert_eq!("Comments".parse::<Column>().unwrap(), Column::Comment);
        assert_eq!("Date".parse::<Column>().unwrap(), Column::DateAdded);
    }

    #[test]
    fn unknown_column_is_invalid_field() {
        let err = "walltime".parse::<Column>().unwrap_err();
        assert!(matches!(err, JobError::InvalidField { ref field, .. } if field == "walltime"));
    }

    #[test]
    fn integer_coercion_rejects_text() {
        assert_eq!(Column::Id.coerce(" 42 ").unwrap(), CellValue::Integer(42));
        assert!(matches!(
            Column::Id.coerce("forty-two"),
            Err(JobError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn boolean_coercion() {
        assert_eq!(Column::Checked.coerce("TRUE").unwrap(), CellValue::Boolean(true));
        assert_eq!(Column::Checked.coerce("no").unwrap(), CellValue::Boolean(false));
        assert!(Column::Checked.coerce("maybe").is_err());
    }

    #[test]
    fn empty_text_clears_optional_columns_but_not_name() {
        assert_eq!(Column::Comment.coerce("").unwrap(), CellValue::Text(None));
        assert!(Column::Name.coerce("").is_err());
    }

    #[test]
    fn day_value_matches_timestamps_on_that_day() {
        let r = record(1);
        let day = Column::DateAdded.coerce("2025-03-04").unwrap();
        let other_day = Column::DateAdded.coerce("2025-03-05").unwrap();
        assert!(Column::DateAdded.value_of(&r).matches(&day));
        assert!(!Column::DateAdded.value_of(&r).matches(&other_day));

        let exact = Column::DateAdded.coerce("2025-03-04T11:20:30+01:00").unwrap();
        assert!(Column::DateAdded.value_of(&r).matches(&exact));
    }

    #[test]
    fn compare_orders_absent_text_first() {
        let mut a = record(1);
        let mut b = record(2);
        a.script = None;
        b.script = Some("a.sh".into());
        assert_eq!(Column::Script.compare(&a, &b), Ordering::Less);
        assert_eq!(Column::Id.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn id_and_date_are_not_modifiable() {
        let writable: Vec<_> = Column::ALL.into_iter().filter(|c| c.is_modifiable()).collect();
        assert!(!writable.contains(&Column::Id));
        assert!(!writable.contains(&Column::DateAdded));
        assert_eq!(writable.len(), 6);
    }
}
