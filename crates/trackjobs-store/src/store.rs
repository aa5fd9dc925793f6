use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};
use trackjobs_core::{JobStatus, JobTable, Record};

use crate::{
    db::{init_db, schema_version, SCHEMA_VERSION},
    error::{Result, StoreError},
};

/// The single on-disk file holding the whole job table.
///
/// Every invocation loads the complete table, mutates it in memory and saves
/// it back in one piece. There is no cross-process lock: two invocations that
/// overlap can lose one another's changes.
#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted table; a missing file is an empty table.
    pub fn load(&self) -> Result<JobTable> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no job table yet, starting empty");
            return Ok(JobTable::new());
        }

        let corrupt = |e: rusqlite::Error| StoreError::corrupt(&self.path, e);
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(corrupt)?;

        match schema_version(&conn).map_err(corrupt)? {
            Some(SCHEMA_VERSION) => {}
            Some(other) => {
                return Err(StoreError::corrupt(
                    &self.path,
                    format!("unsupported schema version {other} (expected {SCHEMA_VERSION})"),
                ))
            }
            None => return Err(StoreError::corrupt(&self.path, "missing schema version")),
        }

        let rows = read_rows(&conn).map_err(corrupt)?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(row.into_record().map_err(|reason| StoreError::corrupt(&self.path, reason))?);
        }

        let table =
            JobTable::from_records(records).map_err(|e| StoreError::corrupt(&self.path, e))?;
        debug!(path = %self.path.display(), jobs = table.len(), "job table loaded");
        Ok(table)
    }

    /// Replace the persisted table with `table`.
    ///
    /// The table is written to a temporary file in the same directory, synced
    /// and renamed over the target. On any failure the temporary file is
    /// removed and the previous file stays as it was.
    pub fn save(&self, table: &JobTable) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::persistence(&self.path, e))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "jobs".to_string());
        let tmp = tempfile::Builder::new()
            .prefix(&format!(".{file_name}."))
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| StoreError::persistence(&self.path, e))?;

        write_table(tmp.path(), table).map_err(|e| StoreError::persistence(&self.path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::persistence(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::persistence(&self.path, e.error))?;

        info!(path = %self.path.display(), jobs = table.len(), "job table saved");
        Ok(())
    }
}

/// Raw column values of one `jobs` row.
struct JobRow {
    id: i64,
    name: String,
    script: Option<String>,
    directory: Option<String>,
    comment: Option<String>,
    status: String,
    checked: i64,
    date_added: String,
}

impl JobRow {
    fn into_record(self) -> std::result::Result<Record, String> {
        let date_added = DateTime::parse_from_rfc3339(&self.date_added)
            .map_err(|e| format!("job {}: bad date_added '{}': {e}", self.id, self.date_added))?
            .with_timezone(&Utc);
        let checked = match self.checked {
            0 => false,
            1 => true,
            other => return Err(format!("job {}: bad checked flag {other}", self.id)),
        };
        Ok(Record {
            id: self.id,
            name: self.name,
            script: self.script,
            directory: self.directory,
            comment: self.comment,
            status: JobStatus::from(self.status.as_str()),
            checked,
            date_added,
        })
    }
}

fn read_rows(conn: &Connection) -> rusqlite::Result<Vec<JobRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, script, directory, comment, status, checked, date_added
         FROM jobs ORDER BY position",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(JobRow {
            id: row.get(0)?,
            name: row.get(1)?,
            script: row.get(2)?,
            directory: row.get(3)?,
            comment: row.get(4)?,
            status: row.get(5)?,
            checked: row.get(6)?,
            date_added: row.get(7)?,
        })
    })?;
    rows.collect()
}

fn write_table(path: &Path, table: &JobTable) -> rusqlite::Result<()> {
    let mut conn = Connection::open(path)?;
    init_db(&conn)?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO jobs
             (position, id, name, script, directory, comment, status, checked, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for (position, record) in table.records().iter().enumerate() {
            stmt.execute(rusqlite::params![
                position as i64,
                record.id,
                record.name,
                record.script,
                record.directory,
                record.comment,
                record.status.as_str(),
                record.checked as i64,
                record
                    .date_added
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ])?;
        }
    }
    tx.commit()?;
    conn.close().map_err(|(_, e)| e)
}
