use rusqlite::{Connection, OptionalExtension};

/// Layout version written to `meta`; bumped whenever the `jobs` columns change.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the job table schema in `conn` (idempotent).
///
/// `position` carries the row order of the table, so the order survives a
/// save/load cycle independent of ids or insertion into SQLite.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS meta (
            key         TEXT    NOT NULL PRIMARY KEY,
            value       INTEGER NOT NULL
        ) STRICT;

        CREATE TABLE IF NOT EXISTS jobs (
            position    INTEGER NOT NULL PRIMARY KEY,
            id          INTEGER NOT NULL UNIQUE,
            name        TEXT    NOT NULL,
            script      TEXT,
            directory   TEXT,
            comment     TEXT,
            status      TEXT    NOT NULL,
            checked     INTEGER NOT NULL,   -- 0 / 1
            date_added  TEXT    NOT NULL    -- RFC 3339, UTC
        ) STRICT;
        ",
    )?;
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Read the stored schema version; `None` when the `meta` row is absent.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT value FROM meta WHERE key = 'schema_version'",
        [],
        |row| row.get(0),
    )
    .optional()
}
