use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS slots (
    name       TEXT PRIMARY KEY CHECK(length(name) > 0),
    data       TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);
";

fn set_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

pub fn open(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    set_pragmas(&conn)?;
    Ok(conn)
}

pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Read the JSON text held in `name`, or None if the slot was never written.
pub fn read_slot(conn: &Connection, name: &str) -> Result<Option<String>> {
    let data = conn
        .query_row("SELECT data FROM slots WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(data)
}

/// Write `data` into `name`, creating or replacing the slot.
pub fn write_slot(conn: &Connection, name: &str, data: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO slots (name, data) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET
             data = excluded.data,
             updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
        rusqlite::params![name, data],
    )?;
    Ok(())
}

#[cfg(test)]
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    set_pragmas(&conn)?;
    init(&conn)?;
    Ok(conn)
}
