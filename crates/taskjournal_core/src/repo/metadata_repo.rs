//! Free-form journal properties stored in `metadata`.

use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Property holding the journal's display name.
pub const JOURNAL_NAME_PROPERTY: &str = "journal_name";

pub fn get_property(conn: &Connection, property: &str) -> RepoResult<Option<String>> {
    let value: Option<Option<String>> = conn
        .query_row(
            "SELECT value FROM metadata WHERE property = ?1;",
            [property],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.flatten())
}

/// Inserts or replaces one property.
pub fn set_property(conn: &Connection, property: &str, value: &str) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO metadata (property, value) VALUES (?1, ?2)
         ON CONFLICT(property) DO UPDATE SET value = excluded.value;",
        params![property, value],
    )?;
    Ok(())
}
