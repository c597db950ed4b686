//! Journal schema registry and initializer.
//!
//! # Responsibility
//! - Hold the single supported schema version.
//! - Create every journal table atomically on a fresh store.
//!
//! # Invariants
//! - Only version 1 exists; there is no upgrade path between versions.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("0001_journal.sql");

/// Tables every initialized journal store carries.
pub const JOURNAL_TABLES: &[&str] = &[
    "metadata",
    "tasks",
    "lists",
    "task_lists",
    "tags",
    "task_tags",
    "task_attributes",
    "task_relations",
    "notifications",
];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    SCHEMA_VERSION
}

/// Creates the journal schema when the store has none yet.
///
/// A store already at [`SCHEMA_VERSION`] is left untouched; a store written
/// by a newer binary is rejected.
pub fn initialize_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
