//! Repository layer over the journal's SQLite tables.
//!
//! # Responsibility
//! - Keep SQL details inside the persistence boundary.
//! - Provide row-level reads/writes plus the batch relation resolver and the
//!   position manager the journal facade composes.
//!
//! # Invariants
//! - Repositories never open transactions themselves; multi-row writes run
//!   on a `Transaction` handed in by the caller (it derefs to `Connection`).
//! - Batch reads issue one query per relationship kind, never one per id.

pub mod attribute_repo;
pub mod error;
pub mod list_repo;
pub mod metadata_repo;
pub mod position;
pub mod relation_repo;
pub mod resolver;
pub mod tag_repo;
pub mod task_repo;

pub use error::{EntityRef, RepoError, RepoResult};

use crate::db::migrations::JOURNAL_TABLES;
use rusqlite::Connection;
use std::collections::BTreeSet;

/// Verifies that every journal table exists on the connection.
pub fn ensure_journal_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &table in JOURNAL_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// `MAX(column) + 1`, or 1 when the table is empty.
pub(crate) fn next_value(conn: &Connection, table: &str, column: &str) -> RepoResult<i64> {
    let max: Option<i64> =
        conn.query_row(&format!("SELECT MAX({column}) FROM {table};"), [], |row| {
            row.get(0)
        })?;
    match max {
        None => Ok(1),
        Some(value) => value.checked_add(1).ok_or_else(|| {
            RepoError::InvalidData(format!("{table}.{column} has no value after {value}"))
        }),
    }
}

/// Subquery over the JSON id array bound at `?1`, for `IN (...)` filters.
///
/// The id set is one bound value whatever its size.
pub(crate) const ID_SET_SQL: &str = "SELECT value FROM json_each(?1)";

/// Encodes ids as the JSON array [`ID_SET_SQL`] reads.
pub(crate) fn id_set_json(ids: &[i64]) -> RepoResult<String> {
    serde_json::to_string(ids)
        .map_err(|err| RepoError::InvalidArgument(format!("cannot encode id set: {err}")))
}

/// Deduplicated, ascending ids.
pub(crate) fn unique_ids(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn count_to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
