//! Manual sort order for tasks and lists.
//!
//! # Responsibility
//! - Hand out the next free position in a namespace.
//! - Swap two positions without tripping the `UNIQUE(position)` constraint.
//!
//! # Invariants
//! - Tasks and lists are independent namespaces with the same rules.
//! - A swap leaves the namespace's set of positions unchanged once committed.
//! - A swap naming a missing row writes nothing and reports `false`.

use crate::repo::{next_value, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction};

/// Table whose `position` column is managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSpace {
    Tasks,
    Lists,
}

impl PositionSpace {
    fn table(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Lists => "lists",
        }
    }

    fn id_column(self) -> &'static str {
        match self {
            Self::Tasks => "task_id",
            Self::Lists => "list_id",
        }
    }
}

/// Identifier for the next inserted row: `MAX(id) + 1`, or 1.
pub fn next_id(conn: &Connection, space: PositionSpace) -> RepoResult<i64> {
    next_value(conn, space.table(), space.id_column())
}

/// Position for the next inserted row: `MAX(position) + 1`, or 1.
pub fn next_position(conn: &Connection, space: PositionSpace) -> RepoResult<i64> {
    next_value(conn, space.table(), "position")
}

/// Reads the current position of one row.
pub fn position_of(conn: &Connection, space: PositionSpace, id: i64) -> RepoResult<Option<i64>> {
    let position = conn
        .query_row(
            &format!(
                "SELECT position FROM {} WHERE {} = ?1;",
                space.table(),
                space.id_column()
            ),
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(position)
}

/// Exchanges the positions of `first` and `second` inside `tx`.
///
/// `first` is parked at `MAX(position) + 1` while `second` takes its slot,
/// then moves into `second`'s old slot. Returns `false` without writing when
/// either row is missing or both ids are the same.
pub fn swap_positions(
    tx: &Transaction<'_>,
    space: PositionSpace,
    first: i64,
    second: i64,
) -> RepoResult<bool> {
    if first == second {
        return Ok(false);
    }
    let (Some(first_position), Some(second_position)) = (
        position_of(tx, space, first)?,
        position_of(tx, space, second)?,
    ) else {
        return Ok(false);
    };

    let parking = next_position(tx, space)?;
    let sql = format!(
        "UPDATE {} SET position = ?1 WHERE {} = ?2;",
        space.table(),
        space.id_column()
    );
    tx.execute(&sql, params![parking, first])?;
    tx.execute(&sql, params![first_position, second])?;
    tx.execute(&sql, params![second_position, first])?;
    Ok(true)
}
