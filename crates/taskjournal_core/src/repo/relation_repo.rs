//! Relation edge writes and pairwise lookups.
//!
//! # Invariants
//! - Edges are addressed by the exact `(from, to, kind)` triple.
//! - A task never relates to itself.
//! - A child has at most one PARENT edge pointing into it.

use crate::model::relation::Relationship;
use crate::model::task::TaskId;
use crate::repo::{EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

/// SQLite-backed relation edge repository.
pub struct SqliteRelationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRelationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Relationship kinds on the ordered pair `from -> to`.
    pub fn relationships(&self, from: TaskId, to: TaskId) -> RepoResult<BTreeSet<Relationship>> {
        let mut stmt = self.conn.prepare(
            "SELECT relationship
             FROM task_relations
             WHERE task_from_id = ?1 AND task_to_id = ?2;",
        )?;
        let mut rows = stmt.query(params![from, to])?;
        let mut kinds = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let token: String = row.get(0)?;
            let kind = Relationship::from_db(&token).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid relationship `{token}` between tasks {from} and {to}"
                ))
            })?;
            kinds.insert(kind);
        }
        Ok(kinds)
    }

    pub fn add_edge(&self, from: TaskId, to: TaskId, kind: Relationship) -> RepoResult<()> {
        ensure_distinct(from, to)?;
        if kind == Relationship::Parent {
            self.ensure_no_other_parent(from, to)?;
        }
        self.conn.execute(
            "INSERT INTO task_relations (task_from_id, task_to_id, relationship)
             VALUES (?1, ?2, ?3);",
            params![from, to, kind.as_db()],
        )?;
        Ok(())
    }

    /// Changes the kind of edge `(from, to, old)` to `new`.
    pub fn update_edge(
        &self,
        from: TaskId,
        to: TaskId,
        old: Relationship,
        new: Relationship,
    ) -> RepoResult<()> {
        if !self.relationships(from, to)?.contains(&old) {
            return Err(RepoError::NotFound(EntityRef::Relation {
                from,
                to,
                kind: old,
            }));
        }
        if old == new {
            return Ok(());
        }
        if new == Relationship::Parent {
            self.ensure_no_other_parent(from, to)?;
        }
        self.conn.execute(
            "UPDATE task_relations
             SET relationship = ?4
             WHERE task_from_id = ?1 AND task_to_id = ?2 AND relationship = ?3;",
            params![from, to, old.as_db(), new.as_db()],
        )?;
        Ok(())
    }

    pub fn delete_edge(&self, from: TaskId, to: TaskId, kind: Relationship) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM task_relations
             WHERE task_from_id = ?1 AND task_to_id = ?2 AND relationship = ?3;",
            params![from, to, kind.as_db()],
        )?;
        Ok(())
    }

    fn ensure_no_other_parent(&self, parent: TaskId, child: TaskId) -> RepoResult<()> {
        let existing: Option<TaskId> = self
            .conn
            .query_row(
                "SELECT task_from_id
                 FROM task_relations
                 WHERE task_to_id = ?1
                   AND relationship = 'parent_of'
                   AND task_from_id != ?2
                 ORDER BY task_from_id ASC
                 LIMIT 1;",
                params![child, parent],
                |row| row.get(0),
            )
            .optional()?;
        match existing {
            Some(existing_parent) => Err(RepoError::ParentConflict {
                child,
                existing_parent,
            }),
            None => Ok(()),
        }
    }
}

fn ensure_distinct(from: TaskId, to: TaskId) -> RepoResult<()> {
    if from == to {
        return Err(RepoError::InvalidArgument(format!(
            "task {from} cannot be related to itself"
        )));
    }
    Ok(())
}
