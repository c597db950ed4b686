//! Task attribute writes.
//!
//! Reads go through the batch resolver; this module only mutates
//! `task_attributes` rows, encoding values with the attribute codec.

use crate::model::attribute::AttributeValue;
use crate::model::task::TaskId;
use crate::repo::{EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// SQLite-backed attribute writer.
pub struct SqliteAttributeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttributeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts a new `(task, key)` attribute; the key must not exist yet.
    pub fn insert_attribute(
        &self,
        task_id: TaskId,
        key: &str,
        value: &AttributeValue,
    ) -> RepoResult<()> {
        let (kind, payload) = value.encode();
        self.conn.execute(
            "INSERT INTO task_attributes (task_id, attr_key, attr_type, attr_value)
             VALUES (?1, ?2, ?3, ?4);",
            params![task_id, key, kind.as_tag(), payload],
        )?;
        Ok(())
    }

    /// Replaces value and kind of an existing attribute.
    pub fn update_attribute(
        &self,
        task_id: TaskId,
        key: &str,
        value: &AttributeValue,
    ) -> RepoResult<()> {
        let (kind, payload) = value.encode();
        let changed = self.conn.execute(
            "UPDATE task_attributes
             SET attr_type = ?3, attr_value = ?4
             WHERE task_id = ?1 AND attr_key = ?2;",
            params![task_id, key, kind.as_tag(), payload],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Attribute {
                task_id,
                key: key.to_string(),
            }));
        }
        Ok(())
    }

    pub fn delete_attribute(&self, task_id: TaskId, key: &str) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM task_attributes WHERE task_id = ?1 AND attr_key = ?2;",
            params![task_id, key],
        )?;
        Ok(())
    }
}
