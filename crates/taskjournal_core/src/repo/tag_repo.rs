//! Tag repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read and write `tags` rows and `task_tags` links.
//!
//! # Invariants
//! - Tag names are unique (enforced by the schema).
//! - Deleting a tag removes its links before the row.

use crate::model::tag::{TagId, TagRef, TaskTag};
use crate::model::task::TaskId;
use crate::repo::{EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TAG_SELECT_SQL: &str = "SELECT tag_id, name, color FROM tags";

/// Repository interface for tags and tag links.
pub trait TagRepository {
    fn all_tags(&self) -> RepoResult<Vec<TaskTag>>;
    fn get_tag(&self, tag: &TagRef) -> RepoResult<Option<TaskTag>>;
    fn insert_tag(&self, tag: &TaskTag) -> RepoResult<()>;
    fn update_tag(&self, tag: &TaskTag) -> RepoResult<()>;
    fn delete_tag(&self, tag_id: TagId) -> RepoResult<()>;
    /// Links a tag to a task; linking twice is a no-op.
    fn link_task(&self, task_id: TaskId, tag_id: TagId) -> RepoResult<()>;
    fn unlink_task(&self, task_id: TaskId, tag_id: TagId) -> RepoResult<()>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn all_tags(&self) -> RepoResult<Vec<TaskTag>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TAG_SELECT_SQL} ORDER BY name ASC;"))?;
        let tags = stmt
            .query_map([], parse_tag_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn get_tag(&self, tag: &TagRef) -> RepoResult<Option<TaskTag>> {
        let found = match tag {
            TagRef::Id(tag_id) => self
                .conn
                .query_row(
                    &format!("{TAG_SELECT_SQL} WHERE tag_id = ?1;"),
                    [tag_id],
                    parse_tag_row,
                )
                .optional()?,
            TagRef::Name(name) => self
                .conn
                .query_row(
                    &format!("{TAG_SELECT_SQL} WHERE name = ?1;"),
                    [name.as_str()],
                    parse_tag_row,
                )
                .optional()?,
        };
        Ok(found)
    }

    fn insert_tag(&self, tag: &TaskTag) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO tags (tag_id, name, color) VALUES (?1, ?2, ?3);",
            params![tag.tag_id, tag.name.as_str(), tag.color.as_deref()],
        )?;
        Ok(())
    }

    fn update_tag(&self, tag: &TaskTag) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tags SET name = ?2, color = ?3 WHERE tag_id = ?1;",
            params![tag.tag_id, tag.name.as_str(), tag.color.as_deref()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Tag(tag.tag_id)));
        }
        Ok(())
    }

    fn delete_tag(&self, tag_id: TagId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM task_tags WHERE tag_id = ?1;", [tag_id])?;
        self.conn
            .execute("DELETE FROM tags WHERE tag_id = ?1;", [tag_id])?;
        Ok(())
    }

    fn link_task(&self, task_id: TaskId, tag_id: TagId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?1, ?2);",
            params![task_id, tag_id],
        )?;
        Ok(())
    }

    fn unlink_task(&self, task_id: TaskId, tag_id: TagId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM task_tags WHERE task_id = ?1 AND tag_id = ?2;",
            params![task_id, tag_id],
        )?;
        Ok(())
    }
}

fn parse_tag_row(row: &Row<'_>) -> rusqlite::Result<TaskTag> {
    Ok(TaskTag {
        tag_id: row.get("tag_id")?,
        name: row.get("name")?,
        color: row.get("color")?,
    })
}
