//! List repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read and write `lists` rows and `task_lists` memberships.
//!
//! # Invariants
//! - Deleting a list removes its memberships, never the member tasks.
//! - Listings are ordered by `position ASC`.

use crate::model::task::TaskId;
use crate::model::task_list::{ListId, TaskList};
use crate::repo::{id_set_json, unique_ids, EntityRef, RepoError, RepoResult, ID_SET_SQL};
use rusqlite::{params, Connection, OptionalExtension, Row};

const LIST_SELECT_SQL: &str = "SELECT list_id, name, icon, position FROM lists";

/// Repository interface for lists and list memberships.
pub trait ListRepository {
    fn all_lists(&self) -> RepoResult<Vec<TaskList>>;
    fn get_list(&self, list_id: ListId) -> RepoResult<Option<TaskList>>;
    fn get_lists(&self, list_ids: &[ListId]) -> RepoResult<Vec<TaskList>>;
    fn insert_list(&self, list: &TaskList) -> RepoResult<()>;
    fn update_list(&self, list: &TaskList) -> RepoResult<()>;
    fn delete_list(&self, list_id: ListId) -> RepoResult<()>;
    /// Adds a membership; adding an existing one is a no-op.
    fn add_member(&self, list_id: ListId, task_id: TaskId) -> RepoResult<()>;
    fn remove_member(&self, list_id: ListId, task_id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn all_lists(&self) -> RepoResult<Vec<TaskList>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} ORDER BY position ASC;"))?;
        let lists = stmt
            .query_map([], parse_list_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    fn get_list(&self, list_id: ListId) -> RepoResult<Option<TaskList>> {
        let list = self
            .conn
            .query_row(
                &format!("{LIST_SELECT_SQL} WHERE list_id = ?1;"),
                [list_id],
                parse_list_row,
            )
            .optional()?;
        Ok(list)
    }

    fn get_lists(&self, list_ids: &[ListId]) -> RepoResult<Vec<TaskList>> {
        let ids = unique_ids(list_ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL} WHERE list_id IN ({ID_SET_SQL}) ORDER BY position ASC;"
        ))?;
        let lists = stmt
            .query_map([id_set_json(&ids)?], parse_list_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    fn insert_list(&self, list: &TaskList) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO lists (list_id, name, icon, position) VALUES (?1, ?2, ?3, ?4);",
            params![
                list.list_id,
                list.name.as_str(),
                list.icon.as_deref(),
                list.position
            ],
        )?;
        Ok(())
    }

    fn update_list(&self, list: &TaskList) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE lists SET name = ?2, icon = ?3 WHERE list_id = ?1;",
            params![list.list_id, list.name.as_str(), list.icon.as_deref()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::List(list.list_id)));
        }
        Ok(())
    }

    fn delete_list(&self, list_id: ListId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM task_lists WHERE list_id = ?1;", [list_id])?;
        self.conn
            .execute("DELETE FROM lists WHERE list_id = ?1;", [list_id])?;
        Ok(())
    }

    fn add_member(&self, list_id: ListId, task_id: TaskId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO task_lists (list_id, task_id) VALUES (?1, ?2);",
            params![list_id, task_id],
        )?;
        Ok(())
    }

    fn remove_member(&self, list_id: ListId, task_id: TaskId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM task_lists WHERE list_id = ?1 AND task_id = ?2;",
            params![list_id, task_id],
        )?;
        Ok(())
    }
}

fn parse_list_row(row: &Row<'_>) -> rusqlite::Result<TaskList> {
    Ok(TaskList {
        list_id: row.get("list_id")?,
        name: row.get("name")?,
        icon: row.get("icon")?,
        position: row.get("position")?,
    })
}
