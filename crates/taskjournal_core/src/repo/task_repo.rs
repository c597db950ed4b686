//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read and write `tasks` rows and answer the classification queries.
//! - Own the cascading delete of a task's memberships, edges and attributes.
//!
//! # Invariants
//! - Rows come back with empty derived collections; hydration is the
//!   resolver's job.
//! - Pending-shaped views only return top-level tasks (no incoming PARENT
//!   edge); counts include subtasks.
//! - Listings are ordered by `position ASC`.

use crate::model::task::{NewTask, Task, TaskId};
use crate::model::task_list::ListId;
use crate::model::timestamp::{format_timestamp, parse_timestamp, Timestamp};
use crate::model::view::ListView;
use crate::repo::{
    bool_to_int, count_to_u64, id_set_json, unique_ids, EntityRef, RepoError, RepoResult,
    ID_SET_SQL,
};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;

const TASK_SELECT_SQL: &str = "SELECT
    task_id,
    position,
    description,
    notes,
    priority,
    creation_dtm,
    completion_dtm,
    due_dtm,
    start_dtm,
    is_trashed
FROM tasks";

const PENDING_FILTER_SQL: &str = "completion_dtm IS NULL
    AND is_trashed = 0
    AND NOT EXISTS (
        SELECT 1
        FROM task_relations r
        WHERE r.task_to_id = tasks.task_id
          AND r.relationship = 'parent_of'
    )";

/// Repository interface for task rows.
pub trait TaskRepository {
    /// Inserts one task row with caller-assigned id and position.
    fn insert_task(
        &self,
        task_id: TaskId,
        position: i64,
        creation_time: &Timestamp,
        task: &NewTask,
    ) -> RepoResult<()>;
    fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>>;
    /// Loads existing rows among `task_ids`; unknown ids are skipped.
    fn get_tasks(&self, task_ids: &[TaskId]) -> RepoResult<Vec<Task>>;
    fn list_view(&self, view: ListView) -> RepoResult<Vec<Task>>;
    fn count_view(&self, view: ListView) -> RepoResult<u64>;
    /// Pending member count per list; unknown lists report 0.
    fn count_lists(&self, list_ids: &[ListId]) -> RepoResult<HashMap<ListId, u64>>;
    /// Writes every row column of `task`.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    /// Removes memberships, edges, attributes and the row itself.
    fn delete_task(&self, task_id: TaskId) -> RepoResult<()>;
    /// Substring match on description and notes.
    ///
    /// Case folding follows SQLite `LIKE`: ASCII letters only, so `é` and
    /// `É` differ.
    fn search_tasks(&self, query: &str) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_tasks(&self, sql: &str, bind_values: impl rusqlite::Params) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind_values)?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(
        &self,
        task_id: TaskId,
        position: i64,
        creation_time: &Timestamp,
        task: &NewTask,
    ) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO tasks (
                task_id,
                position,
                description,
                notes,
                priority,
                creation_dtm,
                completion_dtm,
                due_dtm,
                start_dtm,
                is_trashed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                task_id,
                position,
                task.description.as_str(),
                task.notes.as_deref(),
                task.priority,
                format_timestamp(creation_time),
                task.completion_time.as_ref().map(format_timestamp),
                task.due_time.as_ref().map(format_timestamp),
                task.start_time.as_ref().map(format_timestamp),
                bool_to_int(task.is_trashed),
            ],
        )?;
        Ok(())
    }

    fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>> {
        let mut tasks =
            self.query_tasks(&format!("{TASK_SELECT_SQL} WHERE task_id = ?1;"), [task_id])?;
        Ok(tasks.pop())
    }

    fn get_tasks(&self, task_ids: &[TaskId]) -> RepoResult<Vec<Task>> {
        let ids = unique_ids(task_ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} WHERE task_id IN ({ID_SET_SQL}) ORDER BY position ASC;"),
            [id_set_json(&ids)?],
        )
    }

    fn list_view(&self, view: ListView) -> RepoResult<Vec<Task>> {
        match view {
            ListView::Pending => self.query_tasks(
                &format!("{TASK_SELECT_SQL} WHERE {PENDING_FILTER_SQL} ORDER BY position ASC;"),
                [],
            ),
            ListView::Completed => self.query_tasks(
                &format!(
                    "{TASK_SELECT_SQL}
                     WHERE completion_dtm IS NOT NULL
                       AND is_trashed = 0
                     ORDER BY position ASC;"
                ),
                [],
            ),
            ListView::Trashed => self.query_tasks(
                &format!("{TASK_SELECT_SQL} WHERE is_trashed != 0 ORDER BY position ASC;"),
                [],
            ),
            ListView::List(list_id) => self.query_tasks(
                &format!(
                    "{TASK_SELECT_SQL}
                     WHERE {PENDING_FILTER_SQL}
                       AND EXISTS (
                           SELECT 1
                           FROM task_lists tl
                           WHERE tl.task_id = tasks.task_id
                             AND tl.list_id = ?1
                       )
                     ORDER BY position ASC;"
                ),
                [list_id],
            ),
        }
    }

    fn count_view(&self, view: ListView) -> RepoResult<u64> {
        let count: i64 = match view {
            ListView::Pending => self.conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE completion_dtm IS NULL AND is_trashed = 0;",
                [],
                |row| row.get(0),
            )?,
            ListView::Completed => self.conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE completion_dtm IS NOT NULL AND is_trashed = 0;",
                [],
                |row| row.get(0),
            )?,
            ListView::Trashed => self.conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE is_trashed != 0;",
                [],
                |row| row.get(0),
            )?,
            ListView::List(list_id) => self.conn.query_row(
                "SELECT COUNT(*)
                 FROM task_lists tl
                 INNER JOIN tasks t ON t.task_id = tl.task_id
                 WHERE tl.list_id = ?1
                   AND t.completion_dtm IS NULL
                   AND t.is_trashed = 0;",
                [list_id],
                |row| row.get(0),
            )?,
        };
        Ok(count_to_u64(count))
    }

    fn count_lists(&self, list_ids: &[ListId]) -> RepoResult<HashMap<ListId, u64>> {
        let ids = unique_ids(list_ids);
        let mut counts: HashMap<ListId, u64> = ids.iter().map(|id| (*id, 0)).collect();
        if ids.is_empty() {
            return Ok(counts);
        }

        let sql = format!(
            "SELECT tl.list_id, COUNT(*)
             FROM task_lists tl
             INNER JOIN tasks t ON t.task_id = tl.task_id
             WHERE tl.list_id IN ({ID_SET_SQL})
               AND t.completion_dtm IS NULL
               AND t.is_trashed = 0
             GROUP BY tl.list_id;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id_set_json(&ids)?])?;
        while let Some(row) = rows.next()? {
            let list_id: ListId = row.get(0)?;
            counts.insert(list_id, count_to_u64(row.get(1)?));
        }
        Ok(counts)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                description = ?2,
                notes = ?3,
                priority = ?4,
                creation_dtm = ?5,
                completion_dtm = ?6,
                due_dtm = ?7,
                start_dtm = ?8,
                is_trashed = ?9
             WHERE task_id = ?1;",
            params![
                task.task_id,
                task.description.as_str(),
                task.notes.as_deref(),
                task.priority,
                format_timestamp(&task.creation_time),
                task.completion_time.as_ref().map(format_timestamp),
                task.due_time.as_ref().map(format_timestamp),
                task.start_time.as_ref().map(format_timestamp),
                bool_to_int(task.is_trashed),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Task(task.task_id)));
        }
        Ok(())
    }

    fn delete_task(&self, task_id: TaskId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM task_lists WHERE task_id = ?1;", [task_id])?;
        self.conn
            .execute("DELETE FROM task_tags WHERE task_id = ?1;", [task_id])?;
        self.conn.execute(
            "DELETE FROM task_relations WHERE task_from_id = ?1 OR task_to_id = ?1;",
            [task_id],
        )?;
        self.conn
            .execute("DELETE FROM task_attributes WHERE task_id = ?1;", [task_id])?;
        self.conn
            .execute("DELETE FROM notifications WHERE task_id = ?1;", [task_id])?;
        self.conn
            .execute("DELETE FROM tasks WHERE task_id = ?1;", [task_id])?;
        Ok(())
    }

    fn search_tasks(&self, query: &str) -> RepoResult<Vec<Task>> {
        let pattern = format!("%{}%", escape_like(query));
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE description LIKE ?1 ESCAPE '\\'
                    OR notes LIKE ?1 ESCAPE '\\'
                 ORDER BY position ASC;"
            ),
            [pattern],
        )
    }
}

/// Escapes `LIKE` wildcards so the query matches literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let task_id: TaskId = row.get("task_id")?;
    let creation_time = required_timestamp(row, task_id, "creation_dtm")?;
    let is_trashed = match row.get::<_, i64>("is_trashed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_trashed value `{other}` for task {task_id}"
            )));
        }
    };

    let mut task = Task::from_row_fields(task_id, row.get("position")?, creation_time);
    task.description = row.get("description")?;
    task.notes = row.get("notes")?;
    task.priority = row.get("priority")?;
    task.completion_time = optional_timestamp(row, task_id, "completion_dtm")?;
    task.due_time = optional_timestamp(row, task_id, "due_dtm")?;
    task.start_time = optional_timestamp(row, task_id, "start_dtm")?;
    task.is_trashed = is_trashed;
    Ok(task)
}

fn required_timestamp(row: &Row<'_>, task_id: TaskId, column: &str) -> RepoResult<Timestamp> {
    optional_timestamp(row, task_id, column)?.ok_or_else(|| {
        RepoError::InvalidData(format!("missing tasks.{column} for task {task_id}"))
    })
}

fn optional_timestamp(
    row: &Row<'_>,
    task_id: TaskId,
    column: &str,
) -> RepoResult<Option<Timestamp>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => parse_timestamp(&text).map(Some).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{text}` in tasks.{column} for task {task_id}"
            ))
        }),
        None => Ok(None),
    }
}
