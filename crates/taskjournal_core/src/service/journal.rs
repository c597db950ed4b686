//! Journal facade: the single entry point of the task data layer.
//!
//! # Responsibility
//! - Own the store connection for the lifetime of the handle.
//! - Serve classification queries, entity CRUD, membership, attribute and
//!   relationship mutation, position swaps and search.
//!
//! # Invariants
//! - Every mutation runs inside one immediate transaction; a failure leaves
//!   no partial state.
//! - Reads that hydrate tasks run inside one deferred transaction, so rows
//!   and their resolved relations come from the same snapshot.
//! - Single-entity getters return `Ok(None)` for unknown ids.

use crate::db::{open_db, open_db_in_memory};
use crate::model::attribute::AttributeValue;
use crate::model::patch::{ListPatch, TagPatch, TaskPatch};
use crate::model::relation::Relationship;
use crate::model::tag::{TagId, TagRef, TaskTag};
use crate::model::task::{NewTask, Task, TaskId};
use crate::model::task_list::{ListId, TaskList};
use crate::model::timestamp;
use crate::model::view::ListView;
use crate::repo::attribute_repo::SqliteAttributeRepository;
use crate::repo::list_repo::{ListRepository, SqliteListRepository};
use crate::repo::metadata_repo::{get_property, set_property, JOURNAL_NAME_PROPERTY};
use crate::repo::position::{next_id, next_position, swap_positions, PositionSpace};
use crate::repo::relation_repo::SqliteRelationRepository;
use crate::repo::resolver::RelationResolver;
use crate::repo::tag_repo::{SqliteTagRepository, TagRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::{
    ensure_journal_connection_ready, next_value, EntityRef, RepoError, RepoResult,
};
use log::{debug, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Handle over one journal store.
///
/// Dropping the handle closes the connection; [`Journal::close`] does the
/// same but reports close failures.
pub struct Journal {
    conn: Connection,
}

impl Journal {
    /// Opens (or creates and initializes) a journal file.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a fresh, initialized in-memory journal.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Attaches to a connection whose schema was already initialized.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when any journal table is absent.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        ensure_journal_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Releases the store connection.
    pub fn close(self) -> RepoResult<()> {
        self.conn.close().map_err(|(_, err)| RepoError::from(err))?;
        info!("event=journal_close module=journal status=ok");
        Ok(())
    }

    /// Batch resolver over the journal's current state.
    pub fn resolver(&self) -> RelationResolver<'_> {
        RelationResolver::new(&self.conn)
    }

    // ---- metadata ----

    pub fn get_metadata(&self, property: &str) -> RepoResult<Option<String>> {
        get_property(&self.conn, property)
    }

    pub fn set_metadata(&mut self, property: &str, value: &str) -> RepoResult<()> {
        set_property(&self.conn, property, value)
    }

    /// Display name stored under the `journal_name` property.
    pub fn journal_name(&self) -> RepoResult<Option<String>> {
        self.get_metadata(JOURNAL_NAME_PROPERTY)
    }

    // ---- classification views ----

    /// Tasks shown by a built-in view or a user list, ordered by position.
    pub fn list_tasks(&self, view: ListView) -> RepoResult<Vec<Task>> {
        self.read(|conn| {
            let rows = SqliteTaskRepository::new(conn).list_view(view)?;
            RelationResolver::new(conn).hydrate(rows)
        })
    }

    /// Number of tasks matching a view's completion/trash/membership filter.
    pub fn count(&self, view: ListView) -> RepoResult<u64> {
        SqliteTaskRepository::new(&self.conn).count_view(view)
    }

    /// Pending member counts for many lists in one query.
    pub fn list_counts(&self, list_ids: &[ListId]) -> RepoResult<HashMap<ListId, u64>> {
        SqliteTaskRepository::new(&self.conn).count_lists(list_ids)
    }

    // ---- lists ----

    /// All lists ordered by position.
    pub fn lists(&self) -> RepoResult<Vec<TaskList>> {
        SqliteListRepository::new(&self.conn).all_lists()
    }

    pub fn get_list(&self, list_id: ListId) -> RepoResult<Option<TaskList>> {
        SqliteListRepository::new(&self.conn).get_list(list_id)
    }

    pub fn get_lists(&self, list_ids: &[ListId]) -> RepoResult<Vec<TaskList>> {
        SqliteListRepository::new(&self.conn).get_lists(list_ids)
    }

    /// Appends a list after every existing one and returns its id.
    pub fn add_list(&mut self, name: &str, icon: Option<&str>) -> RepoResult<ListId> {
        let list_id = self.write(|tx| {
            let list = TaskList {
                list_id: next_id(tx, PositionSpace::Lists)?,
                name: name.to_string(),
                icon: icon.map(str::to_string),
                position: next_position(tx, PositionSpace::Lists)?,
            };
            SqliteListRepository::new(tx).insert_list(&list)?;
            Ok(list.list_id)
        })?;
        debug!("event=list_add module=journal status=ok list_id={list_id}");
        Ok(list_id)
    }

    pub fn update_list(&mut self, list_id: ListId, patch: &ListPatch) -> RepoResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.write(|tx| {
            let repo = SqliteListRepository::new(tx);
            let mut list = repo
                .get_list(list_id)?
                .ok_or(RepoError::NotFound(EntityRef::List(list_id)))?;
            patch.apply_to(&mut list);
            repo.update_list(&list)
        })?;
        debug!("event=list_update module=journal status=ok list_id={list_id}");
        Ok(())
    }

    /// Swaps the positions of two lists; `false` when either is missing.
    pub fn swap_list_positions(&mut self, first: ListId, second: ListId) -> RepoResult<bool> {
        let swapped = self.write(|tx| swap_positions(tx, PositionSpace::Lists, first, second))?;
        debug!(
            "event=list_swap module=journal status=ok first={first} second={second} swapped={swapped}"
        );
        Ok(swapped)
    }

    /// Deletes a list and its memberships; member tasks are kept.
    pub fn delete_list(&mut self, list_id: ListId) -> RepoResult<()> {
        self.write(|tx| SqliteListRepository::new(tx).delete_list(list_id))?;
        debug!("event=list_delete module=journal status=ok list_id={list_id}");
        Ok(())
    }

    // ---- tasks ----

    pub fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>> {
        self.read(|conn| match SqliteTaskRepository::new(conn).get_task(task_id)? {
            Some(task) => Ok(RelationResolver::new(conn).hydrate(vec![task])?.pop()),
            None => Ok(None),
        })
    }

    /// Existing tasks among `task_ids`, ordered by position.
    pub fn get_tasks(&self, task_ids: &[TaskId]) -> RepoResult<Vec<Task>> {
        self.read(|conn| {
            let rows = SqliteTaskRepository::new(conn).get_tasks(task_ids)?;
            RelationResolver::new(conn).hydrate(rows)
        })
    }

    /// Creates a task at the end of the manual order and returns its id.
    ///
    /// # Errors
    /// - `NotImplemented` when `task` carries tags, attributes or lists.
    pub fn add_task(&mut self, task: &NewTask) -> RepoResult<TaskId> {
        if !task.tags.is_empty() {
            return Err(RepoError::NotImplemented("tags on task creation"));
        }
        if !task.attributes.is_empty() {
            return Err(RepoError::NotImplemented("attributes on task creation"));
        }
        if !task.lists.is_empty() {
            return Err(RepoError::NotImplemented("list memberships on task creation"));
        }

        let creation_time = task.creation_time.unwrap_or_else(timestamp::now);
        let task_id = self.write(|tx| {
            let task_id = next_id(tx, PositionSpace::Tasks)?;
            let position = next_position(tx, PositionSpace::Tasks)?;
            SqliteTaskRepository::new(tx).insert_task(task_id, position, &creation_time, task)?;
            Ok(task_id)
        })?;
        debug!("event=task_add module=journal status=ok task_id={task_id}");
        Ok(task_id)
    }

    /// Applies the fields present in `patch` to one task.
    ///
    /// # Errors
    /// - `NotFound` when the task does not exist.
    pub fn update_task(&mut self, task_id: TaskId, patch: &TaskPatch) -> RepoResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.write(|tx| {
            let repo = SqliteTaskRepository::new(tx);
            let mut task = repo
                .get_task(task_id)?
                .ok_or(RepoError::NotFound(EntityRef::Task(task_id)))?;
            patch.apply_to(&mut task);
            repo.update_task(&task)
        })?;
        debug!("event=task_update module=journal status=ok task_id={task_id}");
        Ok(())
    }

    /// Deletes a task with its memberships, edges and attributes.
    pub fn delete_task(&mut self, task_id: TaskId) -> RepoResult<()> {
        self.write(|tx| SqliteTaskRepository::new(tx).delete_task(task_id))?;
        debug!("event=task_delete module=journal status=ok task_id={task_id}");
        Ok(())
    }

    /// Swaps the positions of two tasks; `false` when either is missing.
    pub fn swap_task_positions(&mut self, first: TaskId, second: TaskId) -> RepoResult<bool> {
        let swapped = self.write(|tx| swap_positions(tx, PositionSpace::Tasks, first, second))?;
        debug!(
            "event=task_swap module=journal status=ok first={first} second={second} swapped={swapped}"
        );
        Ok(swapped)
    }

    /// Tasks whose description or notes contain `query`, ignoring ASCII case.
    ///
    /// Non-ASCII letters match only in the same case.
    pub fn search_tasks(&self, query: &str) -> RepoResult<Vec<Task>> {
        self.read(|conn| {
            let rows = SqliteTaskRepository::new(conn).search_tasks(query)?;
            RelationResolver::new(conn).hydrate(rows)
        })
    }

    // ---- list memberships ----

    pub fn add_task_to_list(&mut self, task_id: TaskId, list_id: ListId) -> RepoResult<()> {
        self.write(|tx| SqliteListRepository::new(tx).add_member(list_id, task_id))
    }

    pub fn remove_task_from_list(&mut self, task_id: TaskId, list_id: ListId) -> RepoResult<()> {
        self.write(|tx| SqliteListRepository::new(tx).remove_member(list_id, task_id))
    }

    // ---- tags ----

    /// All tags ordered by name.
    pub fn tags(&self) -> RepoResult<Vec<TaskTag>> {
        SqliteTagRepository::new(&self.conn).all_tags()
    }

    pub fn get_tag(&self, tag: impl Into<TagRef>) -> RepoResult<Option<TaskTag>> {
        SqliteTagRepository::new(&self.conn).get_tag(&tag.into())
    }

    pub fn add_tag(&mut self, name: &str, color: Option<&str>) -> RepoResult<TagId> {
        let tag_id = self.write(|tx| insert_tag(tx, name, color))?;
        debug!("event=tag_add module=journal status=ok tag_id={tag_id}");
        Ok(tag_id)
    }

    pub fn update_tag(&mut self, tag_id: TagId, patch: &TagPatch) -> RepoResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.write(|tx| {
            let repo = SqliteTagRepository::new(tx);
            let mut tag = repo
                .get_tag(&TagRef::Id(tag_id))?
                .ok_or(RepoError::NotFound(EntityRef::Tag(tag_id)))?;
            patch.apply_to(&mut tag);
            repo.update_tag(&tag)
        })?;
        debug!("event=tag_update module=journal status=ok tag_id={tag_id}");
        Ok(())
    }

    /// Deletes a tag and its links; unknown tags are ignored.
    pub fn delete_tag(&mut self, tag: impl Into<TagRef>) -> RepoResult<()> {
        let tag = tag.into();
        self.write(|tx| {
            let repo = SqliteTagRepository::new(tx);
            if let Some(found) = repo.get_tag(&tag)? {
                repo.delete_tag(found.tag_id)?;
            }
            Ok(())
        })
    }

    /// Tags a task by name, creating the tag first when it does not exist.
    pub fn add_task_tag(&mut self, task_id: TaskId, name: &str) -> RepoResult<TagId> {
        let tag_id = self.write(|tx| {
            let repo = SqliteTagRepository::new(tx);
            let tag_id = match repo.get_tag(&TagRef::Name(name.to_string()))? {
                Some(tag) => tag.tag_id,
                None => insert_tag(tx, name, None)?,
            };
            repo.link_task(task_id, tag_id)?;
            Ok(tag_id)
        })?;
        debug!("event=task_tag_add module=journal status=ok task_id={task_id} tag_id={tag_id}");
        Ok(tag_id)
    }

    /// Removes a tag from a task; unknown tag names are ignored.
    pub fn remove_task_tag(&mut self, task_id: TaskId, name: &str) -> RepoResult<()> {
        self.write(|tx| {
            let repo = SqliteTagRepository::new(tx);
            if let Some(tag) = repo.get_tag(&TagRef::Name(name.to_string()))? {
                repo.unlink_task(task_id, tag.tag_id)?;
            }
            Ok(())
        })
    }

    // ---- attributes ----

    /// Adds a new typed attribute to a task.
    ///
    /// Accepts any [`AttributeValue`] source; dynamically typed values such
    /// as `rusqlite::types::Value` fail with `UnsupportedType` for kinds
    /// outside text/integer/float/boolean.
    pub fn add_task_attribute<V>(&mut self, task_id: TaskId, key: &str, value: V) -> RepoResult<()>
    where
        V: TryInto<AttributeValue>,
        RepoError: From<<V as TryInto<AttributeValue>>::Error>,
    {
        let value = value.try_into()?;
        self.write(|tx| SqliteAttributeRepository::new(tx).insert_attribute(task_id, key, &value))
    }

    /// Replaces an existing attribute's value, possibly changing its kind.
    pub fn update_task_attribute<V>(
        &mut self,
        task_id: TaskId,
        key: &str,
        value: V,
    ) -> RepoResult<()>
    where
        V: TryInto<AttributeValue>,
        RepoError: From<<V as TryInto<AttributeValue>>::Error>,
    {
        let value = value.try_into()?;
        self.write(|tx| SqliteAttributeRepository::new(tx).update_attribute(task_id, key, &value))
    }

    pub fn delete_task_attribute(&mut self, task_id: TaskId, key: &str) -> RepoResult<()> {
        self.write(|tx| SqliteAttributeRepository::new(tx).delete_attribute(task_id, key))
    }

    // ---- relationships ----

    /// Relationship kinds on the ordered pair `from -> to`.
    pub fn task_relationships(
        &self,
        from: TaskId,
        to: TaskId,
    ) -> RepoResult<BTreeSet<Relationship>> {
        SqliteRelationRepository::new(&self.conn).relationships(from, to)
    }

    /// Adds the edge `(from, to, kind)`.
    ///
    /// # Errors
    /// - `ParentConflict` when `kind` is `Parent` and `to` already has a
    ///   different parent.
    /// - `InvalidArgument` when `from == to`.
    pub fn add_task_relationship(
        &mut self,
        from: TaskId,
        to: TaskId,
        kind: Relationship,
    ) -> RepoResult<()> {
        self.write(|tx| SqliteRelationRepository::new(tx).add_edge(from, to, kind))?;
        debug!("event=relation_add module=journal status=ok from={from} to={to} kind={kind}");
        Ok(())
    }

    /// Changes the kind of edge `(from, to, old)` to `new`.
    pub fn update_task_relationship(
        &mut self,
        from: TaskId,
        to: TaskId,
        old: Relationship,
        new: Relationship,
    ) -> RepoResult<()> {
        self.write(|tx| SqliteRelationRepository::new(tx).update_edge(from, to, old, new))?;
        debug!(
            "event=relation_update module=journal status=ok from={from} to={to} old={old} new={new}"
        );
        Ok(())
    }

    pub fn delete_task_relationship(
        &mut self,
        from: TaskId,
        to: TaskId,
        kind: Relationship,
    ) -> RepoResult<()> {
        self.write(|tx| SqliteRelationRepository::new(tx).delete_edge(from, to, kind))?;
        debug!("event=relation_delete module=journal status=ok from={from} to={to} kind={kind}");
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn write<T>(&mut self, f: impl FnOnce(&Transaction<'_>) -> RepoResult<T>) -> RepoResult<T> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

fn insert_tag(conn: &Connection, name: &str, color: Option<&str>) -> RepoResult<TagId> {
    let tag = TaskTag {
        tag_id: next_value(conn, "tags", "tag_id")?,
        name: name.to_string(),
        color: color.map(str::to_string),
    };
    SqliteTagRepository::new(conn).insert_tag(&tag)?;
    Ok(tag.tag_id)
}
