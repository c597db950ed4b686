//! Batch resolution of task memberships and relation edges.
//!
//! # Responsibility
//! - Map many task ids to their lists, tags, attributes, subtasks, parent,
//!   dependencies and dependents.
//! - Hydrate task snapshots with those derived collections.
//!
//! # Invariants
//! - One query per relationship kind and direction, whatever the id count.
//! - Every requested id is a key of every returned map, even when its
//!   collection is empty or its parent is absent.
//! - With several PARENT edges into one child, the lowest parent id wins.

use crate::model::attribute::AttributeValue;
use crate::model::relation::Relationship;
use crate::model::task::{Task, TaskId};
use crate::model::task_list::ListId;
use crate::repo::{id_set_json, unique_ids, RepoError, RepoResult, ID_SET_SQL};
use rusqlite::{params, Connection};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Derived collections of one task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRelations {
    pub lists: BTreeSet<ListId>,
    pub tags: BTreeSet<String>,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub subtasks: BTreeSet<TaskId>,
    pub parent: Option<TaskId>,
    pub dependencies: BTreeSet<TaskId>,
    pub dependents: BTreeSet<TaskId>,
}

/// Which edge end is matched against the requested ids.
#[derive(Debug, Clone, Copy)]
enum EdgeEnd {
    /// Match `task_from_id`, collect `task_to_id`.
    From,
    /// Match `task_to_id`, collect `task_from_id`.
    To,
}

impl EdgeEnd {
    fn columns(self) -> (&'static str, &'static str) {
        match self {
            Self::From => ("task_from_id", "task_to_id"),
            Self::To => ("task_to_id", "task_from_id"),
        }
    }
}

/// Batch resolver bound to one connection or transaction.
pub struct RelationResolver<'conn> {
    conn: &'conn Connection,
}

impl<'conn> RelationResolver<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// List memberships per task.
    pub fn lists(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, BTreeSet<ListId>>> {
        let ids = unique_ids(task_ids);
        let mut lists = empty_map(&ids);
        if ids.is_empty() {
            return Ok(lists);
        }

        let sql = format!(
            "SELECT task_id, list_id
             FROM task_lists
             WHERE task_id IN ({ID_SET_SQL});"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id_set_json(&ids)?])?;
        while let Some(row) = rows.next()? {
            let task_id: TaskId = row.get(0)?;
            lists.entry(task_id).or_default().insert(row.get(1)?);
        }
        Ok(lists)
    }

    /// Tag names per task.
    pub fn tags(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, BTreeSet<String>>> {
        let ids = unique_ids(task_ids);
        let mut tags = empty_map(&ids);
        if ids.is_empty() {
            return Ok(tags);
        }

        let sql = format!(
            "SELECT tt.task_id, t.name
             FROM task_tags tt
             INNER JOIN tags t ON t.tag_id = tt.tag_id
             WHERE tt.task_id IN ({ID_SET_SQL});"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id_set_json(&ids)?])?;
        while let Some(row) = rows.next()? {
            let task_id: TaskId = row.get(0)?;
            tags.entry(task_id).or_default().insert(row.get(1)?);
        }
        Ok(tags)
    }

    /// Decoded attributes per task.
    ///
    /// Fails with `UnsupportedType` naming the task when a stored kind tag is
    /// not one of the four known kinds.
    pub fn attributes(
        &self,
        task_ids: &[TaskId],
    ) -> RepoResult<HashMap<TaskId, BTreeMap<String, AttributeValue>>> {
        let ids = unique_ids(task_ids);
        let mut attributes: HashMap<TaskId, BTreeMap<String, AttributeValue>> =
            ids.iter().map(|id| (*id, BTreeMap::new())).collect();
        if ids.is_empty() {
            return Ok(attributes);
        }

        let sql = format!(
            "SELECT task_id, attr_key, attr_type, attr_value
             FROM task_attributes
             WHERE task_id IN ({ID_SET_SQL});"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id_set_json(&ids)?])?;
        while let Some(row) = rows.next()? {
            let task_id: TaskId = row.get("task_id")?;
            let kind: String = row.get("attr_type")?;
            let payload: String = row.get("attr_value")?;
            let value = AttributeValue::decode_tagged(&kind, &payload)
                .map_err(|err| RepoError::attribute(Some(task_id), err))?;
            attributes
                .entry(task_id)
                .or_default()
                .insert(row.get("attr_key")?, value);
        }
        Ok(attributes)
    }

    /// Children of each task (`to` ends of its PARENT edges).
    pub fn subtasks(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, BTreeSet<TaskId>>> {
        self.edge_groups(Relationship::Parent, EdgeEnd::From, task_ids)
    }

    /// Parent of each task, `None` for top-level tasks.
    pub fn parents(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, Option<TaskId>>> {
        let parents = self.edge_groups(Relationship::Parent, EdgeEnd::To, task_ids)?;
        Ok(parents
            .into_iter()
            .map(|(task_id, candidates)| (task_id, candidates.first().copied()))
            .collect())
    }

    /// Tasks each task is blocked by.
    pub fn dependencies(
        &self,
        task_ids: &[TaskId],
    ) -> RepoResult<HashMap<TaskId, BTreeSet<TaskId>>> {
        self.edge_groups(Relationship::Dependency, EdgeEnd::From, task_ids)
    }

    /// Tasks blocked by each task.
    pub fn dependents(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, BTreeSet<TaskId>>> {
        self.edge_groups(Relationship::Dependency, EdgeEnd::To, task_ids)
    }

    /// Every derived collection for each task.
    pub fn resolve_all(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, TaskRelations>> {
        let mut lists = self.lists(task_ids)?;
        let mut tags = self.tags(task_ids)?;
        let mut attributes = self.attributes(task_ids)?;
        let mut subtasks = self.subtasks(task_ids)?;
        let parents = self.parents(task_ids)?;
        let mut dependencies = self.dependencies(task_ids)?;
        let mut dependents = self.dependents(task_ids)?;

        Ok(parents
            .into_iter()
            .map(|(task_id, parent)| {
                let relations = TaskRelations {
                    lists: lists.remove(&task_id).unwrap_or_default(),
                    tags: tags.remove(&task_id).unwrap_or_default(),
                    attributes: attributes.remove(&task_id).unwrap_or_default(),
                    subtasks: subtasks.remove(&task_id).unwrap_or_default(),
                    parent,
                    dependencies: dependencies.remove(&task_id).unwrap_or_default(),
                    dependents: dependents.remove(&task_id).unwrap_or_default(),
                };
                (task_id, relations)
            })
            .collect())
    }

    /// Fills the derived collections of row-only task snapshots.
    pub fn hydrate(&self, mut tasks: Vec<Task>) -> RepoResult<Vec<Task>> {
        let ids: Vec<TaskId> = tasks.iter().map(|task| task.task_id).collect();
        let mut relations = self.resolve_all(&ids)?;
        for task in &mut tasks {
            let resolved = relations.remove(&task.task_id).unwrap_or_default();
            task.lists = resolved.lists;
            task.tags = resolved.tags;
            task.attributes = resolved.attributes;
            task.subtasks = resolved.subtasks;
            task.parent = resolved.parent;
            task.dependencies = resolved.dependencies;
            task.dependents = resolved.dependents;
        }
        Ok(tasks)
    }

    fn edge_groups(
        &self,
        kind: Relationship,
        matched: EdgeEnd,
        task_ids: &[TaskId],
    ) -> RepoResult<HashMap<TaskId, BTreeSet<TaskId>>> {
        let ids = unique_ids(task_ids);
        let mut groups = empty_map(&ids);
        if ids.is_empty() {
            return Ok(groups);
        }

        let (key_column, value_column) = matched.columns();
        let sql = format!(
            "SELECT {key_column}, {value_column}
             FROM task_relations
             WHERE {key_column} IN ({ID_SET_SQL})
               AND relationship = ?2;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id_set_json(&ids)?, kind.as_db()])?;
        while let Some(row) = rows.next()? {
            let key: TaskId = row.get(0)?;
            groups.entry(key).or_default().insert(row.get(1)?);
        }
        Ok(groups)
    }
}

fn empty_map<T: Ord>(ids: &[TaskId]) -> HashMap<TaskId, BTreeSet<T>> {
    ids.iter().map(|id| (*id, BTreeSet::new())).collect()
}
