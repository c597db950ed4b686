//! Task snapshot and creation input.
//!
//! # Responsibility
//! - Carry the stored task row plus its derived collections.
//! - Expose the classification the journal views are built from.
//!
//! # Invariants
//! - Derived collections (lists, tags, attributes, relations) are filled by
//!   the batch resolver, never by row decoding.
//! - `Trashed` takes precedence over `Completed` in [`Task::state`].

use crate::model::attribute::AttributeValue;
use crate::model::task_list::ListId;
use crate::model::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type TaskId = i64;

/// Mutually exclusive classification of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Completed,
    Trashed,
}

/// Immutable task snapshot as returned by the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    /// Unique manual sort key among all tasks.
    pub position: i64,
    pub description: String,
    pub notes: Option<String>,
    /// Unbounded; 0 is neutral.
    pub priority: i64,
    pub creation_time: Timestamp,
    pub completion_time: Option<Timestamp>,
    pub due_time: Option<Timestamp>,
    pub start_time: Option<Timestamp>,
    pub is_trashed: bool,
    pub lists: BTreeSet<ListId>,
    pub tags: BTreeSet<String>,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub subtasks: BTreeSet<TaskId>,
    pub parent: Option<TaskId>,
    /// Tasks this task is blocked by.
    pub dependencies: BTreeSet<TaskId>,
    /// Tasks blocked by this task.
    pub dependents: BTreeSet<TaskId>,
}

impl Task {
    /// Builds a snapshot carrying only row fields; derived collections start
    /// empty.
    pub fn from_row_fields(task_id: TaskId, position: i64, creation_time: Timestamp) -> Self {
        Self {
            task_id,
            position,
            description: String::new(),
            notes: None,
            priority: 0,
            creation_time,
            completion_time: None,
            due_time: None,
            start_time: None,
            is_trashed: false,
            lists: BTreeSet::new(),
            tags: BTreeSet::new(),
            attributes: BTreeMap::new(),
            subtasks: BTreeSet::new(),
            parent: None,
            dependencies: BTreeSet::new(),
            dependents: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> TaskState {
        if self.is_trashed {
            TaskState::Trashed
        } else if self.completion_time.is_some() {
            TaskState::Completed
        } else {
            TaskState::Pending
        }
    }

    /// Whether the task is not the subtask of any other task.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether any task still blocks this one.
    pub fn is_blocked(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// Input for [`crate::Journal::add_task`].
///
/// `tags`, `attributes` and `lists` exist so callers get a loud
/// `NotImplemented` error instead of silently dropped data; attach those
/// with the dedicated journal operations after creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub description: String,
    pub notes: Option<String>,
    pub priority: i64,
    /// Defaults to the current time.
    pub creation_time: Option<Timestamp>,
    pub completion_time: Option<Timestamp>,
    pub due_time: Option<Timestamp>,
    pub start_time: Option<Timestamp>,
    pub is_trashed: bool,
    pub tags: Vec<String>,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub lists: Vec<ListId>,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}
