//! Partial-update inputs for tasks, lists and tags.
//!
//! # Invariants
//! - A `None` field leaves the stored value untouched.
//! - For nullable columns, `Some(None)` clears the value and
//!   `Some(Some(v))` replaces it.

use crate::model::tag::TaskTag;
use crate::model::task::Task;
use crate::model::task_list::TaskList;
use crate::model::timestamp::Timestamp;

/// Field changes for one task row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub description: Option<String>,
    pub priority: Option<i64>,
    pub creation_time: Option<Timestamp>,
    pub is_trashed: Option<bool>,
    pub notes: Option<Option<String>>,
    pub completion_time: Option<Option<Timestamp>>,
    pub due_time: Option<Option<Timestamp>>,
    pub start_time: Option<Option<Timestamp>>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn priority(mut self, value: i64) -> Self {
        self.priority = Some(value);
        self
    }

    pub fn creation_time(mut self, value: Timestamp) -> Self {
        self.creation_time = Some(value);
        self
    }

    pub fn trashed(mut self, value: bool) -> Self {
        self.is_trashed = Some(value);
        self
    }

    pub fn notes(mut self, value: Option<String>) -> Self {
        self.notes = Some(value);
        self
    }

    pub fn completion_time(mut self, value: Option<Timestamp>) -> Self {
        self.completion_time = Some(value);
        self
    }

    pub fn due_time(mut self, value: Option<Timestamp>) -> Self {
        self.due_time = Some(value);
        self
    }

    pub fn start_time(mut self, value: Option<Timestamp>) -> Self {
        self.start_time = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the present fields to a task's row values.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(value) = &self.description {
            task.description = value.clone();
        }
        if let Some(value) = self.priority {
            task.priority = value;
        }
        if let Some(value) = self.creation_time {
            task.creation_time = value;
        }
        if let Some(value) = self.is_trashed {
            task.is_trashed = value;
        }
        if let Some(value) = &self.notes {
            task.notes = value.clone();
        }
        if let Some(value) = self.completion_time {
            task.completion_time = value;
        }
        if let Some(value) = self.due_time {
            task.due_time = value;
        }
        if let Some(value) = self.start_time {
            task.start_time = value;
        }
    }
}

/// Field changes for one list row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPatch {
    pub name: Option<String>,
    pub icon: Option<Option<String>>,
}

impl ListPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn icon(mut self, value: Option<String>) -> Self {
        self.icon = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.icon.is_none()
    }

    pub fn apply_to(&self, list: &mut TaskList) {
        if let Some(value) = &self.name {
            list.name = value.clone();
        }
        if let Some(value) = &self.icon {
            list.icon = value.clone();
        }
    }
}

/// Field changes for one tag row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<Option<String>>,
}

impl TagPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn color(mut self, value: Option<String>) -> Self {
        self.color = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }

    pub fn apply_to(&self, tag: &mut TaskTag) {
        if let Some(value) = &self.name {
            tag.name = value.clone();
        }
        if let Some(value) = &self.color {
            tag.color = value.clone();
        }
    }
}
