//! User-defined task lists.

use serde::{Deserialize, Serialize};

pub type ListId = i64;

/// Named grouping of tasks, independent of the relation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub list_id: ListId,
    pub name: String,
    /// Icon reference understood by the presentation layer.
    pub icon: Option<String>,
    /// Unique manual sort key among lists.
    pub position: i64,
}
