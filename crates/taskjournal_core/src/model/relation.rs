//! Directed relationship kinds between tasks.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Kind of a directed `task_from -> task_to` edge.
///
/// - `Parent`: `to` is a subtask of `from`.
/// - `Dependency`: `from` is blocked by `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Parent,
    Dependency,
}

impl Relationship {
    /// Token persisted in `task_relations.relationship`.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Parent => "parent_of",
            Self::Dependency => "blocked_by",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "parent_of" => Some(Self::Parent),
            "blocked_by" => Some(Self::Dependency),
            _ => None,
        }
    }
}

impl Display for Relationship {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}
