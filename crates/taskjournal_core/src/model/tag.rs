//! Tag entity and lookup key.

use serde::{Deserialize, Serialize};

pub type TagId = i64;

/// Named label attachable to many tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTag {
    pub tag_id: TagId,
    /// Unique across the journal.
    pub name: String,
    pub color: Option<String>,
}

/// Tag lookup by identifier or by unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRef {
    Id(TagId),
    Name(String),
}

impl From<TagId> for TagRef {
    fn from(value: TagId) -> Self {
        Self::Id(value)
    }
}

impl From<&str> for TagRef {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for TagRef {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}
