//! Repository error taxonomy shared by every journal store operation.

use crate::db::DbError;
use crate::model::attribute::AttributeError;
use crate::model::relation::Relationship;
use crate::model::tag::TagId;
use crate::model::task::TaskId;
use crate::model::task_list::ListId;
use crate::model::view::ViewParseError;
use std::convert::Infallible;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Row addressed by a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Task(TaskId),
    List(ListId),
    Tag(TagId),
    Attribute {
        task_id: TaskId,
        key: String,
    },
    Relation {
        from: TaskId,
        to: TaskId,
        kind: Relationship,
    },
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Task(id) => write!(f, "task {id}"),
            Self::List(id) => write!(f, "list {id}"),
            Self::Tag(id) => write!(f, "tag {id}"),
            Self::Attribute { task_id, key } => write!(f, "attribute `{key}` of task {task_id}"),
            Self::Relation { from, to, kind } => write!(f, "relation {from} -{kind}-> {to}"),
        }
    }
}

/// Error for journal persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Caller passed an argument the operation cannot interpret.
    InvalidArgument(String),
    /// Attribute kind outside `str|int|float|bool`.
    ///
    /// `task_id` is set when the bad kind was read back from storage.
    UnsupportedType {
        task_id: Option<TaskId>,
        kind: String,
    },
    /// Operation shape is deliberately unsupported.
    NotImplemented(&'static str),
    NotFound(EntityRef),
    /// A child may have only one parent.
    ParentConflict {
        child: TaskId,
        existing_parent: TaskId,
    },
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl RepoError {
    /// Maps a codec failure, attaching the owning task when known.
    pub fn attribute(task_id: Option<TaskId>, err: AttributeError) -> Self {
        match err {
            AttributeError::UnsupportedKind(kind) => Self::UnsupportedType { task_id, kind },
            AttributeError::InvalidPayload { kind, payload } => {
                let owner = task_id.map_or_else(String::new, |id| format!(" of task {id}"));
                Self::InvalidData(format!(
                    "attribute payload `{payload}`{owner} is not a valid `{kind}`"
                ))
            }
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::UnsupportedType {
                task_id: Some(task_id),
                kind,
            } => write!(
                f,
                "task {task_id} has attribute of unsupported kind `{kind}`; expected str|int|float|bool"
            ),
            Self::UnsupportedType {
                task_id: None,
                kind,
            } => write!(
                f,
                "attribute values must be str|int|float|bool, not `{kind}`"
            ),
            Self::NotImplemented(what) => write!(f, "not implemented: {what}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::ParentConflict {
                child,
                existing_parent,
            } => write!(f, "task {child} already has parent {existing_parent}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "journal store requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted journal data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<AttributeError> for RepoError {
    fn from(value: AttributeError) -> Self {
        Self::attribute(None, value)
    }
}

impl From<Infallible> for RepoError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

impl From<ViewParseError> for RepoError {
    fn from(value: ViewParseError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}
