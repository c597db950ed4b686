//! Data layer of a personal task journal.
//!
//! Tasks, user lists, tags, typed attributes and task relationships live in
//! one SQLite store; [`Journal`] is the only handle callers need.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::attribute::{AttributeError, AttributeKind, AttributeValue};
pub use model::patch::{ListPatch, TagPatch, TaskPatch};
pub use model::relation::Relationship;
pub use model::tag::{TagId, TagRef, TaskTag};
pub use model::task::{NewTask, Task, TaskId, TaskState};
pub use model::task_list::{ListId, TaskList};
pub use model::timestamp::Timestamp;
pub use model::view::{ListView, ViewParseError};
pub use repo::resolver::{RelationResolver, TaskRelations};
pub use repo::{EntityRef, RepoError, RepoResult};
pub use service::journal::Journal;

/// Version of the `taskjournal_core` build linked into the caller.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
