//! Journal domain model.
//!
//! # Responsibility
//! - Define the entity snapshots handed out by the journal facade.
//! - Define the closed value types used at the API boundary (views, tag
//!   references, attribute values, relationship kinds, patches).
//!
//! # Invariants
//! - Entity snapshots are hydrated from store rows plus a separate batch
//!   resolution step; a snapshot never reflects two points in time.
//! - Identifiers are stable integers assigned by the store layer.

pub mod attribute;
pub mod patch;
pub mod relation;
pub mod tag;
pub mod task;
pub mod task_list;
pub mod timestamp;
pub mod view;
