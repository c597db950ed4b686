//! Core use-case services.
//!
//! # Responsibility
//! - Compose repositories into the journal's public operations.
//! - Keep presentation layers decoupled from storage details.

pub mod journal;
