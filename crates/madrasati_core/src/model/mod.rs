//! Portal domain model.
//!
//! # Responsibility
//! - Define the records persisted in the six portal tables.
//! - Own per-entity validation so every write path shares one rule set.
//!
//! # Invariants
//! - Every record is identified by an immutable opaque string id.
//! - Natural keys (seat number, username) are distinct from ids.

pub mod book;
pub mod catalog;
pub mod notification;
pub mod parent;
pub mod schedule;
pub mod student;
pub mod teacher;
pub mod validation;

use uuid::Uuid;

/// Opaque, immutable record identifier.
pub type EntityId = String;

/// Generates a fresh identifier for a newly created record.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}
