//! Repository layer over the portal store.
//!
//! # Responsibility
//! - Provide typed CRUD and query contracts per entity.
//! - Enforce uniqueness, validation and the not-found policy in one place.
//!
//! # Invariants
//! - Every operation refreshes the tables it reads before trusting the cache.
//! - Write paths validate before mutating the cache and commit right after.
//! - A rejected write leaves the persisted table unchanged.

pub mod book_repo;
pub mod error;
pub mod notification_repo;
pub mod parent_repo;
pub mod schedule_repo;
pub mod student_repo;
pub mod teacher_repo;

pub use error::{RepoError, RepoResult};

use crate::config::NotFoundPolicy;
use crate::store::Store;
use log::warn;

/// Applies the store's not-found policy to a mutation whose target is missing.
pub(crate) fn handle_missing(
    store: &Store,
    event: &str,
    entity: &'static str,
    id: impl Into<String>,
) -> RepoResult<()> {
    let id = id.into();
    match store.not_found_policy() {
        NotFoundPolicy::Lenient => {
            warn!(
                "event={} module=repo status=not_found_ignored entity={} id={}",
                event, entity, id
            );
            Ok(())
        }
        NotFoundPolicy::Strict => {
            warn!(
                "event={} module=repo status=not_found entity={} id={}",
                event, entity, id
            );
            Err(RepoError::NotFound { entity, id })
        }
    }
}
