//! Parent (guardian) record.
//!
//! Children are not stored here; they point back via `Student::parent_id`.

use super::validation::{require_text, ValidationError};
use super::{new_entity_id, EntityId};
use crate::auth::PasswordHash;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub id: EntityId,
    pub name: String,
    pub username: String,
    pub password: PasswordHash,
}

impl Parent {
    pub fn new(name: impl Into<String>, username: impl Into<String>, password: &str) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            username: username.into(),
            password: PasswordHash::new(password),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("username", &self.username)
    }
}

/// Splits the comma-separated child seat list collected at parent sign-up.
///
/// Blank entries are dropped and surrounding whitespace is trimmed.
pub fn parse_seat_numbers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|seat| !seat.is_empty())
        .map(str::to_string)
        .collect()
}
