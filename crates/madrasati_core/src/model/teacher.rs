//! Teacher record.

use super::catalog::{GradeLevel, Subject};
use super::validation::{require_text, ValidationError};
use super::{new_entity_id, EntityId};
use crate::auth::PasswordHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: EntityId,
    pub name: String,
    /// Unique sign-in handle.
    pub username: String,
    pub password: PasswordHash,
    pub subject: Subject,
    pub grade_levels: BTreeSet<GradeLevel>,
}

impl Teacher {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        subject: Subject,
        grade_levels: impl IntoIterator<Item = GradeLevel>,
        password: &str,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            username: username.into(),
            password: PasswordHash::new(password),
            subject,
            grade_levels: grade_levels.into_iter().collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("username", &self.username)?;
        if self.grade_levels.is_empty() {
            return Err(ValidationError::NoGradeLevels);
        }
        Ok(())
    }

    pub fn teaches(&self, grade: GradeLevel) -> bool {
        self.grade_levels.contains(&grade)
    }
}
