//! Textbook metadata. File contents are never stored.

use super::catalog::GradeLevel;
use super::validation::{require_text, ValidationError};
use super::{new_entity_id, EntityId};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub grade_level: GradeLevel,
    /// Name of the uploaded file, kept for display only.
    pub file_name: String,
    pub date_added: NaiveDate,
}

impl Book {
    /// Creates book metadata dated today (local time).
    pub fn new(title: impl Into<String>, grade_level: GradeLevel, file_name: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            title: title.into(),
            grade_level,
            file_name: file_name.into(),
            date_added: Local::now().date_naive(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("id", &self.id)?;
        require_text("title", &self.title)?;
        require_text("file name", &self.file_name)
    }
}
