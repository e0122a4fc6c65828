//! Student record and score bands.
//!
//! # Invariants
//! - `seat_number` is the sign-in handle and is unique across students.
//! - Every stored score is within `0..=100`.
//! - `parent_id` is a weak reference; it is never validated against parents.

use super::catalog::{GradeLevel, Subject};
use super::validation::{require_text, ValidationError, MAX_SCORE};
use super::{new_entity_id, EntityId};
use crate::auth::PasswordHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: EntityId,
    pub name: String,
    pub seat_number: String,
    pub password: PasswordHash,
    pub grade_level: GradeLevel,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    /// Latest score per subject.
    #[serde(default)]
    pub grades: BTreeMap<Subject, u8>,
}

impl Student {
    /// Creates an unlinked student with no grades and a generated id.
    pub fn new(
        name: impl Into<String>,
        seat_number: impl Into<String>,
        grade_level: GradeLevel,
        password: &str,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            seat_number: seat_number.into(),
            password: PasswordHash::new(password),
            grade_level,
            parent_id: None,
            grades: BTreeMap::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("seat number", &self.seat_number)?;
        if let Some(score) = self
            .grades
            .values()
            .copied()
            .find(|score| i32::from(*score) > MAX_SCORE)
        {
            return Err(ValidationError::ScoreOutOfRange(i32::from(score)));
        }
        Ok(())
    }

    pub fn score(&self, subject: Subject) -> Option<u8> {
        self.grades.get(&subject).copied()
    }

    pub fn is_child_of(&self, parent_id: &str) -> bool {
        self.parent_id.as_deref() == Some(parent_id)
    }
}

/// Coarse performance band shown next to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreBand {
    Fail,
    Pass,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::Excellent,
            75..=89 => Self::Good,
            50..=74 => Self::Pass,
            _ => Self::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ScoreBand, Student};
    use crate::model::catalog::{GradeLevel, Subject};

    #[test]
    fn score_band_thresholds() {
        assert_eq!(ScoreBand::of(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::of(90), ScoreBand::Excellent);
        assert_eq!(ScoreBand::of(89), ScoreBand::Good);
        assert_eq!(ScoreBand::of(75), ScoreBand::Good);
        assert_eq!(ScoreBand::of(74), ScoreBand::Pass);
        assert_eq!(ScoreBand::of(50), ScoreBand::Pass);
        assert_eq!(ScoreBand::of(49), ScoreBand::Fail);
    }

    #[test]
    fn validate_rejects_persisted_score_above_range() {
        let mut student = Student::new("Ahmed", "1001", GradeLevel::First, "123");
        student.grades.insert(Subject::Math, 101);
        assert!(student.validate().is_err());
    }

    #[test]
    fn serialized_grades_use_subject_labels() {
        let mut student = Student::new("Ahmed", "1001", GradeLevel::First, "123");
        student.grades.insert(Subject::SocialStudies, 75);
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["grades"]["Social Studies"], 75);
        assert_eq!(json["grade_level"], "Grade 1");
    }
}
