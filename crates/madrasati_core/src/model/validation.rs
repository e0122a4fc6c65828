//! Validation failures for portal entities.
//!
//! Every write path in the repository layer runs entity validation before
//! touching the store, so these errors are enforced for all callers.

use crate::model::catalog::Weekday;
use crate::model::notification::NotificationKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Highest score a grade entry may hold.
pub const MAX_SCORE: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    BlankField(&'static str),
    /// Score outside `0..=100`.
    ScoreOutOfRange(i32),
    /// Teacher registered without any grade level.
    NoGradeLevels,
    /// Label does not belong to the named closed catalog.
    UnknownLabel { kind: &'static str, value: String },
    /// `target_id` presence or shape does not fit the notification kind.
    TargetMismatch {
        kind: NotificationKind,
        target_id: Option<String>,
    },
    /// Persisted week lists its days out of `Weekday::ALL` order.
    DayOutOfOrder { expected: Weekday, found: Weekday },
    /// Teacher tried to address a grade they do not teach.
    GradeNotTaught { teacher_id: String, grade: String },
    /// Persisted table lists the same natural key on two rows.
    DuplicateKey { field: &'static str, key: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::ScoreOutOfRange(score) => {
                write!(f, "score {score} is outside the allowed range 0..={MAX_SCORE}")
            }
            Self::NoGradeLevels => write!(f, "teacher must teach at least one grade level"),
            Self::UnknownLabel { kind, value } => write!(f, "unknown {kind} `{value}`"),
            Self::TargetMismatch { kind, target_id } => match target_id {
                Some(target) => write!(f, "{kind} notification cannot target `{target}`"),
                None => write!(f, "{kind} notification requires a target"),
            },
            Self::DayOutOfOrder { expected, found } => {
                write!(f, "schedule lists {found:?} where {expected:?} belongs")
            }
            Self::GradeNotTaught { teacher_id, grade } => {
                write!(f, "teacher {teacher_id} does not teach {grade}")
            }
            Self::DuplicateKey { field, key } => write!(f, "{field} `{key}` appears more than once"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects values that are empty after trimming.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

/// Converts a caller-supplied score into the stored representation.
pub fn checked_score(score: i32) -> Result<u8, ValidationError> {
    if !(0..=MAX_SCORE).contains(&score) {
        return Err(ValidationError::ScoreOutOfRange(score));
    }
    u8::try_from(score).map_err(|_| ValidationError::ScoreOutOfRange(score))
}
