//! Closed school catalogs: grade levels, subjects, school days and schedule cells.
//!
//! # Invariants
//! - Serialized form of every catalog value is its display label, so persisted
//!   documents stay readable and `target_id` can carry a grade label verbatim.
//! - Parsing accepts exact labels only (case-sensitive).

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Number of school days in a weekly schedule.
pub const DAYS_PER_WEEK: usize = 5;
/// Number of periods in one school day.
pub const PERIODS_PER_DAY: usize = 6;

/// Label persisted for an unassigned schedule slot.
pub const EMPTY_SLOT_LABEL: &str = "---";
/// Label persisted for a rest period.
pub const REST_LABEL: &str = "Rest";

/// One of the six school-year cohorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GradeLevel {
    #[serde(rename = "Grade 1")]
    First,
    #[serde(rename = "Grade 2")]
    Second,
    #[serde(rename = "Grade 3")]
    Third,
    #[serde(rename = "Grade 4")]
    Fourth,
    #[serde(rename = "Grade 5")]
    Fifth,
    #[serde(rename = "Grade 6")]
    Sixth,
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 6] = [
        Self::First,
        Self::Second,
        Self::Third,
        Self::Fourth,
        Self::Fifth,
        Self::Sixth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::First => "Grade 1",
            Self::Second => "Grade 2",
            Self::Third => "Grade 3",
            Self::Fourth => "Grade 4",
            Self::Fifth => "Grade 5",
            Self::Sixth => "Grade 6",
        }
    }
}

impl Display for GradeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GradeLevel {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|grade| grade.label() == value)
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "grade level",
                value: value.to_string(),
            })
    }
}

/// Taught subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subject {
    Quran,
    Math,
    Science,
    Arabic,
    English,
    Art,
    #[serde(rename = "Social Studies")]
    SocialStudies,
    #[serde(rename = "Physical Education")]
    PhysicalEducation,
}

impl Subject {
    pub const ALL: [Subject; 8] = [
        Self::Quran,
        Self::Math,
        Self::Science,
        Self::Arabic,
        Self::English,
        Self::Art,
        Self::SocialStudies,
        Self::PhysicalEducation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Quran => "Quran",
            Self::Math => "Math",
            Self::Science => "Science",
            Self::Arabic => "Arabic",
            Self::English => "English",
            Self::Art => "Art",
            Self::SocialStudies => "Social Studies",
            Self::PhysicalEducation => "Physical Education",
        }
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|subject| subject.label() == value)
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "subject",
                value: value.to_string(),
            })
    }
}

/// School days, Sunday through Thursday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
}

impl Weekday {
    pub const ALL: [Weekday; DAYS_PER_WEEK] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
    ];

    /// Maps a zero-based day index to a school day.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Content of one schedule cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    Subject(Subject),
    Rest,
    #[default]
    Empty,
}

impl Period {
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Subject(subject) => subject.label(),
            Self::Rest => REST_LABEL,
            Self::Empty => EMPTY_SLOT_LABEL,
        }
    }
}

impl From<Subject> for Period {
    fn from(value: Subject) -> Self {
        Self::Subject(value)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            EMPTY_SLOT_LABEL => Ok(Self::Empty),
            REST_LABEL => Ok(Self::Rest),
            other => other
                .parse::<Subject>()
                .map(Self::Subject)
                .map_err(|_| ValidationError::UnknownLabel {
                    kind: "schedule period",
                    value: other.to_string(),
                }),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.label().to_string()
    }
}
