//! Account roles and credential handling.
//!
//! # Responsibility
//! - Store account secrets as salted hashes.
//! - Describe which natural key each role signs in with.
//!
//! # Invariants
//! - Authentication is `(natural key, secret) -> record`; absence is not an error.
//! - Administrator sign-in is not handled by the core.

pub mod password;

pub use password::PasswordHash;

use crate::model::parent::Parent;
use crate::model::student::Student;
use crate::model::teacher::Teacher;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Account roles backed by a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Teacher,
    Parent,
}

impl Role {
    /// Name of the natural key used as the sign-in identifier.
    pub fn identifier_field(self) -> &'static str {
        match self {
            Self::Student => "seat_number",
            Self::Teacher | Self::Parent => "username",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Parent => "parent",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "parent" => Ok(Self::Parent),
            other => Err(format!(
                "unsupported role `{other}`; expected student|teacher|parent"
            )),
        }
    }
}

/// Record returned by a successful sign-in.
#[derive(Debug, Clone, PartialEq)]
pub enum Account {
    Student(Student),
    Teacher(Teacher),
    Parent(Parent),
}

impl Account {
    pub fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Teacher(_) => Role::Teacher,
            Self::Parent(_) => Role::Parent,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Student(student) => &student.id,
            Self::Teacher(teacher) => &teacher.id,
            Self::Parent(parent) => &parent.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Student(student) => &student.name,
            Self::Teacher(teacher) => &teacher.name,
            Self::Parent(parent) => &parent.name,
        }
    }
}
