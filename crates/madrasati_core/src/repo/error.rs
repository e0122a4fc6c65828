//! Repository error taxonomy.
//!
//! Storage failures never appear here: the store absorbs them. What remains
//! is what a caller can act on.

use crate::model::validation::ValidationError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Natural key already taken (exact, case-sensitive match).
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
        key: String,
    },
    Validation(ValidationError),
    /// Target id/grade/index does not exist (strict policy, or lookups that
    /// cannot proceed without their target).
    NotFound { entity: &'static str, id: String },
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey { entity, field, key } => {
                write!(f, "{entity} {field} `{key}` is already registered")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::DuplicateKey { .. } | Self::NotFound { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
