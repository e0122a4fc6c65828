//! Notifications and their targeting fields.
//!
//! # Invariants
//! - `GENERAL` carries no target.
//! - `GRADE` and `HOMEWORK` target a grade level label.
//! - `PARENT_SPECIFIC` targets a non-blank parent id.

use super::catalog::GradeLevel;
use super::validation::{require_text, ValidationError};
use super::{new_entity_id, EntityId};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    General,
    Grade,
    ParentSpecific,
    Homework,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Grade => "GRADE",
            Self::ParentSpecific => "PARENT_SPECIFIC",
            Self::Homework => "HOMEWORK",
        }
    }

    /// Kinds whose `target_id` is a grade level.
    pub fn targets_grade(self) -> bool {
        matches!(self, Self::Grade | Self::Homework)
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub title: String,
    pub message: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Grade label or parent id, depending on `kind`.
    #[serde(default)]
    pub target_id: Option<String>,
    pub sender: String,
}

impl Notification {
    /// School-wide announcement dated today.
    pub fn general(
        title: impl Into<String>,
        message: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self::build(NotificationKind::General, None, title, message, sender)
    }

    /// Announcement for every family with a child in `grade`.
    pub fn for_grade(
        grade: GradeLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self::build(
            NotificationKind::Grade,
            Some(grade.label().to_string()),
            title,
            message,
            sender,
        )
    }

    /// Homework assignment for `grade`.
    pub fn homework(
        grade: GradeLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self::build(
            NotificationKind::Homework,
            Some(grade.label().to_string()),
            title,
            message,
            sender,
        )
    }

    /// Private message for one parent.
    pub fn for_parent(
        parent_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self::build(
            NotificationKind::ParentSpecific,
            Some(parent_id.into()),
            title,
            message,
            sender,
        )
    }

    fn build(
        kind: NotificationKind,
        target_id: Option<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            title: title.into(),
            message: message.into(),
            date: Local::now().date_naive(),
            kind,
            target_id,
            sender: sender.into(),
        }
    }

    /// Grade addressed by a `GRADE`/`HOMEWORK` notification.
    pub fn target_grade(&self) -> Option<GradeLevel> {
        if !self.kind.targets_grade() {
            return None;
        }
        self.target_id.as_deref()?.parse().ok()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("id", &self.id)?;
        require_text("title", &self.title)?;
        require_text("message", &self.message)?;

        let target_ok = match self.kind {
            NotificationKind::General => self.target_id.is_none(),
            NotificationKind::Grade | NotificationKind::Homework => self.target_grade().is_some(),
            NotificationKind::ParentSpecific => self
                .target_id
                .as_deref()
                .is_some_and(|target| !target.trim().is_empty()),
        };
        if !target_ok {
            return Err(ValidationError::TargetMismatch {
                kind: self.kind,
                target_id: self.target_id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Notification, NotificationKind};
    use crate::model::catalog::GradeLevel;

    #[test]
    fn kind_serializes_in_screaming_case() {
        let json = serde_json::to_string(&NotificationKind::ParentSpecific).unwrap();
        assert_eq!(json, r#""PARENT_SPECIFIC""#);
    }

    #[test]
    fn general_with_target_is_rejected() {
        let mut notification = Notification::general("Welcome", "New term", "Office");
        assert!(notification.validate().is_ok());

        notification.target_id = Some("Grade 1".to_string());
        assert!(notification.validate().is_err());
    }

    #[test]
    fn grade_target_must_be_a_grade_label() {
        let mut notification =
            Notification::for_grade(GradeLevel::Second, "Trip", "Thursday trip", "Office");
        assert_eq!(notification.target_grade(), Some(GradeLevel::Second));
        assert!(notification.validate().is_ok());

        notification.target_id = Some("p1".to_string());
        assert!(notification.validate().is_err());
    }
}
