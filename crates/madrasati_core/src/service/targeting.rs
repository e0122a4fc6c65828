//! Notification visibility rules.
//!
//! # Invariants
//! - `GENERAL` is visible to every viewer.
//! - `PARENT_SPECIFIC` is visible only to the addressed parent.
//! - `GRADE`/`HOMEWORK` are visible to a parent with a child in the grade and
//!   to students of that grade.
//! - Results are newest first, i.e. reverse insertion order.

use crate::model::catalog::GradeLevel;
use crate::model::notification::{Notification, NotificationKind};
use crate::model::EntityId;
use std::collections::BTreeSet;

/// Who is reading the notification feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Parent {
        parent_id: EntityId,
        /// Grades of every linked child.
        child_grades: BTreeSet<GradeLevel>,
    },
    StudentGrade(GradeLevel),
}

impl Viewer {
    pub fn parent(
        parent_id: impl Into<EntityId>,
        child_grades: impl IntoIterator<Item = GradeLevel>,
    ) -> Self {
        Self::Parent {
            parent_id: parent_id.into(),
            child_grades: child_grades.into_iter().collect(),
        }
    }
}

pub fn is_visible(viewer: &Viewer, notification: &Notification) -> bool {
    match notification.kind {
        NotificationKind::General => true,
        NotificationKind::ParentSpecific => match viewer {
            Viewer::Parent { parent_id, .. } => {
                notification.target_id.as_deref() == Some(parent_id.as_str())
            }
            Viewer::StudentGrade(_) => false,
        },
        NotificationKind::Grade | NotificationKind::Homework => {
            let Some(grade) = notification.target_grade() else {
                return false;
            };
            match viewer {
                Viewer::Parent { child_grades, .. } => child_grades.contains(&grade),
                Viewer::StudentGrade(own) => *own == grade,
            }
        }
    }
}

/// Filters `notifications` (insertion order) for `viewer`, newest first.
pub fn visible_notifications(viewer: &Viewer, notifications: &[Notification]) -> Vec<Notification> {
    notifications
        .iter()
        .rev()
        .filter(|notification| is_visible(viewer, notification))
        .cloned()
        .collect()
}
