//! Student repository contract and store-backed implementation.
//!
//! # Invariants
//! - `seat_number` is unique across students (exact match).
//! - Grade updates merge one subject and preserve every other subject.
//! - Scores are range-checked here, not only at the caller.

use super::{handle_missing, RepoError, RepoResult};
use crate::model::catalog::{GradeLevel, Subject};
use crate::model::student::Student;
use crate::model::validation::checked_score;
use crate::model::EntityId;
use crate::store::{Store, Table};
use log::{debug, info};

/// Filters for student listings. Empty query lists everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentQuery {
    pub grade: Option<GradeLevel>,
    pub parent_id: Option<EntityId>,
}

impl StudentQuery {
    pub fn by_grade(grade: GradeLevel) -> Self {
        Self {
            grade: Some(grade),
            ..Self::default()
        }
    }

    pub fn by_parent(parent_id: impl Into<EntityId>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::default()
        }
    }

    fn matches(&self, student: &Student) -> bool {
        self.grade.map_or(true, |grade| student.grade_level == grade)
            && self
                .parent_id
                .as_deref()
                .map_or(true, |parent_id| student.is_child_of(parent_id))
    }
}

pub trait StudentRepository {
    /// Appends a new student; rejects a taken seat number.
    fn register_student(&mut self, student: Student) -> RepoResult<Student>;
    fn login_student(&mut self, seat_number: &str, password: &str) -> RepoResult<Option<Student>>;
    fn get_student(&mut self, id: &str) -> RepoResult<Option<Student>>;
    /// Lists matching students in registration order.
    fn list_students(&mut self, query: &StudentQuery) -> RepoResult<Vec<Student>>;
    /// Sets one subject score, keeping the others.
    fn update_grade(&mut self, student_id: &str, subject: Subject, score: i32) -> RepoResult<()>;
    /// Points every student whose seat number resolves at `parent_id`.
    ///
    /// Returns the ids of linked students; unresolved seats are skipped.
    fn link_parent(&mut self, parent_id: &str, seat_numbers: &[String])
        -> RepoResult<Vec<EntityId>>;
}

pub struct StoreStudentRepository<'s> {
    store: &'s mut Store,
}

impl<'s> StoreStudentRepository<'s> {
    pub fn new(store: &'s mut Store) -> Self {
        Self { store }
    }
}

impl StudentRepository for StoreStudentRepository<'_> {
    fn register_student(&mut self, student: Student) -> RepoResult<Student> {
        student.validate()?;
        self.store.refresh(Table::Students);

        if self
            .store
            .students()
            .iter()
            .any(|existing| existing.seat_number == student.seat_number)
        {
            info!(
                "event=student_register module=repo status=rejected reason=duplicate_seat_number"
            );
            return Err(RepoError::DuplicateKey {
                entity: "student",
                field: "seat number",
                key: student.seat_number,
            });
        }

        self.store.students_mut().push(student.clone());
        self.store.commit(Table::Students)?;
        info!(
            "event=student_register module=repo status=ok student_id={} grade=\"{}\"",
            student.id, student.grade_level
        );
        Ok(student)
    }

    fn login_student(&mut self, seat_number: &str, password: &str) -> RepoResult<Option<Student>> {
        self.store.refresh(Table::Students);
        let found = self
            .store
            .students()
            .iter()
            .find(|student| student.seat_number == seat_number && student.password.verify(password))
            .cloned();
        debug!(
            "event=student_login module=repo status={}",
            if found.is_some() { "ok" } else { "rejected" }
        );
        Ok(found)
    }

    fn get_student(&mut self, id: &str) -> RepoResult<Option<Student>> {
        self.store.refresh(Table::Students);
        Ok(self
            .store
            .students()
            .iter()
            .find(|student| student.id == id)
            .cloned())
    }

    fn list_students(&mut self, query: &StudentQuery) -> RepoResult<Vec<Student>> {
        self.store.refresh(Table::Students);
        Ok(self
            .store
            .students()
            .iter()
            .filter(|student| query.matches(student))
            .cloned()
            .collect())
    }

    fn update_grade(&mut self, student_id: &str, subject: Subject, score: i32) -> RepoResult<()> {
        let score = checked_score(score)?;
        self.store.refresh(Table::Students);

        let Some(student) = self
            .store
            .students_mut()
            .iter_mut()
            .find(|student| student.id == student_id)
        else {
            return handle_missing(self.store, "student_grade_update", "student", student_id);
        };
        student.grades.insert(subject, score);

        self.store.commit(Table::Students)?;
        info!(
            "event=student_grade_update module=repo status=ok student_id={} subject=\"{}\"",
            student_id, subject
        );
        Ok(())
    }

    fn link_parent(
        &mut self,
        parent_id: &str,
        seat_numbers: &[String],
    ) -> RepoResult<Vec<EntityId>> {
        self.store.refresh(Table::Students);

        let mut linked = Vec::new();
        for seat_number in seat_numbers {
            match self
                .store
                .students_mut()
                .iter_mut()
                .find(|student| &student.seat_number == seat_number)
            {
                Some(student) => {
                    student.parent_id = Some(parent_id.to_string());
                    linked.push(student.id.clone());
                }
                None => debug!(
                    "event=parent_link module=repo status=skipped reason=unknown_seat_number"
                ),
            }
        }

        if !linked.is_empty() {
            self.store.commit(Table::Students)?;
        }
        info!(
            "event=parent_link module=repo status=ok parent_id={} linked={} requested={}",
            parent_id,
            linked.len(),
            seat_numbers.len()
        );
        Ok(linked)
    }
}
