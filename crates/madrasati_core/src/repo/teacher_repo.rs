//! Teacher repository contract and store-backed implementation.
//!
//! # Invariants
//! - `username` is unique across teachers.
//! - A teacher always teaches at least one grade level.

use super::{RepoError, RepoResult};
use crate::model::teacher::Teacher;
use crate::store::{Store, Table};
use log::{debug, info};

pub trait TeacherRepository {
    fn register_teacher(&mut self, teacher: Teacher) -> RepoResult<Teacher>;
    fn login_teacher(&mut self, username: &str, password: &str) -> RepoResult<Option<Teacher>>;
    fn get_teacher(&mut self, id: &str) -> RepoResult<Option<Teacher>>;
    /// Lists teachers in registration order.
    fn list_teachers(&mut self) -> RepoResult<Vec<Teacher>>;
}

pub struct StoreTeacherRepository<'s> {
    store: &'s mut Store,
}

impl<'s> StoreTeacherRepository<'s> {
    pub fn new(store: &'s mut Store) -> Self {
        Self { store }
    }
}

impl TeacherRepository for StoreTeacherRepository<'_> {
    fn register_teacher(&mut self, teacher: Teacher) -> RepoResult<Teacher> {
        teacher.validate()?;
        self.store.refresh(Table::Teachers);

        if self
            .store
            .teachers()
            .iter()
            .any(|existing| existing.username == teacher.username)
        {
            info!("event=teacher_register module=repo status=rejected reason=duplicate_username");
            return Err(RepoError::DuplicateKey {
                entity: "teacher",
                field: "username",
                key: teacher.username,
            });
        }

        self.store.teachers_mut().push(teacher.clone());
        self.store.commit(Table::Teachers)?;
        info!(
            "event=teacher_register module=repo status=ok teacher_id={} grade_count={}",
            teacher.id,
            teacher.grade_levels.len()
        );
        Ok(teacher)
    }

    fn login_teacher(&mut self, username: &str, password: &str) -> RepoResult<Option<Teacher>> {
        self.store.refresh(Table::Teachers);
        let found = self
            .store
            .teachers()
            .iter()
            .find(|teacher| teacher.username == username && teacher.password.verify(password))
            .cloned();
        debug!(
            "event=teacher_login module=repo status={}",
            if found.is_some() { "ok" } else { "rejected" }
        );
        Ok(found)
    }

    fn get_teacher(&mut self, id: &str) -> RepoResult<Option<Teacher>> {
        self.store.refresh(Table::Teachers);
        Ok(self
            .store
            .teachers()
            .iter()
            .find(|teacher| teacher.id == id)
            .cloned())
    }

    fn list_teachers(&mut self) -> RepoResult<Vec<Teacher>> {
        self.store.refresh(Table::Teachers);
        Ok(self.store.teachers().to_vec())
    }
}
