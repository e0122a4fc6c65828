//! School portal facade.
//!
//! # Responsibility
//! - Expose every portal use case behind one handle owning the store.
//! - Compose repositories for flows that span tables (parent sign-up,
//!   notification feeds, homework publishing).
//!
//! # Invariants
//! - Each call runs to completion on the caller's thread.
//! - Storage failures never surface here; see `store` module invariants.

use crate::auth::{Account, Role};
use crate::config::PortalConfig;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::book::Book;
use crate::model::catalog::{GradeLevel, Period, Subject};
use crate::model::notification::Notification;
use crate::model::parent::Parent;
use crate::model::schedule::WeekSchedule;
use crate::model::student::Student;
use crate::model::teacher::Teacher;
use crate::model::validation::{require_text, ValidationError};
use crate::repo::book_repo::{BookRepository, StoreBookRepository};
use crate::repo::notification_repo::{NotificationRepository, StoreNotificationRepository};
use crate::repo::parent_repo::{ParentRepository, StoreParentRepository};
use crate::repo::schedule_repo::{ScheduleRepository, StoreScheduleRepository};
use crate::repo::student_repo::{StoreStudentRepository, StudentQuery, StudentRepository};
use crate::repo::teacher_repo::{StoreTeacherRepository, TeacherRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::targeting::Viewer;
use crate::store::Store;
use log::info;

/// Single entry point for portal hosts (CLI, UI bindings, tests).
pub struct SchoolPortal {
    store: Store,
}

impl SchoolPortal {
    /// Opens the configured database (in memory when `db_path` is unset),
    /// seeding it on first run.
    pub fn open(config: &PortalConfig) -> DbResult<Self> {
        let conn = match &config.db_path {
            Some(path) => open_db(path)?,
            None => open_db_in_memory()?,
        };
        Ok(Self::new(Store::open(conn, config)))
    }

    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Re-reads every table, picking up writes made by other handles.
    pub fn reload(&mut self) {
        self.store.refresh_all();
    }

    fn students(&mut self) -> StoreStudentRepository<'_> {
        StoreStudentRepository::new(&mut self.store)
    }

    fn teachers(&mut self) -> StoreTeacherRepository<'_> {
        StoreTeacherRepository::new(&mut self.store)
    }

    fn parents(&mut self) -> StoreParentRepository<'_> {
        StoreParentRepository::new(&mut self.store)
    }

    fn books(&mut self) -> StoreBookRepository<'_> {
        StoreBookRepository::new(&mut self.store)
    }

    fn schedules(&mut self) -> StoreScheduleRepository<'_> {
        StoreScheduleRepository::new(&mut self.store)
    }

    fn notifications(&mut self) -> StoreNotificationRepository<'_> {
        StoreNotificationRepository::new(&mut self.store)
    }

    pub fn register_student(
        &mut self,
        name: &str,
        seat_number: &str,
        grade_level: GradeLevel,
        password: &str,
    ) -> RepoResult<Student> {
        self.students()
            .register_student(Student::new(name, seat_number, grade_level, password))
    }

    pub fn register_teacher(
        &mut self,
        name: &str,
        username: &str,
        subject: Subject,
        grade_levels: &[GradeLevel],
        password: &str,
    ) -> RepoResult<Teacher> {
        self.teachers().register_teacher(Teacher::new(
            name,
            username,
            subject,
            grade_levels.iter().copied(),
            password,
        ))
    }

    /// Registers a parent, then links every child whose seat number resolves.
    pub fn register_parent(
        &mut self,
        name: &str,
        username: &str,
        child_seat_numbers: &[String],
        password: &str,
    ) -> RepoResult<Parent> {
        let parent = self
            .parents()
            .register_parent(Parent::new(name, username, password))?;
        self.students().link_parent(&parent.id, child_seat_numbers)?;
        Ok(parent)
    }

    pub fn login_student(&mut self, seat_number: &str, password: &str) -> RepoResult<Option<Student>> {
        self.students().login_student(seat_number, password)
    }

    pub fn login_teacher(&mut self, username: &str, password: &str) -> RepoResult<Option<Teacher>> {
        self.teachers().login_teacher(username, password)
    }

    pub fn login_parent(&mut self, username: &str, password: &str) -> RepoResult<Option<Parent>> {
        self.parents().login_parent(username, password)
    }

    /// Signs in with the natural key of `role`.
    pub fn login(
        &mut self,
        role: Role,
        identifier: &str,
        password: &str,
    ) -> RepoResult<Option<Account>> {
        Ok(match role {
            Role::Student => self
                .login_student(identifier, password)?
                .map(Account::Student),
            Role::Teacher => self
                .login_teacher(identifier, password)?
                .map(Account::Teacher),
            Role::Parent => self.login_parent(identifier, password)?.map(Account::Parent),
        })
    }

    pub fn list_students(&mut self) -> RepoResult<Vec<Student>> {
        self.students().list_students(&StudentQuery::default())
    }

    pub fn list_students_by_grade(&mut self, grade: GradeLevel) -> RepoResult<Vec<Student>> {
        self.students().list_students(&StudentQuery::by_grade(grade))
    }

    pub fn list_students_by_parent(&mut self, parent_id: &str) -> RepoResult<Vec<Student>> {
        self.students()
            .list_students(&StudentQuery::by_parent(parent_id))
    }

    pub fn get_student(&mut self, id: &str) -> RepoResult<Option<Student>> {
        self.students().get_student(id)
    }

    pub fn update_student_grade(
        &mut self,
        student_id: &str,
        subject: Subject,
        score: i32,
    ) -> RepoResult<()> {
        self.students().update_grade(student_id, subject, score)
    }

    pub fn list_teachers(&mut self) -> RepoResult<Vec<Teacher>> {
        self.teachers().list_teachers()
    }

    pub fn get_teacher(&mut self, id: &str) -> RepoResult<Option<Teacher>> {
        self.teachers().get_teacher(id)
    }

    pub fn list_parents(&mut self) -> RepoResult<Vec<Parent>> {
        self.parents().list_parents()
    }

    pub fn get_parent(&mut self, id: &str) -> RepoResult<Option<Parent>> {
        self.parents().get_parent(id)
    }

    pub fn list_books_by_grade(&mut self, grade: GradeLevel) -> RepoResult<Vec<Book>> {
        self.books().list_books_by_grade(grade)
    }

    pub fn add_book(
        &mut self,
        title: &str,
        grade_level: GradeLevel,
        file_name: &str,
    ) -> RepoResult<Book> {
        self.books()
            .add_book(Book::new(title, grade_level, file_name))
    }

    pub fn delete_book(&mut self, id: &str) -> RepoResult<()> {
        self.books().delete_book(id)
    }

    pub fn get_schedule(&mut self, grade: GradeLevel) -> RepoResult<WeekSchedule> {
        self.schedules().get_schedule(grade)
    }

    pub fn update_schedule_cell(
        &mut self,
        grade: GradeLevel,
        day_index: usize,
        period_index: usize,
        value: Period,
    ) -> RepoResult<()> {
        self.schedules()
            .update_cell(grade, day_index, period_index, value)
    }

    pub fn list_notifications(&mut self) -> RepoResult<Vec<Notification>> {
        self.notifications().list_notifications()
    }

    pub fn add_notification(&mut self, notification: Notification) -> RepoResult<Notification> {
        self.notifications().add_notification(notification)
    }

    pub fn delete_notification(&mut self, id: &str) -> RepoResult<()> {
        self.notifications().delete_notification(id)
    }

    /// Feed for a parent: general, addressed to them, or for a child's grade.
    pub fn notifications_for_parent(&mut self, parent_id: &str) -> RepoResult<Vec<Notification>> {
        let child_grades = self
            .list_students_by_parent(parent_id)?
            .into_iter()
            .map(|student| student.grade_level);
        let viewer = Viewer::parent(parent_id, child_grades);
        self.notifications().list_visible(&viewer)
    }

    pub fn notifications_for_student_grade(
        &mut self,
        grade: GradeLevel,
    ) -> RepoResult<Vec<Notification>> {
        self.notifications()
            .list_visible(&Viewer::StudentGrade(grade))
    }

    /// Publishes a homework notice from a teacher to one of their grades.
    ///
    /// # Errors
    /// - `NotFound` when `teacher_id` is unknown, under either policy.
    /// - `Validation(BlankField)` when `title` or `details` is blank.
    /// - `Validation(GradeNotTaught)` when the teacher does not teach `grade`.
    pub fn post_homework(
        &mut self,
        teacher_id: &str,
        grade: GradeLevel,
        title: &str,
        details: &str,
    ) -> RepoResult<Notification> {
        require_text("title", title)?;
        require_text("details", details)?;
        let teacher = self.teacher_for_grade(teacher_id, grade)?;
        let notification = Notification::homework(
            grade,
            format!("Homework: {} ({})", title.trim(), teacher.subject),
            details,
            teacher.name.as_str(),
        );
        let notification = self.add_notification(notification)?;
        info!(
            "event=homework_post module=service status=ok teacher_id={} grade=\"{}\"",
            teacher_id, grade
        );
        Ok(notification)
    }

    /// Students of `grade`, as seen by a teacher of that grade.
    pub fn class_roster(&mut self, teacher_id: &str, grade: GradeLevel) -> RepoResult<Vec<Student>> {
        self.teacher_for_grade(teacher_id, grade)?;
        self.list_students_by_grade(grade)
    }

    fn teacher_for_grade(&mut self, teacher_id: &str, grade: GradeLevel) -> RepoResult<Teacher> {
        let teacher = self
            .get_teacher(teacher_id)?
            .ok_or_else(|| RepoError::NotFound {
                entity: "teacher",
                id: teacher_id.to_string(),
            })?;
        if !teacher.teaches(grade) {
            return Err(ValidationError::GradeNotTaught {
                teacher_id: teacher.id,
                grade: grade.label().to_string(),
            }
            .into());
        }
        Ok(teacher)
    }
}
