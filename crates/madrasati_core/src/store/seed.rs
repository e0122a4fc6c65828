//! First-run seed data and the one-shot demo schedule backfill.
//!
//! # Invariants
//! - Seeding only writes tables that have no persisted row.
//! - The Grade 1 backfill is evaluated at most once per store lifetime and
//!   never overwrites a schedule that has any assigned slot.

use super::{Store, Table};
use crate::auth::PasswordHash;
use crate::model::book::Book;
use crate::model::catalog::{GradeLevel, Period, Subject, Weekday, PERIODS_PER_DAY};
use crate::model::notification::{Notification, NotificationKind};
use crate::model::parent::Parent;
use crate::model::schedule::{empty_schedule_book, ScheduleBook};
use crate::model::student::Student;
use crate::model::teacher::Teacher;
use chrono::NaiveDate;
use log::{error, info, warn};
use std::collections::BTreeMap;
use std::time::Instant;

/// `store_meta` key recording that the backfill has been evaluated.
pub const SCHEDULE_BACKFILL_FLAG: &str = "schedule_backfill";

/// Password given to every seeded account.
pub const SEED_PASSWORD: &str = "123";

/// Full default dataset written on first run.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub parents: Vec<Parent>,
    pub books: Vec<Book>,
    pub notifications: Vec<Notification>,
    pub schedules: ScheduleBook,
}

impl SeedData {
    pub fn build() -> Self {
        Self {
            students: seed_students(),
            teachers: seed_teachers(),
            parents: seed_parents(),
            books: seed_books(),
            notifications: seed_notifications(),
            schedules: empty_schedule_book(),
        }
    }
}

/// Seeds missing tables, reloads every cache and runs the schedule backfill.
///
/// Safe to call repeatedly; populated tables and an already evaluated
/// backfill are left alone.
pub fn bootstrap(store: &mut Store) {
    bootstrap_with(store, &SeedData::build());
}

pub(super) fn bootstrap_with(store: &mut Store, seed: &SeedData) {
    let started_at = Instant::now();
    let mut seeded = Vec::new();

    for table in Table::ALL {
        match store.persisted_revision(table) {
            Ok(Some(_)) => {}
            Ok(None) => match store.install_seed(table, seed) {
                Ok(()) => seeded.push(table.name()),
                Err(err) => warn!(
                    "event=store_seed module=store status=skipped table={} error={}",
                    table, err
                ),
            },
            Err(err) => error!(
                "event=store_seed module=store status=error table={} error_code=revision_read_failed error={}",
                table, err
            ),
        }
    }

    store.refresh_all();
    backfill_demo_schedule(store);

    info!(
        "event=store_bootstrap module=store status=ok seeded_tables={} duration_ms={}",
        if seeded.is_empty() {
            "none".to_string()
        } else {
            seeded.join(",")
        },
        started_at.elapsed().as_millis()
    );
}

fn backfill_demo_schedule(store: &mut Store) {
    match store.meta_flag(SCHEDULE_BACKFILL_FLAG) {
        Ok(true) => return,
        Ok(false) => {}
        Err(err) => {
            error!(
                "event=schedule_backfill module=store status=error error_code=flag_read_failed error={}",
                err
            );
            return;
        }
    }

    store.refresh(Table::Schedules);
    let week = store.schedules_mut().entry(GradeLevel::First).or_default();
    if week.is_empty() {
        for (day, periods) in demo_week() {
            week.set_day(day, periods);
        }
        if let Err(err) = store.commit(Table::Schedules) {
            warn!(
                "event=schedule_backfill module=store status=skipped error={}",
                err
            );
            return;
        }
        info!("event=schedule_backfill module=store status=ok grade=\"Grade 1\"");
    } else {
        info!("event=schedule_backfill module=store status=noop reason=schedule_in_use");
    }

    if let Err(err) = store.set_meta_flag(SCHEDULE_BACKFILL_FLAG) {
        error!(
            "event=schedule_backfill module=store status=error error_code=flag_write_failed error={}",
            err
        );
    }
}

/// Sample Grade 1 days published by the backfill.
pub fn demo_week() -> [(Weekday, [Period; PERIODS_PER_DAY]); 2] {
    use Subject::{Arabic, Art, Math, PhysicalEducation, Quran, Science, SocialStudies};
    [
        (
            Weekday::Sunday,
            [
                Period::Subject(Quran),
                Period::Subject(Math),
                Period::Subject(Arabic),
                Period::Rest,
                Period::Subject(Science),
                Period::Subject(Art),
            ],
        ),
        (
            Weekday::Monday,
            [
                Period::Subject(Math),
                Period::Subject(Arabic),
                Period::Subject(Quran),
                Period::Rest,
                Period::Subject(SocialStudies),
                Period::Subject(PhysicalEducation),
            ],
        ),
    ]
}

fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn seed_student(
    id: &str,
    name: &str,
    seat_number: &str,
    grade_level: GradeLevel,
    parent_id: &str,
    grades: &[(Subject, u8)],
) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        seat_number: seat_number.to_string(),
        password: PasswordHash::new(SEED_PASSWORD),
        grade_level,
        parent_id: Some(parent_id.to_string()),
        grades: grades.iter().copied().collect::<BTreeMap<_, _>>(),
    }
}

fn seed_students() -> Vec<Student> {
    use GradeLevel::{First, Fourth, Second, Sixth, Third};
    use Subject::{Arabic, English, Math, Quran, Science, SocialStudies};
    vec![
        seed_student(
            "s1",
            "Ahmed Mohammed",
            "1001",
            First,
            "p1",
            &[(Math, 95), (Arabic, 88), (Science, 92)],
        ),
        seed_student(
            "s2",
            "Sara Ali",
            "1002",
            First,
            "p2",
            &[(Math, 98), (Arabic, 99), (Science, 100)],
        ),
        seed_student(
            "s3",
            "Khalid Abdullah",
            "2001",
            Second,
            "p1",
            &[(Science, 85), (English, 90)],
        ),
        seed_student("s4", "Mona Saeed", "3001", Third, "p3", &[(Quran, 100)]),
        seed_student(
            "s5",
            "Fahad Omar",
            "6001",
            Sixth,
            "p2",
            &[(SocialStudies, 75), (Math, 60)],
        ),
        seed_student("s6", "Abdulrahman Yousef", "4001", Fourth, "p3", &[(Math, 88)]),
    ]
}

fn seed_teacher(
    id: &str,
    name: &str,
    username: &str,
    subject: Subject,
    grade_levels: &[GradeLevel],
) -> Teacher {
    Teacher {
        id: id.to_string(),
        name: name.to_string(),
        username: username.to_string(),
        password: PasswordHash::new(SEED_PASSWORD),
        subject,
        grade_levels: grade_levels.iter().copied().collect(),
    }
}

fn seed_teachers() -> Vec<Teacher> {
    use GradeLevel::{Fifth, First, Fourth, Second, Sixth, Third};
    vec![
        seed_teacher(
            "t1",
            "Mr. Hassan Al-Malki",
            "t_hassan",
            Subject::Math,
            &[First, Second, Fourth, Sixth],
        ),
        seed_teacher(
            "t2",
            "Ms. Noura Al-Omari",
            "t_noura",
            Subject::Arabic,
            &[First, Third],
        ),
        seed_teacher(
            "t3",
            "Mr. Faisal Al-Qahtani",
            "t_faisal",
            Subject::Science,
            &[First, Second, Fifth],
        ),
    ]
}

fn seed_parents() -> Vec<Parent> {
    [
        ("p1", "Mohammed Abdullah", "abu_ahmed"),
        ("p2", "Ali Saeed", "abu_sara"),
        ("p3", "Saeed Al-Ghamdi", "abu_mona"),
    ]
    .into_iter()
    .map(|(id, name, username)| Parent {
        id: id.to_string(),
        name: name.to_string(),
        username: username.to_string(),
        password: PasswordHash::new(SEED_PASSWORD),
    })
    .collect()
}

fn seed_books() -> Vec<Book> {
    [
        ("b1", "Mathematics - Term 1", GradeLevel::First, "math_g1_v1.pdf", seed_date(2023, 9, 1)),
        ("b2", "My Beautiful Language", GradeLevel::First, "arabic_g1.pdf", seed_date(2023, 9, 1)),
        ("b3", "Science", GradeLevel::Second, "science_g2.pdf", seed_date(2023, 9, 5)),
    ]
    .into_iter()
    .map(|(id, title, grade_level, file_name, date_added)| Book {
        id: id.to_string(),
        title: title.to_string(),
        grade_level,
        file_name: file_name.to_string(),
        date_added,
    })
    .collect()
}

fn seed_notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "n1".to_string(),
            title: "Start of the school year".to_string(),
            message: "Welcome to the new school year, we wish you every success".to_string(),
            date: seed_date(2023, 8, 20),
            kind: NotificationKind::General,
            target_id: None,
            sender: "Administration".to_string(),
        },
        Notification {
            id: "n2".to_string(),
            title: "School trip".to_string(),
            message: "Grade 1 has a school trip on Thursday".to_string(),
            date: seed_date(2023, 9, 15),
            kind: NotificationKind::Grade,
            target_id: Some(GradeLevel::First.label().to_string()),
            sender: "Activities Coordinator".to_string(),
        },
        Notification {
            id: "n3".to_string(),
            title: "Parents council meeting".to_string(),
            message: "You are invited to the parents council meeting next Tuesday".to_string(),
            date: seed_date(2023, 10, 1),
            kind: NotificationKind::General,
            target_id: None,
            sender: "Administration".to_string(),
        },
    ]
}
