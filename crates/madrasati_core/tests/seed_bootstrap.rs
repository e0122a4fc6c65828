use madrasati_core::db::open_db;
use madrasati_core::model::catalog::{DAYS_PER_WEEK, PERIODS_PER_DAY};
use madrasati_core::store::seed::{bootstrap, demo_week, SCHEDULE_BACKFILL_FLAG};
use madrasati_core::{GradeLevel, Period, PortalConfig, SchoolPortal, Store, Subject, Table, Weekday};
use std::path::{Path, PathBuf};

fn db_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("portal.sqlite3")
}

fn open(path: &Path) -> SchoolPortal {
    SchoolPortal::new(Store::open(open_db(path).unwrap(), &PortalConfig::default()))
}

fn revisions(portal: &SchoolPortal) -> Vec<Option<i64>> {
    Table::ALL
        .into_iter()
        .map(|table| portal.store().revision(table))
        .collect()
}

fn clear_grade_one(portal: &mut SchoolPortal) {
    for day in 0..DAYS_PER_WEEK {
        for period in 0..PERIODS_PER_DAY {
            portal
                .update_schedule_cell(GradeLevel::First, day, period, Period::Empty)
                .unwrap();
        }
    }
}

fn forget_backfill(portal: &SchoolPortal) {
    portal
        .store()
        .connection()
        .execute(
            "DELETE FROM store_meta WHERE key = ?1;",
            [SCHEDULE_BACKFILL_FLAG],
        )
        .unwrap();
}

#[test]
fn first_open_seeds_every_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut portal = open(&db_path(&dir));

    assert_eq!(portal.list_students().unwrap().len(), 6);
    assert_eq!(portal.list_teachers().unwrap().len(), 3);
    assert_eq!(portal.list_parents().unwrap().len(), 3);
    assert_eq!(portal.list_notifications().unwrap().len(), 3);
    let book_count: usize = GradeLevel::ALL
        .into_iter()
        .map(|grade| portal.list_books_by_grade(grade).unwrap().len())
        .sum();
    assert_eq!(book_count, 3);

    for table in Table::ALL {
        assert!(portal.store().revision(table).is_some(), "{table} not persisted");
    }
}

#[test]
fn reopening_does_not_rewrite_anything() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let first = revisions(&open(&path));

    let reopened = open(&path);
    assert_eq!(revisions(&reopened), first);

    let mut store = Store::open(open_db(&path).unwrap(), &PortalConfig::default());
    bootstrap(&mut store);
    let after: Vec<_> = Table::ALL
        .into_iter()
        .map(|table| store.revision(table))
        .collect();
    assert_eq!(after, first);
}

#[test]
fn only_missing_tables_are_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);

    let mut portal = open(&path);
    portal
        .register_student("Kept Student", "4002", GradeLevel::Fourth, "pw")
        .unwrap();
    portal.delete_book("b1").unwrap();
    portal
        .store()
        .connection()
        .execute("DELETE FROM documents WHERE table_name = 'books';", [])
        .unwrap();
    drop(portal);

    let mut reopened = open(&path);
    assert_eq!(reopened.list_students().unwrap().len(), 7);
    let first_grade_books: Vec<_> = reopened
        .list_books_by_grade(GradeLevel::First)
        .unwrap()
        .into_iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(first_grade_books, vec!["b1", "b2"]);
}

#[test]
fn seeded_students_keep_their_parent_links_and_grades() {
    let dir = tempfile::tempdir().unwrap();
    let mut portal = open(&db_path(&dir));

    let mut children: Vec<_> = portal
        .list_students_by_parent("p1")
        .unwrap()
        .into_iter()
        .map(|student| student.id)
        .collect();
    children.sort();
    assert_eq!(children, vec!["s1", "s3"]);

    let sara = portal.get_student("s2").unwrap().unwrap();
    assert_eq!(sara.score(Subject::Science), Some(100));
}

#[test]
fn backfill_writes_demo_days_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut portal = open(&db_path(&dir));

    let week = portal.get_schedule(GradeLevel::First).unwrap();
    for (day, periods) in demo_week() {
        assert_eq!(week.day(day).periods, periods);
    }
    for day in [Weekday::Tuesday, Weekday::Wednesday, Weekday::Thursday] {
        assert!(week.day(day).is_empty());
    }
    assert!(portal
        .get_schedule(GradeLevel::Second)
        .unwrap()
        .is_empty());
}

#[test]
fn backfill_never_returns_after_grade_one_is_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);

    let mut portal = open(&path);
    clear_grade_one(&mut portal);
    drop(portal);

    let mut reopened = open(&path);
    assert!(reopened.get_schedule(GradeLevel::First).unwrap().is_empty());
}

#[test]
fn legacy_store_without_flag_gets_backfilled_when_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);

    let mut portal = open(&path);
    clear_grade_one(&mut portal);
    forget_backfill(&portal);
    drop(portal);

    let mut reopened = open(&path);
    let week = reopened.get_schedule(GradeLevel::First).unwrap();
    assert_eq!(
        week.day(Weekday::Sunday).periods[1],
        Period::Subject(Subject::Math)
    );
}

#[test]
fn legacy_store_with_edited_grade_one_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);

    let mut portal = open(&path);
    clear_grade_one(&mut portal);
    portal
        .update_schedule_cell(GradeLevel::First, 3, 2, Period::Subject(Subject::Art))
        .unwrap();
    forget_backfill(&portal);
    drop(portal);

    let mut reopened = open(&path);
    let week = reopened.get_schedule(GradeLevel::First).unwrap();
    assert_eq!(week.cell(3, 2), Some(Period::Subject(Subject::Art)));
    assert!(week.day(Weekday::Sunday).is_empty());
    assert!(week.day(Weekday::Monday).is_empty());

    // The flag is recorded even though nothing was written.
    let flagged: i64 = reopened
        .store()
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM store_meta WHERE key = ?1;",
            [SCHEDULE_BACKFILL_FLAG],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(flagged, 1);
}
