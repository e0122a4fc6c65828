use madrasati_core::db::open_db_in_memory;
use madrasati_core::{
    GradeLevel, NotFoundPolicy, Period, PortalConfig, RepoError, SchoolPortal, Store, Subject,
};

fn portal(not_found: NotFoundPolicy) -> SchoolPortal {
    let config = PortalConfig {
        not_found,
        ..PortalConfig::default()
    };
    SchoolPortal::new(Store::open(open_db_in_memory().unwrap(), &config))
}

#[test]
fn lenient_policy_ignores_missing_targets() {
    let mut portal = portal(NotFoundPolicy::Lenient);
    let books_before = portal.list_books_by_grade(GradeLevel::First).unwrap();
    let notifications_before = portal.list_notifications().unwrap();

    portal
        .update_student_grade("missing", Subject::Math, 50)
        .unwrap();
    portal.delete_book("missing").unwrap();
    portal.delete_notification("missing").unwrap();
    portal
        .update_schedule_cell(GradeLevel::First, 9, 0, Period::Rest)
        .unwrap();

    assert_eq!(portal.list_books_by_grade(GradeLevel::First).unwrap(), books_before);
    assert_eq!(portal.list_notifications().unwrap(), notifications_before);
    assert!(portal.get_student("missing").unwrap().is_none());
}

#[test]
fn strict_policy_reports_missing_targets() {
    let mut portal = portal(NotFoundPolicy::Strict);

    let err = portal
        .update_student_grade("missing", Subject::Math, 50)
        .unwrap_err();
    assert_eq!(
        err,
        RepoError::NotFound {
            entity: "student",
            id: "missing".to_string(),
        }
    );
    assert!(matches!(
        portal.delete_book("missing").unwrap_err(),
        RepoError::NotFound { entity: "book", .. }
    ));
    assert!(matches!(
        portal.delete_notification("missing").unwrap_err(),
        RepoError::NotFound { entity: "notification", .. }
    ));
    assert!(matches!(
        portal
            .update_schedule_cell(GradeLevel::First, 0, 6, Period::Rest)
            .unwrap_err(),
        RepoError::NotFound { .. }
    ));
}

#[test]
fn validation_errors_surface_under_both_policies() {
    for policy in [NotFoundPolicy::Lenient, NotFoundPolicy::Strict] {
        let mut portal = portal(policy);
        assert!(matches!(
            portal.update_student_grade("missing", Subject::Math, 101),
            Err(RepoError::Validation(_))
        ));
    }
}

#[test]
fn books_are_listed_per_grade_and_deleted_by_id() {
    let mut portal = portal(NotFoundPolicy::Strict);

    let added = portal
        .add_book("Science Workbook", GradeLevel::Second, "science_g2_wb.pdf")
        .unwrap();
    let second: Vec<_> = portal
        .list_books_by_grade(GradeLevel::Second)
        .unwrap()
        .into_iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(second, vec!["b3".to_string(), added.id.clone()]);

    portal.delete_book("b3").unwrap();
    let second = portal.list_books_by_grade(GradeLevel::Second).unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].title, "Science Workbook");
    assert_eq!(portal.list_books_by_grade(GradeLevel::First).unwrap().len(), 2);

    assert!(matches!(
        portal.add_book(" ", GradeLevel::Third, "empty.pdf"),
        Err(RepoError::Validation(_))
    ));
}
