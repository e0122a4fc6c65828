use madrasati_core::db::open_db_in_memory;
use madrasati_core::{
    GradeLevel, Notification, NotificationKind, PortalConfig, RepoError, SchoolPortal, Store,
    ValidationError,
};

fn portal() -> SchoolPortal {
    let conn = open_db_in_memory().unwrap();
    SchoolPortal::new(Store::open(conn, &PortalConfig::default()))
}

fn ids(notifications: Vec<Notification>) -> Vec<String> {
    notifications
        .into_iter()
        .map(|notification| notification.id)
        .collect()
}

#[test]
fn listing_is_newest_first() {
    let mut portal = portal();
    assert_eq!(ids(portal.list_notifications().unwrap()), vec!["n3", "n2", "n1"]);

    let added = portal
        .add_notification(Notification::general("Holiday", "No school Sunday", "Administration"))
        .unwrap();
    assert_eq!(portal.list_notifications().unwrap()[0].id, added.id);
}

#[test]
fn parent_feed_follows_children_grades() {
    let mut portal = portal();

    // p1 has children in Grade 1 and Grade 2.
    assert_eq!(
        ids(portal.notifications_for_parent("p1").unwrap()),
        vec!["n3", "n2", "n1"]
    );
    // p3 has children in Grade 3 and Grade 4 only.
    assert_eq!(
        ids(portal.notifications_for_parent("p3").unwrap()),
        vec!["n3", "n1"]
    );
}

#[test]
fn parent_specific_reaches_only_its_parent() {
    let mut portal = portal();
    let private = portal
        .add_notification(Notification::for_parent(
            "p2",
            "Fee reminder",
            "Please settle the term fee",
            "Accounts",
        ))
        .unwrap();

    assert!(portal
        .notifications_for_parent("p2")
        .unwrap()
        .iter()
        .any(|notification| notification.id == private.id));
    assert!(portal
        .notifications_for_parent("p1")
        .unwrap()
        .iter()
        .all(|notification| notification.id != private.id));
    for grade in GradeLevel::ALL {
        assert!(portal
            .notifications_for_student_grade(grade)
            .unwrap()
            .iter()
            .all(|notification| notification.kind != NotificationKind::ParentSpecific));
    }
}

#[test]
fn student_grade_feed_matches_exact_grade() {
    let mut portal = portal();

    assert_eq!(
        ids(portal.notifications_for_student_grade(GradeLevel::First).unwrap()),
        vec!["n3", "n2", "n1"]
    );
    assert_eq!(
        ids(portal.notifications_for_student_grade(GradeLevel::Second).unwrap()),
        vec!["n3", "n1"]
    );
}

#[test]
fn homework_is_published_to_the_taught_grade() {
    let mut portal = portal();

    let homework = portal
        .post_homework("t2", GradeLevel::Third, "Reading", "Read pages 4 to 6")
        .unwrap();
    assert_eq!(homework.kind, NotificationKind::Homework);
    assert_eq!(homework.title, "Homework: Reading (Arabic)");
    assert_eq!(homework.sender, "Ms. Noura Al-Omari");
    assert_eq!(homework.target_id.as_deref(), Some("Grade 3"));

    let third = portal
        .notifications_for_student_grade(GradeLevel::Third)
        .unwrap();
    assert_eq!(third[0].id, homework.id);
    assert_eq!(portal.notifications_for_parent("p3").unwrap()[0].id, homework.id);
    assert!(portal
        .notifications_for_parent("p1")
        .unwrap()
        .iter()
        .all(|notification| notification.id != homework.id));
}

#[test]
fn homework_for_untaught_grade_or_unknown_teacher_is_rejected() {
    let mut portal = portal();
    let before = portal.list_notifications().unwrap().len();

    let err = portal
        .post_homework("t2", GradeLevel::Sixth, "Essay", "One page")
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::GradeNotTaught { .. })
    ));

    let err = portal
        .post_homework("ghost", GradeLevel::First, "Essay", "One page")
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "teacher", .. }));

    assert_eq!(portal.list_notifications().unwrap().len(), before);
}

#[test]
fn blank_homework_is_rejected() {
    let mut portal = portal();
    let before = portal.list_notifications().unwrap().len();

    let err = portal
        .post_homework("t2", GradeLevel::Third, "  ", "Read pages 4 to 6")
        .unwrap_err();
    assert_eq!(err, RepoError::Validation(ValidationError::BlankField("title")));

    let err = portal
        .post_homework("t2", GradeLevel::Third, "Reading", "\n\t")
        .unwrap_err();
    assert_eq!(err, RepoError::Validation(ValidationError::BlankField("details")));

    assert_eq!(portal.list_notifications().unwrap().len(), before);
}

#[test]
fn mismatched_targets_are_never_stored() {
    let mut portal = portal();

    let mut general = Notification::general("Oops", "Targeted general", "Admin");
    general.target_id = Some("p1".to_string());
    let err = portal.add_notification(general).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::TargetMismatch {
            kind: NotificationKind::General,
            ..
        })
    ));

    let mut grade = Notification::for_grade(GradeLevel::First, "Oops", "No grade", "Admin");
    grade.target_id = Some("Grade 7".to_string());
    assert!(portal.add_notification(grade).is_err());

    assert_eq!(portal.list_notifications().unwrap().len(), 3);
}

#[test]
fn deleting_removes_only_that_notification() {
    let mut portal = portal();

    portal.delete_notification("n2").unwrap();
    assert_eq!(ids(portal.list_notifications().unwrap()), vec!["n3", "n1"]);
    assert_eq!(
        ids(portal.notifications_for_student_grade(GradeLevel::First).unwrap()),
        vec!["n3", "n1"]
    );
}
