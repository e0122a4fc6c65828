use madrasati_core::db::open_db_in_memory;
use madrasati_core::model::catalog::{DAYS_PER_WEEK, PERIODS_PER_DAY};
use madrasati_core::{GradeLevel, Period, PortalConfig, SchoolPortal, Store, Subject, Weekday};

fn portal() -> SchoolPortal {
    let conn = open_db_in_memory().unwrap();
    SchoolPortal::new(Store::open(conn, &PortalConfig::default()))
}

#[test]
fn every_grade_has_a_five_by_six_week() {
    let mut portal = portal();

    for grade in GradeLevel::ALL {
        let week = portal.get_schedule(grade).unwrap();
        assert_eq!(week.days().len(), DAYS_PER_WEEK);
        for (day, expected) in week.days().iter().zip(Weekday::ALL) {
            assert_eq!(day.day, expected);
            assert_eq!(day.periods.len(), PERIODS_PER_DAY);
        }
    }
}

#[test]
fn updating_one_cell_changes_nothing_else() {
    let mut portal = portal();
    let before = portal.get_schedule(GradeLevel::Third).unwrap();
    let other_grade = portal.get_schedule(GradeLevel::Fourth).unwrap();

    portal
        .update_schedule_cell(GradeLevel::Third, 2, 4, Period::Subject(Subject::English))
        .unwrap();

    let after = portal.get_schedule(GradeLevel::Third).unwrap();
    for day in 0..DAYS_PER_WEEK {
        for period in 0..PERIODS_PER_DAY {
            if (day, period) == (2, 4) {
                assert_eq!(after.cell(day, period), Some(Period::Subject(Subject::English)));
            } else {
                assert_eq!(after.cell(day, period), before.cell(day, period));
            }
        }
    }
    assert_eq!(portal.get_schedule(GradeLevel::Fourth).unwrap(), other_grade);
}

#[test]
fn rest_and_empty_markers_round_trip_through_storage() {
    let mut portal = portal();

    portal
        .update_schedule_cell(GradeLevel::Fifth, 0, 3, Period::Rest)
        .unwrap();
    portal
        .update_schedule_cell(GradeLevel::Fifth, 0, 3, Period::Empty)
        .unwrap();
    portal
        .update_schedule_cell(GradeLevel::Fifth, 4, 5, Period::Rest)
        .unwrap();

    portal.reload();
    let week = portal.get_schedule(GradeLevel::Fifth).unwrap();
    assert_eq!(week.cell(0, 3), Some(Period::Empty));
    assert_eq!(week.cell(4, 5), Some(Period::Rest));
    assert_eq!(week.day(Weekday::Thursday).periods[5].label(), "Rest");
}

#[test]
fn out_of_range_indices_are_ignored_under_lenient_policy() {
    let mut portal = portal();
    let before = portal.get_schedule(GradeLevel::Second).unwrap();

    portal
        .update_schedule_cell(GradeLevel::Second, DAYS_PER_WEEK, 0, Period::Rest)
        .unwrap();
    portal
        .update_schedule_cell(GradeLevel::Second, 0, PERIODS_PER_DAY, Period::Rest)
        .unwrap();

    assert_eq!(portal.get_schedule(GradeLevel::Second).unwrap(), before);
}

#[test]
fn grade_one_carries_the_demo_days() {
    let mut portal = portal();
    let week = portal.get_schedule(GradeLevel::First).unwrap();

    assert_eq!(
        week.day(Weekday::Sunday).periods[0],
        Period::Subject(Subject::Quran)
    );
    assert_eq!(week.day(Weekday::Monday).periods[3], Period::Rest);
    assert_eq!(
        week.day(Weekday::Monday).periods[5],
        Period::Subject(Subject::PhysicalEducation)
    );
    assert!(week.day(Weekday::Tuesday).is_empty());
}
