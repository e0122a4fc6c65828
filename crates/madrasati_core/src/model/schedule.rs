//! Weekly class schedules.
//!
//! # Invariants
//! - A week is exactly five days in `Weekday::ALL` order.
//! - A day is exactly six periods; both lengths are fixed by the types.
//! - Every grade level has its own independent week.

use super::catalog::{GradeLevel, Period, Weekday, DAYS_PER_WEEK, PERIODS_PER_DAY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schedules for every grade, keyed by grade level.
pub type ScheduleBook = BTreeMap<GradeLevel, WeekSchedule>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub day: Weekday,
    pub periods: [Period; PERIODS_PER_DAY],
}

impl ScheduleDay {
    pub fn empty(day: Weekday) -> Self {
        Self {
            day,
            periods: [Period::Empty; PERIODS_PER_DAY],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.periods.iter().all(|period| period.is_empty())
    }
}

/// Five-by-six grid for one grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekSchedule {
    days: [ScheduleDay; DAYS_PER_WEEK],
}

impl WeekSchedule {
    /// Week with every slot set to the empty marker.
    pub fn empty() -> Self {
        Self {
            days: Weekday::ALL.map(ScheduleDay::empty),
        }
    }

    pub fn days(&self) -> &[ScheduleDay] {
        &self.days
    }

    pub fn day(&self, day: Weekday) -> &ScheduleDay {
        &self.days[day as usize]
    }

    pub fn cell(&self, day_index: usize, period_index: usize) -> Option<Period> {
        self.days
            .get(day_index)
            .and_then(|day| day.periods.get(period_index))
            .copied()
    }

    /// Overwrites one cell. Returns `false` when either index is out of range.
    pub fn set_cell(&mut self, day_index: usize, period_index: usize, value: Period) -> bool {
        match self
            .days
            .get_mut(day_index)
            .and_then(|day| day.periods.get_mut(period_index))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn set_day(&mut self, day: Weekday, periods: [Period; PERIODS_PER_DAY]) {
        self.days[day as usize].periods = periods;
    }

    /// True when no slot of any day has been assigned.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(ScheduleDay::is_empty)
    }
}

impl Default for WeekSchedule {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builds an all-empty schedule for every grade level.
pub fn empty_schedule_book() -> ScheduleBook {
    GradeLevel::ALL
        .into_iter()
        .map(|grade| (grade, WeekSchedule::empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{empty_schedule_book, WeekSchedule};
    use crate::model::catalog::{GradeLevel, Period, Subject, Weekday};

    #[test]
    fn empty_book_covers_every_grade() {
        let book = empty_schedule_book();
        assert_eq!(book.len(), GradeLevel::ALL.len());
        assert!(book.values().all(WeekSchedule::is_empty));
    }

    #[test]
    fn set_cell_rejects_out_of_range_indices() {
        let mut week = WeekSchedule::empty();
        assert!(!week.set_cell(5, 0, Period::Rest));
        assert!(!week.set_cell(0, 6, Period::Rest));
        assert!(week.is_empty());

        assert!(week.set_cell(1, 3, Period::Subject(Subject::Science)));
        assert_eq!(
            week.day(Weekday::Monday).periods[3],
            Period::Subject(Subject::Science)
        );
    }

    #[test]
    fn week_with_wrong_period_count_fails_to_parse() {
        let json = r#"[{"day":"Sunday","periods":["---","---"]}]"#;
        assert!(serde_json::from_str::<WeekSchedule>(json).is_err());
    }
}
