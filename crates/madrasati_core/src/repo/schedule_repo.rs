//! Weekly schedule repository.
//!
//! # Invariants
//! - `update_cell` changes exactly one slot of one grade or nothing.
//! - A grade with no stored week reads as an all-empty week.

use super::{handle_missing, RepoResult};
use crate::model::catalog::{GradeLevel, Period, DAYS_PER_WEEK, PERIODS_PER_DAY};
use crate::model::schedule::WeekSchedule;
use crate::store::{Store, Table};
use log::info;

pub trait ScheduleRepository {
    fn get_schedule(&mut self, grade: GradeLevel) -> RepoResult<WeekSchedule>;
    /// Sets one slot. `day_index` is `0..5` (Sunday first), `period_index` is `0..6`.
    fn update_cell(
        &mut self,
        grade: GradeLevel,
        day_index: usize,
        period_index: usize,
        value: Period,
    ) -> RepoResult<()>;
}

pub struct StoreScheduleRepository<'s> {
    store: &'s mut Store,
}

impl<'s> StoreScheduleRepository<'s> {
    pub fn new(store: &'s mut Store) -> Self {
        Self { store }
    }
}

impl ScheduleRepository for StoreScheduleRepository<'_> {
    fn get_schedule(&mut self, grade: GradeLevel) -> RepoResult<WeekSchedule> {
        self.store.refresh(Table::Schedules);
        Ok(self
            .store
            .schedules()
            .get(&grade)
            .cloned()
            .unwrap_or_default())
    }

    fn update_cell(
        &mut self,
        grade: GradeLevel,
        day_index: usize,
        period_index: usize,
        value: Period,
    ) -> RepoResult<()> {
        if day_index >= DAYS_PER_WEEK || period_index >= PERIODS_PER_DAY {
            return handle_missing(
                self.store,
                "schedule_update",
                "schedule slot",
                format!("{grade}/{day_index}/{period_index}"),
            );
        }

        self.store.refresh(Table::Schedules);
        let updated = match self.store.schedules_mut().get_mut(&grade) {
            Some(week) => week.set_cell(day_index, period_index, value),
            None => false,
        };
        if !updated {
            return handle_missing(self.store, "schedule_update", "schedule", grade.label());
        }

        self.store.commit(Table::Schedules)?;
        info!(
            "event=schedule_update module=repo status=ok grade=\"{}\" day={} period={}",
            grade, day_index, period_index
        );
        Ok(())
    }
}
