// ABOUTME: Month-scoped calendar view over normalized meal checks
// ABOUTME: Refreshes from the store and folds reconciliation results in without refetching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use nido_core::errors::AppResult;
use nido_core::models::{DateRange, FoodId, Meal, StoreOperation};
use nido_intelligence::{DayChecks, MealCalendar};
use serde::Serialize;
use tracing::{debug, warn};

use super::reconciliation::ReconcileOutcome;
use crate::database::{NutritionStore, SharedStore};

/// Per-meal counts for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    /// Day summarized
    pub date: NaiveDate,
    /// Checked food count for each meal, in day order
    pub meals: Vec<(Meal, usize)>,
    /// Checked foods for each meal, in day order
    pub foods: Vec<(Meal, BTreeSet<FoodId>)>,
}

impl DaySummary {
    fn from_day(date: NaiveDate, day: &DayChecks) -> Self {
        Self {
            date,
            meals: day.meal_counts().to_vec(),
            foods: Meal::ALL
                .iter()
                .map(|&meal| (meal, day.checked_foods(meal)))
                .collect(),
        }
    }

    /// Total checked entries across all meals
    #[must_use]
    pub fn total(&self) -> usize {
        self.meals.iter().map(|(_, n)| n).sum()
    }
}

/// Normalized check state for one range, usually a calendar month
pub struct CalendarView {
    store: SharedStore,
    range: DateRange,
    calendar: MealCalendar,
}

impl CalendarView {
    /// Empty view over `range`; call [`Self::refresh`] to load it
    #[must_use]
    pub fn new(store: Arc<dyn NutritionStore>, range: DateRange) -> Self {
        Self {
            store,
            range,
            calendar: MealCalendar::default(),
        }
    }

    /// View over the calendar month containing `date`, already loaded
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list checks
    pub async fn month_of(store: Arc<dyn NutritionStore>, date: NaiveDate) -> AppResult<Self> {
        let mut view = Self::new(store, DateRange::month_of(date));
        view.refresh().await?;
        Ok(view)
    }

    /// Range covered by the view
    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// Normalized state
    #[must_use]
    pub const fn calendar(&self) -> &MealCalendar {
        &self.calendar
    }

    /// Reload the range from the store
    ///
    /// On failure the previously loaded state is kept as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list checks
    pub async fn refresh(&mut self) -> AppResult<()> {
        match self.store.list_checks(self.range).await {
            Ok(rows) => {
                self.calendar = MealCalendar::from_rows(rows);
                debug!(
                    range = %self.range,
                    days = self.calendar.days().count(),
                    "calendar refreshed"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    range = %self.range,
                    error = %e,
                    "calendar refresh failed, keeping previous state"
                );
                Err(e.into())
            }
        }
    }

    /// Summary of one day
    #[must_use]
    pub fn day_summary(&self, date: NaiveDate) -> DaySummary {
        DaySummary::from_day(date, &self.calendar.day(date))
    }

    /// Summaries of every day with at least one entry
    #[must_use]
    pub fn summaries(&self) -> Vec<DaySummary> {
        self.calendar
            .days()
            .map(|(date, day)| DaySummary::from_day(*date, day))
            .collect()
    }

    /// Fold a successful reconciliation into the view
    pub fn apply(&mut self, outcome: &ReconcileOutcome) {
        self.apply_operations(&outcome.applied);
    }

    /// Fold acknowledged operations into the view, e.g. the applied half of a
    /// partial failure
    pub fn apply_operations(&mut self, operations: &[StoreOperation]) {
        for operation in operations {
            if let StoreOperation::UpsertCheck { date, .. } = operation {
                if !self.range.contains(*date) {
                    continue;
                }
            }
            self.calendar.apply(operation);
        }
    }
}
