// ABOUTME: Meal calendar normalization of raw check rows
// ABOUTME: Groups rows by day, coerces the checked flag, and derives per-meal counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! # Meal Calendar
//!
//! The collaborator's check rows arrive with loosely typed fields: the day
//! may be a plain date or a timestamp, and `checked` may be a boolean, 0/1,
//! a string, or null. This module is the single place where those rows become
//! typed [`CheckEntry`] values. Counts are never stored; every count is
//! recomputed from the normalized entries.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use nido_core::models::{CheckEntry, FoodId, Meal, RawCheckRow, StoreOperation};
use serde_json::Value;
use tracing::warn;

/// Coerce an untyped `checked` value to a strict boolean
///
/// Numbers are true when non-zero, strings when they read `"1"` or `"true"`,
/// and null or anything else is false.
#[must_use]
pub fn coerce_checked(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "1" | "true"),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Normalize a collaborator day key into a calendar day
///
/// Accepts `YYYY-MM-DD` and timestamps that start with it; the date part is
/// taken as written, without timezone conversion.
#[must_use]
pub fn normalize_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Normalized check state of one day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayChecks {
    entries: BTreeMap<(FoodId, Meal), CheckEntry>,
}

impl DayChecks {
    /// Insert or overwrite the entry for its (food, meal) pair
    pub fn record(&mut self, entry: CheckEntry) {
        self.entries.insert((entry.food_id, entry.meal), entry);
    }

    /// All entries of the day, checked or not
    pub fn entries(&self) -> impl Iterator<Item = &CheckEntry> {
        self.entries.values()
    }

    /// Entries currently checked for `meal`
    pub fn checked_entries(&self, meal: Meal) -> impl Iterator<Item = &CheckEntry> {
        self.entries
            .values()
            .filter(move |e| e.meal == meal && e.checked)
    }

    /// Foods currently checked for `meal`
    #[must_use]
    pub fn checked_foods(&self, meal: Meal) -> BTreeSet<FoodId> {
        self.checked_entries(meal).map(|e| e.food_id).collect()
    }

    /// Number of foods checked for `meal`
    #[must_use]
    pub fn count(&self, meal: Meal) -> usize {
        self.checked_entries(meal).count()
    }

    /// Checked counts for every meal, in day order
    #[must_use]
    pub fn meal_counts(&self) -> [(Meal, usize); 4] {
        Meal::ALL.map(|meal| (meal, self.count(meal)))
    }
}

/// Per-day, per-meal, per-food check state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealCalendar {
    days: BTreeMap<NaiveDate, DayChecks>,
}

impl MealCalendar {
    /// Build a calendar from raw collaborator rows
    ///
    /// Rows with an unreadable day or meal are skipped. When a triple repeats,
    /// the later row wins.
    #[must_use]
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawCheckRow>,
    {
        let mut calendar = Self::default();
        for row in rows {
            let Some(date) = normalize_day(&row.date) else {
                warn!(date = %row.date, food_id = %row.food_id, "skipping check row with unreadable date");
                continue;
            };
            let Some(meal) = Meal::parse(&row.meal) else {
                warn!(meal = %row.meal, food_id = %row.food_id, "skipping check row with unknown meal");
                continue;
            };
            calendar.record(CheckEntry {
                date,
                food_id: row.food_id,
                food_name: row.food_name,
                meal,
                checked: coerce_checked(&row.checked),
            });
        }
        calendar
    }

    /// Record one entry, replacing any previous state for its triple
    pub fn record(&mut self, entry: CheckEntry) {
        self.days.entry(entry.date).or_default().record(entry);
    }

    /// Replay a dispatched check upsert into the calendar
    ///
    /// Exposure operations do not affect check state and are ignored.
    pub fn apply(&mut self, operation: &StoreOperation) {
        if let StoreOperation::UpsertCheck {
            date,
            food_id,
            meal,
            checked,
        } = operation
        {
            let food_name = self
                .days
                .get(date)
                .and_then(|day| day.entries.get(&(*food_id, *meal)))
                .and_then(|e| e.food_name.clone());
            self.record(CheckEntry {
                date: *date,
                food_id: *food_id,
                food_name,
                meal: *meal,
                checked: *checked,
            });
        }
    }

    /// State of one day; empty if nothing was recorded
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> DayChecks {
        self.days.get(&date).cloned().unwrap_or_default()
    }

    /// Foods checked for (`date`, `meal`)
    #[must_use]
    pub fn checked_foods(&self, date: NaiveDate, meal: Meal) -> BTreeSet<FoodId> {
        self.days
            .get(&date)
            .map(|day| day.checked_foods(meal))
            .unwrap_or_default()
    }

    /// Days with at least one row, ascending
    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &DayChecks)> {
        self.days.iter()
    }

    /// Whether no rows were ingested
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
