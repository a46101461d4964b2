// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory stores, a seeded catalog, and a store wrapper that records and fails calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `nido`
//!
//! Integration tests pull this in with `mod common;`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use nido::database::{NutritionStore, SqliteStore};
use nido::errors::StoreError;
use nido::models::{
    DateRange, ExposureEvent, Food, FoodCategory, FoodId, Meal, NewFood, NewRecipe, Outcome,
    RawCheckRow, Recipe, RecipeFilter, StoreOperation, TrialOutcome,
};
use tokio::sync::Barrier;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Calendar date shorthand
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Foods every seeded store starts with, in insertion order
pub fn sample_foods() -> Vec<NewFood> {
    vec![
        NewFood::new("Pera", FoodCategory::Fruit, false),
        NewFood::new("Plátano", FoodCategory::Fruit, false),
        NewFood::new("Calabacín", FoodCategory::Vegetable, false),
        NewFood::new("Huevo", FoodCategory::Protein, true),
        NewFood::new("Avena", FoodCategory::Cereal, false),
    ]
}

/// Standard test store: in-memory SQLite with no data
pub async fn create_test_store() -> Result<Arc<SqliteStore>> {
    init_test_logging();
    Ok(Arc::new(SqliteStore::in_memory().await?))
}

/// In-memory store seeded with [`sample_foods`], returned with the stored foods
pub async fn create_seeded_store() -> Result<(Arc<SqliteStore>, Vec<Food>)> {
    let store = create_test_store().await?;
    let mut foods = Vec::new();
    for food in sample_foods() {
        let (stored, _) = store.upsert_food(&food).await?;
        foods.push(stored);
    }
    Ok((store, foods))
}

/// Id of the seeded food called `name`
pub fn food_id(foods: &[Food], name: &str) -> FoodId {
    foods
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.id)
        .unwrap_or_else(|| panic!("no seeded food named {name}"))
}

fn created_at(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

/// Exposure event built in memory, for pure classifier tests
pub fn event(id: i64, food_id: i64, name: &str, on: NaiveDate) -> ExposureEvent {
    ExposureEvent {
        id,
        food_id: FoodId(food_id),
        food_name: name.to_owned(),
        date: on,
        notes: None,
        outcome: None,
        created_at: created_at(id),
    }
}

/// Same as [`event`] with an outcome attached
pub fn event_with_outcome(
    id: i64,
    food_id: i64,
    name: &str,
    on: NaiveDate,
    outcome: Outcome,
) -> ExposureEvent {
    ExposureEvent {
        outcome: Some(outcome),
        ..event(id, food_id, name, on)
    }
}

/// Store wrapper that records every call and can be told to fail some of them
///
/// Writes touching a food in `fail_food_ids` fail with `Unavailable`; when
/// `fail_reads` is set every list call fails the same way.
pub struct RecordingStore {
    inner: Arc<dyn NutritionStore>,
    calls: AtomicUsize,
    writes: Mutex<Vec<StoreOperation>>,
    fail_food_ids: Mutex<HashSet<FoodId>>,
    fail_reads: AtomicBool,
    write_barrier: Mutex<Option<Arc<Barrier>>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RecordingStore {
    pub fn new(inner: Arc<dyn NutritionStore>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            writes: Mutex::new(Vec::new()),
            fail_food_ids: Mutex::new(HashSet::new()),
            fail_reads: AtomicBool::new(false),
            write_barrier: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Total calls of any kind
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Check and exposure writes in the order they reached the store
    pub fn writes(&self) -> Vec<StoreOperation> {
        self.writes.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
        self.writes.lock().unwrap().clear();
    }

    pub fn fail_writes_for(&self, food_id: FoodId) {
        self.fail_food_ids.lock().unwrap().insert(food_id);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Hold every check and exposure write until `count` of them are pending
    ///
    /// Writes awaited one after another never get past the first.
    pub fn hold_writes_until(&self, count: usize) {
        *self.write_barrier.lock().unwrap() = Some(Arc::new(Barrier::new(count)));
    }

    /// Most writes that were pending at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn hold_write(&self) {
        let barrier = self.write_barrier.lock().unwrap().clone();
        let pending = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(pending, Ordering::SeqCst);
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn read_guard(&self) -> Result<(), StoreError> {
        self.enter();
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("injected read failure"));
        }
        Ok(())
    }

    fn write_guard(&self, operation: StoreOperation) -> Result<(), StoreError> {
        self.enter();
        let food_id = operation.food_id();
        self.writes.lock().unwrap().push(operation);
        if self.fail_food_ids.lock().unwrap().contains(&food_id) {
            return Err(StoreError::unavailable(format!(
                "injected write failure for food {food_id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl NutritionStore for RecordingStore {
    async fn list_foods(&self, category: Option<FoodCategory>) -> Result<Vec<Food>, StoreError> {
        self.read_guard()?;
        self.inner.list_foods(category).await
    }

    async fn upsert_food(&self, food: &NewFood) -> Result<(Food, bool), StoreError> {
        self.enter();
        self.inner.upsert_food(food).await
    }

    async fn list_checks(&self, range: DateRange) -> Result<Vec<RawCheckRow>, StoreError> {
        self.read_guard()?;
        self.inner.list_checks(range).await
    }

    async fn upsert_check(
        &self,
        date: NaiveDate,
        food_id: FoodId,
        meal: Meal,
        checked: bool,
    ) -> Result<(), StoreError> {
        self.write_guard(StoreOperation::UpsertCheck {
            date,
            food_id,
            meal,
            checked,
        })?;
        self.hold_write().await;
        self.inner.upsert_check(date, food_id, meal, checked).await
    }

    async fn list_exposures(&self, range: DateRange) -> Result<Vec<ExposureEvent>, StoreError> {
        self.read_guard()?;
        self.inner.list_exposures(range).await
    }

    async fn create_exposure(
        &self,
        date: NaiveDate,
        food_id: FoodId,
        notes: Option<&str>,
    ) -> Result<ExposureEvent, StoreError> {
        self.write_guard(StoreOperation::CreateExposure {
            date,
            food_id,
            notes: notes.map(str::to_owned),
        })?;
        self.hold_write().await;
        self.inner.create_exposure(date, food_id, notes).await
    }

    async fn set_exposure_outcome(
        &self,
        food_id: FoodId,
        outcome: Outcome,
    ) -> Result<(), StoreError> {
        self.enter();
        self.inner.set_exposure_outcome(food_id, outcome).await
    }

    async fn list_trial_outcomes(&self) -> Result<Vec<TrialOutcome>, StoreError> {
        self.read_guard()?;
        self.inner.list_trial_outcomes().await
    }

    async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, StoreError> {
        self.read_guard()?;
        self.inner.list_recipes(filter).await
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe, StoreError> {
        self.enter();
        self.inner.create_recipe(recipe).await
    }
}

/// Seeded store wrapped in a [`RecordingStore`]
pub async fn create_recording_store() -> Result<(Arc<RecordingStore>, Vec<Food>)> {
    let (store, foods) = create_seeded_store().await?;
    let inner: Arc<dyn NutritionStore> = store;
    Ok((Arc::new(RecordingStore::new(inner)), foods))
}
