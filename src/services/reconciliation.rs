// ABOUTME: Reconciliation engine converging persisted meal checks to a desired selection
// ABOUTME: Dispatches the planned upserts and exposures concurrently and aggregates failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! # Reconciliation Engine
//!
//! Turns "these foods should be checked for this meal" into the minimal set
//! of store writes. Every operation of one call is dispatched at once and the
//! call returns only after all of them settled. Applied writes are never
//! rolled back; when some fail, the error lists both sides.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use futures_util::future::join_all;
use nido_core::errors::{AppError, AppResult, BatchFailure, FailedOperation, StoreError};
use nido_core::models::{DateRange, ExposureEvent, FoodId, Meal, StoreOperation};
use nido_intelligence::{build_exposure_note, MealCalendar, ReconcilePlan};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::{NutritionStore, SharedStore};

/// Caller options for one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Also log an exposure for every newly checked food
    pub also_exposure: bool,
    /// Time of day attached to created exposures, e.g. `12:30`
    pub time_label: Option<String>,
    /// Free-text note attached to created exposures
    pub note: Option<String>,
}

impl ReconcileOptions {
    /// Options that log exposures with the given time label and note
    #[must_use]
    pub fn with_exposure(time_label: Option<String>, note: Option<String>) -> Self {
        Self {
            also_exposure: true,
            time_label,
            note,
        }
    }

    /// Note text for created exposures
    #[must_use]
    pub fn exposure_note(&self) -> Option<String> {
        build_exposure_note(self.time_label.as_deref(), self.note.as_deref())
    }
}

/// Result of a reconciliation, including the state after the call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    /// Set differences that were acted on
    pub plan: ReconcilePlan,
    /// Operations the store acknowledged
    pub applied: Vec<StoreOperation>,
    /// Exposures created by this call
    pub exposures: Vec<ExposureEvent>,
    /// Foods checked for the (date, meal) after the call
    pub checked: BTreeSet<FoodId>,
}

/// Diff-and-dispatch engine over a [`NutritionStore`]
#[derive(Clone)]
pub struct ReconciliationEngine {
    store: SharedStore,
}

impl ReconciliationEngine {
    /// Create an engine writing through `store`
    #[must_use]
    pub fn new(store: Arc<dyn NutritionStore>) -> Self {
        Self { store }
    }

    /// Foods currently checked for (`date`, `meal`)
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list checks
    pub async fn current_selection(
        &self,
        date: NaiveDate,
        meal: Meal,
    ) -> AppResult<BTreeSet<FoodId>> {
        let rows = self.store.list_checks(DateRange::day(date)).await?;
        Ok(MealCalendar::from_rows(rows).checked_foods(date, meal))
    }

    /// Load the current selection for (`date`, `meal`) and reconcile against it
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or any dispatched operation fails
    pub async fn reconcile_meal(
        &self,
        date: NaiveDate,
        meal: Meal,
        desired: &BTreeSet<FoodId>,
        options: &ReconcileOptions,
    ) -> AppResult<ReconcileOutcome> {
        let existing = self.current_selection(date, meal).await?;
        self.reconcile(date, meal, &existing, desired, options).await
    }

    /// Converge (`date`, `meal`) from `existing` to `desired`
    ///
    /// Foods in both sets are left alone. With `also_exposure`, each newly
    /// checked food also gets one exposure.
    ///
    /// # Errors
    ///
    /// Returns `PartialBatchFailure` naming the failed operations when any
    /// dispatched operation fails; the others stay applied.
    pub async fn reconcile(
        &self,
        date: NaiveDate,
        meal: Meal,
        existing: &BTreeSet<FoodId>,
        desired: &BTreeSet<FoodId>,
        options: &ReconcileOptions,
    ) -> AppResult<ReconcileOutcome> {
        let plan = ReconcilePlan::new(date, meal, existing, desired);
        if plan.is_noop() {
            debug!(%date, %meal, "selection already converged");
            return Ok(ReconcileOutcome {
                plan,
                applied: Vec::new(),
                exposures: Vec::new(),
                checked: existing.clone(),
            });
        }

        let note = options.exposure_note();
        let operations = plan.operations(options.also_exposure, note.as_deref());
        let batch_id = Uuid::new_v4();
        info!(
            %batch_id,
            %date,
            %meal,
            enable = plan.to_enable.len(),
            disable = plan.to_disable.len(),
            operations = operations.len(),
            "dispatching reconciliation"
        );

        let results = join_all(operations.iter().map(|op| self.dispatch(op))).await;

        let mut applied = Vec::with_capacity(operations.len());
        let mut exposures = Vec::new();
        let mut failed = Vec::new();
        for (operation, result) in operations.into_iter().zip(results) {
            match result {
                Ok(created) => {
                    exposures.extend(created);
                    applied.push(operation);
                }
                Err(e) => {
                    warn!(%batch_id, %operation, error = %e, "store operation failed");
                    failed.push(FailedOperation {
                        operation,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !failed.is_empty() {
            return Err(AppError::partial_batch(BatchFailure { failed, applied }));
        }

        let checked = plan.checked_after(existing);
        info!(
            %batch_id,
            applied = applied.len(),
            exposures = exposures.len(),
            "reconciliation applied"
        );
        Ok(ReconcileOutcome {
            plan,
            applied,
            exposures,
            checked,
        })
    }

    async fn dispatch(
        &self,
        operation: &StoreOperation,
    ) -> Result<Option<ExposureEvent>, StoreError> {
        match operation {
            StoreOperation::UpsertCheck {
                date,
                food_id,
                meal,
                checked,
            } => self
                .store
                .upsert_check(*date, *food_id, *meal, *checked)
                .await
                .map(|()| None),
            StoreOperation::CreateExposure {
                date,
                food_id,
                notes,
            } => self
                .store
                .create_exposure(*date, *food_id, notes.as_deref())
                .await
                .map(Some),
        }
    }
}
