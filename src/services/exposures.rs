// ABOUTME: Exposure ledger service listing allergen trials and recording exposures and outcomes
// ABOUTME: Reads exposures and trial outcomes from the store and classifies them per food
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use nido_core::errors::{AppError, AppResult};
use nido_core::models::{DateRange, ExposureEvent, FoodId, Outcome, TrialOutcome};
use nido_intelligence::{classify_with_outcome, group_trials, merge_outcome, TrialGroup};
use tracing::{debug, info};

use crate::database::{NutritionStore, SharedStore};

/// Trial listing and recording over a lookback window
#[derive(Clone)]
pub struct ExposureLedger {
    store: SharedStore,
    window_days: u32,
}

impl ExposureLedger {
    /// Create a ledger that looks back `window_days` from the caller's today
    #[must_use]
    pub fn new(store: Arc<dyn NutritionStore>, window_days: u32) -> Self {
        Self { store, window_days }
    }

    /// Window used when listing trials as of `today`
    #[must_use]
    pub fn window(&self, today: NaiveDate) -> DateRange {
        DateRange::trailing_days(today, self.window_days)
    }

    /// Trials with exposures in the window ending at `today`
    ///
    /// Untolerated trials come first, then alphabetical by food name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list exposures or outcomes
    pub async fn trials(&self, today: NaiveDate) -> AppResult<Vec<TrialGroup>> {
        self.trials_in(self.window(today)).await
    }

    /// Trials with exposures in `range`
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list exposures or outcomes
    pub async fn trials_in(&self, range: DateRange) -> AppResult<Vec<TrialGroup>> {
        let events = self.store.list_exposures(range).await?;
        let outcomes = self.store.list_trial_outcomes().await?;
        let groups = group_trials(events, &outcomes);
        debug!(%range, trials = groups.len(), "classified exposure trials");
        Ok(groups)
    }

    /// Trial of one food in the window ending at `today`
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list exposures or outcomes
    pub async fn trial_for(
        &self,
        food_id: FoodId,
        today: NaiveDate,
    ) -> AppResult<Option<TrialGroup>> {
        self.trial_in(food_id, self.window(today)).await
    }

    async fn trial_in(&self, food_id: FoodId, range: DateRange) -> AppResult<Option<TrialGroup>> {
        let events: Vec<ExposureEvent> = self
            .store
            .list_exposures(range)
            .await?
            .into_iter()
            .filter(|e| e.food_id == food_id)
            .collect();
        let outcome = self.recorded_outcome(food_id).await?;
        Ok(classify_with_outcome(&events, outcome.as_ref()))
    }

    async fn recorded_outcome(&self, food_id: FoodId) -> AppResult<Option<TrialOutcome>> {
        Ok(self
            .store
            .list_trial_outcomes()
            .await?
            .into_iter()
            .find(|o| o.food_id == food_id))
    }

    /// Log one exposure of `food_id` on `date` and return the updated trial
    ///
    /// The trial is reclassified over the window ending at the later of
    /// `date` and `today`, so back-dated and future entries both show up.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the exposure or the reload fails
    pub async fn record_exposure(
        &self,
        today: NaiveDate,
        date: NaiveDate,
        food_id: FoodId,
        notes: Option<&str>,
    ) -> AppResult<TrialGroup> {
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        let event = self.store.create_exposure(date, food_id, notes).await?;
        info!(
            exposure.id = event.id,
            food.id = %food_id,
            food.name = %event.food_name,
            %date,
            "exposure recorded"
        );

        let anchor = today.max(date);
        let mut range = self.window(anchor);
        if !range.contains(date) {
            range = DateRange::new(date, anchor);
        }
        self.trial_in(food_id, range).await?.ok_or_else(|| {
            AppError::internal(format!(
                "exposure for food {food_id} not listed after creation"
            ))
        })
    }

    /// Record the caregiver's assessment of a food's trial
    ///
    /// Calling again replaces the outcome; a tolerated trial stays tolerated.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the food has no exposures in the window,
    /// or any store error
    pub async fn set_outcome(
        &self,
        today: NaiveDate,
        food_id: FoodId,
        outcome: Outcome,
    ) -> AppResult<TrialGroup> {
        let range = self.window(today);
        let events: Vec<ExposureEvent> = self
            .store
            .list_exposures(range)
            .await?
            .into_iter()
            .filter(|e| e.food_id == food_id)
            .collect();
        if events.is_empty() {
            return Err(AppError::not_found(format!(
                "exposure trial for food {food_id}"
            )));
        }

        let previous = self.recorded_outcome(food_id).await?;
        self.store.set_exposure_outcome(food_id, outcome).await?;
        let merged = merge_outcome(previous.as_ref(), food_id, outcome, Utc::now());
        info!(
            food.id = %food_id,
            %outcome,
            tolerated = merged.tolerated,
            "trial outcome recorded"
        );

        // Reload so the group reflects the outcome the store attached to events
        let events: Vec<ExposureEvent> = self
            .store
            .list_exposures(range)
            .await?
            .into_iter()
            .filter(|e| e.food_id == food_id)
            .collect();
        classify_with_outcome(&events, Some(&merged))
            .ok_or_else(|| AppError::not_found(format!("exposure trial for food {food_id}")))
    }
}
