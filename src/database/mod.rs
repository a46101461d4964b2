// ABOUTME: Persistence collaborator abstraction for foods, checks, exposures, and recipes
// ABOUTME: Defines the NutritionStore trait and re-exports the SQLite adapter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! # Persistence Collaborator
//!
//! The engine never owns storage. Every read and write goes through
//! [`NutritionStore`], which is assumed to offer per-record atomicity and
//! nothing more: there are no cross-record transactions and no ordering
//! guarantees between calls. Each call is independently fallible.

/// SQLite implementation of the store
pub mod sqlite;

pub use sqlite::SqliteStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use nido_core::errors::StoreError;
use nido_core::models::{
    DateRange, ExposureEvent, Food, FoodCategory, FoodId, Meal, NewFood, NewRecipe, Outcome,
    RawCheckRow, Recipe, RecipeFilter, TrialOutcome,
};

/// Operations consumed from the persistence collaborator
#[async_trait]
pub trait NutritionStore: Send + Sync {
    /// List catalog foods, optionally restricted to one category
    async fn list_foods(&self, category: Option<FoodCategory>) -> Result<Vec<Food>, StoreError>;

    /// Insert a food unless one with the same name exists
    ///
    /// Returns the stored food and whether it was created by this call.
    async fn upsert_food(&self, food: &NewFood) -> Result<(Food, bool), StoreError>;

    /// Raw check rows whose day falls in `range`
    async fn list_checks(&self, range: DateRange) -> Result<Vec<RawCheckRow>, StoreError>;

    /// Set the checked flag for a (date, food, meal) triple; last write wins
    async fn upsert_check(
        &self,
        date: NaiveDate,
        food_id: FoodId,
        meal: Meal,
        checked: bool,
    ) -> Result<(), StoreError>;

    /// Exposure events whose day falls in `range`
    async fn list_exposures(&self, range: DateRange) -> Result<Vec<ExposureEvent>, StoreError>;

    /// Record one exposure
    async fn create_exposure(
        &self,
        date: NaiveDate,
        food_id: FoodId,
        notes: Option<&str>,
    ) -> Result<ExposureEvent, StoreError>;

    /// Record the outcome of a food's trial; the latest call wins
    async fn set_exposure_outcome(&self, food_id: FoodId, outcome: Outcome)
        -> Result<(), StoreError>;

    /// Outcomes recorded per food
    async fn list_trial_outcomes(&self) -> Result<Vec<TrialOutcome>, StoreError>;

    /// Recipes matching `filter`
    async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, StoreError>;

    /// Store a new recipe
    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe, StoreError>;
}

/// Shared handle to a store
pub type SharedStore = Arc<dyn NutritionStore>;
