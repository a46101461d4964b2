// ABOUTME: Recipe application and age-based recipe listing
// ABOUTME: Expands a recipe's ingredients into an additive reconciliation for a meal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use nido_core::constants::suitability::MAX_RECIPE_MONTH;
use nido_core::errors::{AppError, AppResult};
use nido_core::models::{FoodId, Meal, NewRecipe, Recipe, RecipeFilter};
use nido_intelligence::suitable_to_month;
use tracing::info;

use super::reconciliation::{ReconcileOptions, ReconcileOutcome, ReconciliationEngine};
use crate::database::{NutritionStore, SharedStore};

/// Applies recipes to the meal calendar and serves recipe listings
#[derive(Clone)]
pub struct RecipeApplier {
    store: SharedStore,
    engine: ReconciliationEngine,
}

impl RecipeApplier {
    /// Create an applier over `store`
    #[must_use]
    pub fn new(store: Arc<dyn NutritionStore>) -> Self {
        Self {
            engine: ReconciliationEngine::new(Arc::clone(&store)),
            store,
        }
    }

    /// Check every ingredient of `recipe` for (`today`, `meal`)
    ///
    /// Foods already checked for the meal stay checked; nothing is unchecked.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` without touching the store when the recipe has
    /// no ingredients, or any reconciliation error
    pub async fn apply_recipe(
        &self,
        recipe: &Recipe,
        meal: Meal,
        today: NaiveDate,
        options: &ReconcileOptions,
    ) -> AppResult<ReconcileOutcome> {
        if recipe.ingredient_food_ids.is_empty() {
            return Err(AppError::invalid_input(format!(
                "recipe '{}' has no ingredients to apply",
                recipe.title
            )));
        }

        let existing = self.engine.current_selection(today, meal).await?;
        let desired: BTreeSet<FoodId> = existing
            .union(&recipe.ingredient_food_ids)
            .copied()
            .collect();

        info!(
            recipe.id = recipe.id,
            recipe.title = %recipe.title,
            %today,
            %meal,
            ingredients = recipe.ingredient_food_ids.len(),
            "applying recipe"
        );
        self.engine
            .reconcile(today, meal, &existing, &desired, options)
            .await
    }

    /// Recipes suitable for a baby born on `birth_date`, optionally using `food_id`
    ///
    /// The age bound is clamped to the supported window, so a newborn still
    /// sees first-food recipes and an older child sees all of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list recipes
    pub async fn suitable_recipes(
        &self,
        birth_date: NaiveDate,
        today: NaiveDate,
        food_id: Option<FoodId>,
    ) -> AppResult<Vec<Recipe>> {
        let filter = RecipeFilter {
            suitable_to_month: Some(suitable_to_month(birth_date, today)),
            food_id,
        };
        Ok(self.store.list_recipes(filter).await?)
    }

    /// Recipe by identifier
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no recipe has that id
    pub async fn recipe_by_id(&self, id: i64) -> AppResult<Recipe> {
        self.store
            .list_recipes(RecipeFilter::default())
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(format!("recipe {id}")))
    }

    /// Validate and store a new recipe
    ///
    /// # Errors
    ///
    /// Returns a validation error before any store call when a field is
    /// blank or the month is out of range
    pub async fn create_recipe(&self, recipe: &NewRecipe) -> AppResult<Recipe> {
        validate_new_recipe(recipe)?;
        let created = self.store.create_recipe(recipe).await?;
        info!(recipe.id = created.id, recipe.title = %created.title, "recipe created");
        Ok(created)
    }
}

/// Reject recipes with a blank title or steps, or a month outside `1..=24`
///
/// # Errors
///
/// Returns `MissingRequiredField` or `ValueOutOfRange`
pub fn validate_new_recipe(recipe: &NewRecipe) -> AppResult<()> {
    if recipe.title.trim().is_empty() {
        return Err(AppError::missing_field("title"));
    }
    if recipe.steps.trim().is_empty() {
        return Err(AppError::missing_field("steps"));
    }
    if recipe.suitable_from_month == 0 || recipe.suitable_from_month > MAX_RECIPE_MONTH {
        return Err(AppError::out_of_range(format!(
            "suitable_from_month must be between 1 and {MAX_RECIPE_MONTH}, got {}",
            recipe.suitable_from_month
        )));
    }
    Ok(())
}
