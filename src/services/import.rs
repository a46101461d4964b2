// ABOUTME: Idempotent catalog import of foods and recipes keyed by natural name
// ABOUTME: Re-running an import creates nothing new and reports what already existed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::collections::{BTreeSet, HashMap};

use nido_core::errors::AppResult;
use nido_core::models::{FoodId, NewFood, NewRecipe, RecipeFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::recipes::validate_new_recipe;
use crate::database::NutritionStore;

/// Recipe entry of a catalog; ingredients are referenced by food name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecipe {
    /// Title, also the natural key
    pub title: String,
    /// Youngest age in months the recipe is suitable for
    pub suitable_from_month: u32,
    /// Preparation steps
    pub steps: String,
    /// Whether portions can be frozen
    #[serde(default)]
    pub freeze_ok: bool,
    /// Names of the foods used
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl CatalogRecipe {
    fn to_new_recipe(&self, food_ids: BTreeSet<FoodId>) -> NewRecipe {
        NewRecipe {
            title: self.title.clone(),
            suitable_from_month: self.suitable_from_month,
            steps: self.steps.clone(),
            freeze_ok: self.freeze_ok,
            food_ids,
        }
    }
}

/// Foods and recipes to import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Foods, keyed by name
    #[serde(default)]
    pub foods: Vec<NewFood>,
    /// Recipes, keyed by title
    #[serde(default)]
    pub recipes: Vec<CatalogRecipe>,
}

/// Counts produced by an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Foods inserted by this run
    pub foods_created: usize,
    /// Foods that were already present
    pub foods_existing: usize,
    /// Recipes inserted by this run
    pub recipes_created: usize,
    /// Recipes that were already present
    pub recipes_existing: usize,
    /// Ingredient names that matched no food
    pub unknown_ingredients: Vec<String>,
}

impl ImportReport {
    /// Whether the run changed nothing
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.foods_created == 0 && self.recipes_created == 0
    }
}

/// Import `catalog` into `store`, skipping records that already exist
///
/// Foods match by name ignoring case; recipes match by title ignoring case.
/// Every recipe entry is validated before the first write, so an invalid
/// catalog leaves the store untouched.
///
/// # Errors
///
/// Returns an error if a store call fails or a recipe entry is invalid
pub async fn import_catalog(
    store: &dyn NutritionStore,
    catalog: &Catalog,
) -> AppResult<ImportReport> {
    for entry in &catalog.recipes {
        validate_new_recipe(&entry.to_new_recipe(BTreeSet::new()))?;
    }

    let mut report = ImportReport::default();

    for food in &catalog.foods {
        let (stored, created) = store.upsert_food(food).await?;
        if created {
            report.foods_created += 1;
            debug!(food.id = %stored.id, food.name = %stored.name, "food imported");
        } else {
            report.foods_existing += 1;
        }
    }

    let food_ids: HashMap<String, FoodId> = store
        .list_foods(None)
        .await?
        .into_iter()
        .map(|f| (f.name.trim().to_lowercase(), f.id))
        .collect();

    let mut existing_titles: BTreeSet<String> = store
        .list_recipes(RecipeFilter::default())
        .await?
        .into_iter()
        .map(|r| r.title.trim().to_lowercase())
        .collect();

    for entry in &catalog.recipes {
        if !existing_titles.insert(entry.title.trim().to_lowercase()) {
            report.recipes_existing += 1;
            continue;
        }

        let mut ingredient_ids = BTreeSet::new();
        for name in &entry.ingredients {
            match food_ids.get(&name.trim().to_lowercase()) {
                Some(id) => {
                    ingredient_ids.insert(*id);
                }
                None => {
                    warn!(
                        recipe = %entry.title,
                        ingredient = %name,
                        "ingredient not in catalog"
                    );
                    report.unknown_ingredients.push(name.clone());
                }
            }
        }

        store
            .create_recipe(&entry.to_new_recipe(ingredient_ids))
            .await?;
        report.recipes_created += 1;
    }

    info!(
        foods_created = report.foods_created,
        foods_existing = report.foods_existing,
        recipes_created = report.recipes_created,
        recipes_existing = report.recipes_existing,
        "catalog import finished"
    );
    Ok(report)
}
