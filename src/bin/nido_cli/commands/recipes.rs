// ABOUTME: Recipe commands for nido-cli
// ABOUTME: Lists age-appropriate recipes and applies a recipe to a meal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use anyhow::Result;
use nido::database::NutritionStore;
use nido::models::{FoodId, Meal, RecipeFilter};
use nido::services::{ReconcileOptions, RecipeApplier};

use super::calendar::food_names;
use super::Context;
use crate::helpers::display;

/// List recipes for the configured birth date, or all of them
pub async fn list(ctx: &Context, food_id: Option<FoodId>, all: bool) -> Result<()> {
    let recipes = if all {
        ctx.store
            .list_recipes(RecipeFilter {
                suitable_to_month: None,
                food_id,
            })
            .await?
    } else {
        let birth_date = ctx.config.require_birth_date()?;
        RecipeApplier::new(ctx.store.clone())
            .suitable_recipes(birth_date, ctx.today, food_id)
            .await?
    };
    if ctx.json {
        return display::print_json(&recipes);
    }

    let names = food_names(ctx).await?;
    display::print_recipes(&recipes, &names);
    Ok(())
}

/// Check a recipe's ingredients for a meal today
pub async fn apply(
    ctx: &Context,
    recipe_id: i64,
    meal: Option<Meal>,
    options: ReconcileOptions,
) -> Result<()> {
    let applier = RecipeApplier::new(ctx.store.clone());
    let recipe = applier.recipe_by_id(recipe_id).await?;
    let meal = meal.unwrap_or(ctx.config.default_meal);
    let outcome = applier
        .apply_recipe(&recipe, meal, ctx.today, &options)
        .await?;
    if ctx.json {
        return display::print_json(&outcome);
    }

    let names = food_names(ctx).await?;
    display::print_reconcile(&outcome, &names);
    Ok(())
}
