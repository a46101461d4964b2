// ABOUTME: Meal calendar commands for nido-cli
// ABOUTME: Shows a day's checked foods and reconciles a meal to a given selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use chrono::NaiveDate;
use nido::database::NutritionStore;
use nido::models::{FoodId, Meal};
use nido::services::{CalendarView, ReconcileOptions, ReconciliationEngine};

use super::Context;
use crate::helpers::display;

/// Print the checked foods of each meal for `date`
pub async fn day(ctx: &Context, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or(ctx.today);
    let view = CalendarView::month_of(ctx.store.clone(), date).await?;
    let summary = view.day_summary(date);
    if ctx.json {
        return display::print_json(&summary);
    }

    let names = food_names(ctx).await?;
    display::print_day(&summary, &names);
    Ok(())
}

/// Make `foods` the exact selection for (`date`, `meal`)
pub async fn mark(
    ctx: &Context,
    date: Option<NaiveDate>,
    meal: Option<Meal>,
    foods: BTreeSet<FoodId>,
    options: ReconcileOptions,
) -> Result<()> {
    let date = date.unwrap_or(ctx.today);
    let meal = meal.unwrap_or(ctx.config.default_meal);
    let engine = ReconciliationEngine::new(ctx.store.clone());
    let outcome = engine.reconcile_meal(date, meal, &foods, &options).await?;
    if ctx.json {
        return display::print_json(&outcome);
    }

    let names = food_names(ctx).await?;
    display::print_reconcile(&outcome, &names);
    Ok(())
}

/// Food names by id, for display
pub async fn food_names(ctx: &Context) -> Result<HashMap<FoodId, String>> {
    Ok(ctx
        .store
        .list_foods(None)
        .await?
        .into_iter()
        .map(|f| (f.id, f.name))
        .collect())
}
