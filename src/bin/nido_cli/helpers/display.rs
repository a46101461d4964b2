// ABOUTME: Output formatting helpers for nido-cli
// ABOUTME: Plain-text tables for foods, days, trials, recipes, and reconciliation results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use nido::constants::trials::TRIAL_DAYS;
use nido::intelligence::TrialGroup;
use nido::models::{Food, FoodId, Recipe};
use nido::services::{DaySummary, ReconcileOutcome};
use serde::Serialize;

/// Pretty-printed JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn name_of(names: &HashMap<FoodId, String>, id: FoodId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("#{id}"))
}

fn join_names(names: &HashMap<FoodId, String>, ids: &BTreeSet<FoodId>) -> String {
    if ids.is_empty() {
        return "-".to_owned();
    }
    ids.iter()
        .map(|&id| name_of(names, id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Foods with id, category, and allergen marker
pub fn print_foods(foods: &[Food]) {
    if foods.is_empty() {
        println!("No foods in the catalog. Run seed-foods to import the starter catalog.");
        return;
    }
    println!("{:>4}  {:<24} {:<10} Allergen", "Id", "Name", "Category");
    println!("{}", "=".repeat(50));
    for food in foods {
        println!(
            "{:>4}  {:<24} {:<10} {}",
            food.id,
            food.name,
            food.category.as_str(),
            if food.allergen { "yes" } else { "" }
        );
    }
}

/// Checked foods per meal for one day
pub fn print_day(summary: &DaySummary, names: &HashMap<FoodId, String>) {
    println!("{}", summary.date.format("%A %d %B %Y"));
    println!("{}", "=".repeat(50));
    for (meal, foods) in &summary.foods {
        println!("{:<10} ({}) {}", meal.label(), foods.len(), join_names(names, foods));
    }
}

/// Trials with progress and status
pub fn print_trials(trials: &[TrialGroup]) {
    if trials.is_empty() {
        println!("No exposure trials in the window.");
        return;
    }
    for trial in trials {
        let outcome = trial.outcome.map_or("-", |o| o.as_str());
        let next = trial
            .next_recommended_date
            .map_or_else(|| "-".to_owned(), |d| d.to_string());
        println!(
            "{:<24} {}/{}  {:<10} outcome: {:<7} next: {}",
            trial.food_name,
            trial.progress(),
            TRIAL_DAYS,
            trial.status.label(),
            outcome,
            next
        );
        for event in &trial.events {
            println!(
                "    {}  {}",
                event.date,
                event.notes.as_deref().unwrap_or("")
            );
        }
    }
}

/// Recipes with month, freezer flag, and ingredients
pub fn print_recipes(recipes: &[Recipe], names: &HashMap<FoodId, String>) {
    if recipes.is_empty() {
        println!("No recipes match.");
        return;
    }
    for recipe in recipes {
        println!(
            "[{}] {} (from month {}{})",
            recipe.id,
            recipe.title,
            recipe.suitable_from_month,
            if recipe.freeze_ok { ", freezes well" } else { "" }
        );
        println!("    Ingredients: {}", join_names(names, &recipe.ingredient_food_ids));
        for line in recipe.steps.lines() {
            println!("    {line}");
        }
    }
}

/// What a reconciliation changed
pub fn print_reconcile(outcome: &ReconcileOutcome, names: &HashMap<FoodId, String>) {
    let plan = &outcome.plan;
    if plan.is_noop() {
        println!("{} {}: nothing to change.", plan.date, plan.meal.label());
        return;
    }
    println!("{} {}", plan.date, plan.meal.label());
    println!("    Checked:   {}", join_names(names, &plan.to_enable));
    println!("    Unchecked: {}", join_names(names, &plan.to_disable));
    if !outcome.exposures.is_empty() {
        let logged: BTreeSet<FoodId> = outcome.exposures.iter().map(|e| e.food_id).collect();
        println!("    Exposures: {}", join_names(names, &logged));
    }
    println!("    Now:       {}", join_names(names, &outcome.checked));
}
