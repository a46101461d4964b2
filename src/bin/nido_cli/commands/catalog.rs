// ABOUTME: Food catalog listing for nido-cli
// ABOUTME: Prints catalog foods grouped by category with their allergen flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use anyhow::Result;
use nido::database::NutritionStore;
use nido::models::FoodCategory;

use super::Context;
use crate::helpers::display;

/// List foods, optionally restricted to one category
pub async fn foods(ctx: &Context, category: Option<FoodCategory>) -> Result<()> {
    let foods = ctx.store.list_foods(category).await?;
    if ctx.json {
        return display::print_json(&foods);
    }
    display::print_foods(&foods);
    Ok(())
}
