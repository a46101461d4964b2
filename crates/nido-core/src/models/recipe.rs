// ABOUTME: Recipe models for baby-led weaning and purees
// ABOUTME: Recipe, NewRecipe, and RecipeFilter definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::FoodId;

/// A stored recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe identifier
    pub id: i64,
    /// Title, also the natural key for imports
    pub title: String,
    /// Youngest age in months the recipe is suitable for
    pub suitable_from_month: u32,
    /// Preparation steps
    pub steps: String,
    /// Whether portions can be frozen
    pub freeze_ok: bool,
    /// Foods the recipe uses
    #[serde(default)]
    pub ingredient_food_ids: BTreeSet<FoodId>,
}

/// Payload for creating a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecipe {
    /// Title
    pub title: String,
    /// Youngest age in months the recipe is suitable for
    pub suitable_from_month: u32,
    /// Preparation steps
    pub steps: String,
    /// Whether portions can be frozen
    pub freeze_ok: bool,
    /// Foods the recipe uses
    #[serde(default)]
    pub food_ids: BTreeSet<FoodId>,
}

/// Filter for listing recipes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFilter {
    /// Only recipes suitable at or before this age in months
    pub suitable_to_month: Option<u32>,
    /// Only recipes using this food
    pub food_id: Option<FoodId>,
}
