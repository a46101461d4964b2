// ABOUTME: Core data models for the Nido feeding tracker
// ABOUTME: Re-exports foods, exposures, checks, recipes, ranges, and store operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! # Data Models
//!
//! Types shared between the pure algorithms and the persistence collaborator.
//! Wire names follow the catalog the app was first built against (`fruta`,
//! `comida`, `dudoso`); the English names are accepted on input.

mod check;
mod exposure;
mod food;
mod operation;
mod range;
mod recipe;

pub use check::{CheckEntry, Meal, RawCheckRow};
pub use exposure::{ExposureEvent, Outcome, TrialOutcome};
pub use food::{Food, FoodCategory, FoodId, NewFood};
pub use operation::StoreOperation;
pub use range::DateRange;
pub use recipe::{NewRecipe, Recipe, RecipeFilter};
