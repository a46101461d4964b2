// ABOUTME: Async service layer driving the feeding algorithms against the store
// ABOUTME: Reconciliation, recipe application, exposure trials, calendar view, and catalog import
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! Domain service layer
//!
//! Each service holds a shared [`NutritionStore`](crate::database::NutritionStore)
//! handle, feeds store data to the pure algorithms in `nido_intelligence`, and
//! returns the derived state the caller needs next.

/// Month-scoped view over normalized meal checks
pub mod calendar;

/// Exposure trial listing and recording
pub mod exposures;

/// Idempotent catalog import
pub mod import;

/// Recipe application and listing
pub mod recipes;

/// Diff-and-dispatch of meal selections
pub mod reconciliation;

pub use calendar::{CalendarView, DaySummary};
pub use exposures::ExposureLedger;
pub use import::{import_catalog, Catalog, CatalogRecipe, ImportReport};
pub use recipes::{validate_new_recipe, RecipeApplier};
pub use reconciliation::{ReconcileOptions, ReconcileOutcome, ReconciliationEngine};
