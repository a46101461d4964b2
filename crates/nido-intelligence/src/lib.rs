// ABOUTME: Feeding intelligence algorithms extracted from the service layer
// ABOUTME: Age clock, exposure trial classifier, meal calendar, and reconciliation planning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

#![deny(unsafe_code)]

//! # Nido Intelligence
//!
//! Pure, deterministic algorithms behind the feeding tracker. Nothing in this
//! crate talks to the persistence collaborator; the services in the root
//! crate feed it collaborator data and dispatch what it plans.

/// Whole-month age computation and recipe suitability bounds
pub mod age;

/// Spanish collation keys for locale-aware name ordering
pub mod collation;

/// Normalization of raw check rows into per-day meal state
pub mod calendar;

/// Diff planning between checked state and a desired selection
pub mod reconcile;

/// Allergen exposure trial classification and ordering
pub mod trials;

pub use age::{clamp_suitability, months_between, suitable_to_month};
pub use calendar::{coerce_checked, DayChecks, MealCalendar};
pub use reconcile::{build_exposure_note, ReconcilePlan};
pub use trials::{
    classify, classify_with_outcome, group_trials, merge_outcome, sort_trials, TrialGroup,
    TrialStatus,
};
