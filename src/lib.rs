// ABOUTME: Main library entry point for the Nido feeding tracker
// ABOUTME: Wires the store, services, configuration, and logging around the core algorithms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

#![deny(unsafe_code)]

//! # Nido
//!
//! Tracks an infant's introduction to complementary foods: a meal calendar of
//! checked foods, a three-day allergen exposure trial per food, and recipes
//! filtered by the baby's age.
//!
//! ## Architecture
//!
//! - **`nido_core`**: models, error codes, and constants
//! - **`nido_intelligence`**: pure algorithms (trial classification, meal
//!   calendar normalization, reconciliation planning, age clock)
//! - **Database**: the [`database::NutritionStore`] collaborator trait and its
//!   SQLite implementation
//! - **Services**: async orchestration that reads from the store, runs the
//!   algorithms, and dispatches the planned writes
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//!
//! use chrono::NaiveDate;
//! use nido::database::SqliteStore;
//! use nido::errors::AppResult;
//! use nido::models::{FoodId, Meal};
//! use nido::services::{ReconcileOptions, ReconciliationEngine};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let store = Arc::new(SqliteStore::in_memory().await?);
//!     let engine = ReconciliationEngine::new(store);
//!     let date = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap_or_default();
//!     let desired = BTreeSet::from([FoodId(1), FoodId(2)]);
//!     let outcome = engine
//!         .reconcile_meal(date, Meal::Lunch, &desired, &ReconcileOptions::default())
//!         .await?;
//!     println!("{} operations applied", outcome.applied.len());
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Persistence collaborator trait and SQLite adapter
pub mod database;

/// Error types re-exported from `nido_core`
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Async services over the store
pub mod services;

/// Domain models re-exported from `nido_core`
pub mod models {
    pub use nido_core::models::*;
}

/// Constants re-exported from `nido_core`
pub mod constants {
    pub use nido_core::constants::*;
}

/// Pure algorithms re-exported from `nido_intelligence`
pub mod intelligence {
    pub use nido_intelligence::*;
}
