// ABOUTME: Reconciliation planning between persisted checks and a desired selection
// ABOUTME: Computes the minimal set of check upserts and exposure creations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! # Reconciliation Planning
//!
//! Given what is checked for a (date, meal) and what the caller wants checked,
//! [`ReconcilePlan`] holds the two set differences and turns them into store
//! operations. Foods in both sets, or in neither, produce nothing, so planning
//! against an already converged state yields an empty plan.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use nido_core::constants::notes::{SEPARATOR, TIME_LABEL_PREFIX};
use nido_core::models::{FoodId, Meal, StoreOperation};
use serde::{Deserialize, Serialize};

/// Build the note attached to exposures created during reconciliation
///
/// Joins `Hora: <time>` and the trimmed free text with ` · `, dropping blank
/// parts. Returns `None` when both are blank.
#[must_use]
pub fn build_exposure_note(time_label: Option<&str>, note: Option<&str>) -> Option<String> {
    let time = time_label
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("{TIME_LABEL_PREFIX}{t}"));
    let text = note
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned);

    let parts: Vec<String> = [time, text].into_iter().flatten().collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(SEPARATOR))
    }
}

/// Set differences for one (date, meal) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilePlan {
    /// Day being reconciled
    pub date: NaiveDate,
    /// Meal being reconciled
    pub meal: Meal,
    /// Desired but not yet checked
    pub to_enable: BTreeSet<FoodId>,
    /// Checked but no longer desired
    pub to_disable: BTreeSet<FoodId>,
}

impl ReconcilePlan {
    /// Diff `existing` against `desired`
    #[must_use]
    pub fn new(
        date: NaiveDate,
        meal: Meal,
        existing: &BTreeSet<FoodId>,
        desired: &BTreeSet<FoodId>,
    ) -> Self {
        Self {
            date,
            meal,
            to_enable: desired.difference(existing).copied().collect(),
            to_disable: existing.difference(desired).copied().collect(),
        }
    }

    /// Whether applying the plan changes nothing
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.to_enable.is_empty() && self.to_disable.is_empty()
    }

    /// One check upsert per food to enable or disable
    #[must_use]
    pub fn check_operations(&self) -> Vec<StoreOperation> {
        let enable = self.to_enable.iter().map(|&food_id| StoreOperation::UpsertCheck {
            date: self.date,
            food_id,
            meal: self.meal,
            checked: true,
        });
        let disable = self.to_disable.iter().map(|&food_id| StoreOperation::UpsertCheck {
            date: self.date,
            food_id,
            meal: self.meal,
            checked: false,
        });
        enable.chain(disable).collect()
    }

    /// One exposure per newly enabled food
    #[must_use]
    pub fn exposure_operations(&self, notes: Option<&str>) -> Vec<StoreOperation> {
        self.to_enable
            .iter()
            .map(|&food_id| StoreOperation::CreateExposure {
                date: self.date,
                food_id,
                notes: notes.map(str::to_owned),
            })
            .collect()
    }

    /// Full operation list; exposures are included only when requested
    #[must_use]
    pub fn operations(&self, also_exposure: bool, notes: Option<&str>) -> Vec<StoreOperation> {
        let mut operations = self.check_operations();
        if also_exposure {
            operations.extend(self.exposure_operations(notes));
        }
        operations
    }

    /// Checked set once every operation has applied
    #[must_use]
    pub fn checked_after(&self, existing: &BTreeSet<FoodId>) -> BTreeSet<FoodId> {
        existing
            .difference(&self.to_disable)
            .copied()
            .chain(self.to_enable.iter().copied())
            .collect()
    }
}
