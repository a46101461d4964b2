// ABOUTME: Write operations dispatched to the persistence collaborator
// ABOUTME: Used by reconciliation planning and by batch failure reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FoodId, Meal};

/// A single state-changing call against the collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StoreOperation {
    /// Set the checked flag of a (date, food, meal) triple
    UpsertCheck {
        /// Calendar day
        date: NaiveDate,
        /// Food
        food_id: FoodId,
        /// Meal slot
        meal: Meal,
        /// New flag value
        checked: bool,
    },
    /// Record one exposure of a food
    CreateExposure {
        /// Calendar day
        date: NaiveDate,
        /// Food
        food_id: FoodId,
        /// Optional note
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
}

impl StoreOperation {
    /// Food the operation touches
    #[must_use]
    pub const fn food_id(&self) -> FoodId {
        match self {
            Self::UpsertCheck { food_id, .. } | Self::CreateExposure { food_id, .. } => *food_id,
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpsertCheck {
                date,
                food_id,
                meal,
                checked,
            } => write!(f, "upsert_check({date}, food {food_id}, {meal}, {checked})"),
            Self::CreateExposure { date, food_id, .. } => {
                write!(f, "create_exposure({date}, food {food_id})")
            }
        }
    }
}
