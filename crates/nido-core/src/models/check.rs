// ABOUTME: Meal calendar check models
// ABOUTME: Meal slots, normalized CheckEntry, and the raw row read from the collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::FoodId;

/// One of the four feeding slots of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Meal {
    /// Breakfast slot
    #[serde(rename = "manana", alias = "morning")]
    Morning,
    /// Midday meal
    #[serde(rename = "comida", alias = "lunch")]
    Lunch,
    /// Afternoon snack
    #[serde(rename = "merienda", alias = "snack")]
    Snack,
    /// Evening meal
    #[serde(rename = "cena", alias = "dinner")]
    Dinner,
}

impl Meal {
    /// All meals in day order
    pub const ALL: [Self; 4] = [Self::Morning, Self::Lunch, Self::Snack, Self::Dinner];

    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "manana",
            Self::Lunch => "comida",
            Self::Snack => "merienda",
            Self::Dinner => "cena",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Mañana",
            Self::Lunch => "Comida",
            Self::Snack => "Merienda",
            Self::Dinner => "Cena",
        }
    }

    /// Parse from wire string, accepting both stored and English names
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "manana" | "mañana" | "morning" => Some(Self::Morning),
            "comida" | "lunch" => Some(Self::Lunch),
            "merienda" | "snack" => Some(Self::Snack),
            "cena" | "dinner" => Some(Self::Dinner),
            _ => None,
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized check state for one (date, food, meal) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckEntry {
    /// Calendar day
    pub date: NaiveDate,
    /// Food checked
    pub food_id: FoodId,
    /// Food name, when the collaborator joined it in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    /// Meal slot
    pub meal: Meal,
    /// Whether the food is currently marked for this meal
    pub checked: bool,
}

impl CheckEntry {
    /// Identity triple of this entry
    #[must_use]
    pub const fn key(&self) -> (NaiveDate, FoodId, Meal) {
        (self.date, self.food_id, self.meal)
    }
}

/// Check row exactly as the collaborator returns it
///
/// `date` may be a plain day or a timestamp and `checked` may be a boolean,
/// a number, a string, or null. Nothing downstream of the meal calendar sees
/// this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCheckRow {
    /// Day key as sent by the collaborator
    pub date: String,
    /// Food checked
    pub food_id: FoodId,
    /// Food name, if joined in
    #[serde(default)]
    pub food_name: Option<String>,
    /// Meal slot as sent by the collaborator
    pub meal: String,
    /// Untyped checked flag
    #[serde(default)]
    pub checked: serde_json::Value,
}
