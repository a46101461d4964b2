// ABOUTME: Food catalog models for complementary feeding
// ABOUTME: FoodId, FoodCategory, Food, and NewFood definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a food in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodId(pub i64);

impl FoodId {
    /// Raw numeric value as stored by the collaborator
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for FoodId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog category of a food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodCategory {
    /// Fruit
    #[serde(rename = "fruta", alias = "fruit")]
    Fruit,
    /// Vegetable
    #[serde(rename = "verdura", alias = "vegetable")]
    Vegetable,
    /// Meat, fish, egg, legumes
    #[serde(rename = "proteina", alias = "protein")]
    Protein,
    /// Grains and cereals
    #[serde(rename = "cereal")]
    Cereal,
}

impl FoodCategory {
    /// All categories in catalog display order
    pub const ALL: [Self; 4] = [Self::Fruit, Self::Vegetable, Self::Protein, Self::Cereal];

    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fruit => "fruta",
            Self::Vegetable => "verdura",
            Self::Protein => "proteina",
            Self::Cereal => "cereal",
        }
    }

    /// Parse from wire string, accepting both catalog and English names
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fruta" | "fruit" => Some(Self::Fruit),
            "verdura" | "vegetable" => Some(Self::Vegetable),
            "proteina" | "proteína" | "protein" => Some(Self::Protein),
            "cereal" => Some(Self::Cereal),
            _ => None,
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A food in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    /// Catalog identifier
    pub id: FoodId,
    /// Display name
    pub name: String,
    /// Catalog category
    pub category: FoodCategory,
    /// Whether the food is a common allergen and goes through an exposure trial
    pub allergen: bool,
}

/// Payload for importing a food, keyed by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFood {
    /// Display name, also the natural key
    pub name: String,
    /// Catalog category
    pub category: FoodCategory,
    /// Allergen flag
    pub allergen: bool,
}

impl NewFood {
    /// Create a new food payload
    #[must_use]
    pub fn new(name: impl Into<String>, category: FoodCategory, allergen: bool) -> Self {
        Self {
            name: name.into(),
            category,
            allergen,
        }
    }

    /// Natural key used to detect an existing record
    #[must_use]
    pub fn natural_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}
