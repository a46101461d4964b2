// ABOUTME: Exposure event models for the allergen introduction trial
// ABOUTME: ExposureEvent, Outcome, and the per-food TrialOutcome record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::FoodId;

/// Caregiver's assessment of how a trial went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Well tolerated; ends the trial as tolerated
    #[serde(rename = "ok")]
    Ok,
    /// Unclear reaction
    #[serde(rename = "dudoso", alias = "uncertain")]
    Uncertain,
    /// Adverse reaction
    #[serde(rename = "malo", alias = "bad")]
    Bad,
}

impl Outcome {
    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Uncertain => "dudoso",
            Self::Bad => "malo",
        }
    }

    /// Parse from wire string, accepting both stored and English names
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ok" | "bien" => Some(Self::Ok),
            "dudoso" | "uncertain" => Some(Self::Uncertain),
            "malo" | "bad" => Some(Self::Bad),
            _ => None,
        }
    }

    /// Whether this outcome marks the food as tolerated
    #[must_use]
    pub const fn is_tolerated(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day on which a food was offered as part of its trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureEvent {
    /// Event identifier
    pub id: i64,
    /// Food offered
    pub food_id: FoodId,
    /// Food name as joined in by the collaborator
    pub food_name: String,
    /// Calendar day of the exposure
    pub date: NaiveDate,
    /// Free-text notes (time of day, observations)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Outcome attached to this event, if the collaborator reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// When the event was created
    pub created_at: DateTime<Utc>,
}

/// Outcome recorded for a food's trial as a whole
///
/// `tolerated` only ever goes from false to true; the latest `outcome` is kept
/// alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Food whose trial was assessed
    pub food_id: FoodId,
    /// Latest recorded outcome
    pub outcome: Outcome,
    /// Sticky tolerated flag
    pub tolerated: bool,
    /// When the latest outcome was recorded
    pub recorded_at: DateTime<Utc>,
}
