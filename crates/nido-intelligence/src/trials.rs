// ABOUTME: Allergen exposure trial classifier
// ABOUTME: Groups exposure events per food, derives trial status, and orders trial listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! # Exposure Trials
//!
//! A food is introduced by offering it on three distinct days and then
//! assessing how it went. Progress counts distinct calendar days, not events,
//! so two exposures on the same day count once.
//!
//! Status is derived, never stored:
//!
//! - **Tolerated** once any event, or the food's recorded trial outcome, is `ok`.
//!   This flag never reverts.
//! - **Valorar** (needs assessment) when exactly three distinct days are logged,
//!   the food is not tolerated, and none of the group's events carries an outcome.
//! - **En prueba** (in trial) otherwise.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use nido_core::constants::trials::TRIAL_DAYS;
use nido_core::models::{ExposureEvent, FoodId, Outcome, TrialOutcome};
use serde::{Deserialize, Serialize};

use crate::collation;

/// Derived status of a food's trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrialStatus {
    /// Still collecting exposure days
    #[serde(rename = "en_prueba")]
    InTrial,
    /// Three days logged, waiting for the caregiver's assessment
    #[serde(rename = "valorar")]
    NeedsAssessment,
    /// Well tolerated; terminal
    #[serde(rename = "tolerado")]
    Tolerated,
}

impl TrialStatus {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InTrial => "En prueba",
            Self::NeedsAssessment => "Valorar",
            Self::Tolerated => "Tolerado",
        }
    }
}

/// Derived view of one food's trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialGroup {
    /// Food under trial
    pub food_id: FoodId,
    /// Food name used for ordering
    pub food_name: String,
    /// Exposure events, ascending by date
    pub events: Vec<ExposureEvent>,
    /// Number of distinct exposure days
    pub day_count: usize,
    /// Outcome recorded for the trial, if any
    pub outcome: Option<Outcome>,
    /// Sticky tolerated flag
    pub tolerated: bool,
    /// Whether the trial is waiting for an assessment
    pub needs_outcome: bool,
    /// Derived status
    pub status: TrialStatus,
    /// Day after the last exposure; informational only
    pub next_recommended_date: Option<NaiveDate>,
}

impl TrialGroup {
    /// Progress shown to the caregiver, capped at the trial length
    #[must_use]
    pub fn progress(&self) -> usize {
        self.day_count.min(TRIAL_DAYS)
    }

    /// Distinct exposure days, ascending
    #[must_use]
    pub fn distinct_dates(&self) -> Vec<NaiveDate> {
        self.events
            .iter()
            .map(|e| e.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Date of the most recent exposure
    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.events.last().map(|e| e.date)
    }
}

/// Classify one food's exposure history
///
/// Returns `None` for an empty history; such foods never appear in listings.
#[must_use]
pub fn classify(events: &[ExposureEvent]) -> Option<TrialGroup> {
    classify_with_outcome(events, None)
}

/// Classify one food's exposure history together with its recorded outcome
///
/// The recorded outcome only contributes the sticky `tolerated` flag.
/// `outcome` and `needs_outcome` come from the events in the group.
#[must_use]
pub fn classify_with_outcome(
    events: &[ExposureEvent],
    recorded: Option<&TrialOutcome>,
) -> Option<TrialGroup> {
    let first = events.first()?;
    let food_id = first.food_id;
    let food_name = first.food_name.clone();

    let mut ordered = events.to_vec();
    ordered.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let day_count = ordered
        .iter()
        .map(|e| e.date)
        .collect::<BTreeSet<_>>()
        .len();

    // Only the group's own events carry its outcome; the food's recorded row
    // may belong to an earlier trial
    let outcome = ordered.iter().rev().find_map(|e| e.outcome);

    let tolerated = ordered
        .iter()
        .any(|e| e.outcome.is_some_and(|o| o.is_tolerated()))
        || recorded.is_some_and(|r| r.tolerated);

    let needs_outcome = day_count == TRIAL_DAYS && !tolerated && outcome.is_none();

    let status = if tolerated {
        TrialStatus::Tolerated
    } else if needs_outcome {
        TrialStatus::NeedsAssessment
    } else {
        TrialStatus::InTrial
    };

    let next_recommended_date = ordered.last().and_then(|e| e.date.succ_opt());

    Some(TrialGroup {
        food_id,
        food_name,
        events: ordered,
        day_count,
        outcome,
        tolerated,
        needs_outcome,
        status,
        next_recommended_date,
    })
}

/// Fold a newly recorded outcome into the food's previous trial outcome
///
/// The latest outcome replaces the previous one, while `tolerated` only ever
/// turns on.
#[must_use]
pub fn merge_outcome(
    previous: Option<&TrialOutcome>,
    food_id: FoodId,
    outcome: Outcome,
    recorded_at: DateTime<Utc>,
) -> TrialOutcome {
    TrialOutcome {
        food_id,
        outcome,
        tolerated: previous.is_some_and(|p| p.tolerated) || outcome.is_tolerated(),
        recorded_at,
    }
}

/// Order trial listings: untolerated first, then by name in Spanish collation
pub fn sort_trials(groups: &mut [TrialGroup]) {
    groups.sort_by(|a, b| {
        u8::from(a.tolerated)
            .cmp(&u8::from(b.tolerated))
            .then_with(|| collation::compare(&a.food_name, &b.food_name))
            .then_with(|| a.food_id.cmp(&b.food_id))
    });
}

/// Group exposures by food, classify each group, and order the listing
#[must_use]
pub fn group_trials<I>(events: I, outcomes: &[TrialOutcome]) -> Vec<TrialGroup>
where
    I: IntoIterator<Item = ExposureEvent>,
{
    let mut by_food: BTreeMap<FoodId, Vec<ExposureEvent>> = BTreeMap::new();
    for event in events {
        by_food.entry(event.food_id).or_default().push(event);
    }

    let recorded: HashMap<FoodId, &TrialOutcome> =
        outcomes.iter().map(|o| (o.food_id, o)).collect();

    let mut groups: Vec<TrialGroup> = by_food
        .iter()
        .filter_map(|(food_id, events)| {
            classify_with_outcome(events, recorded.get(food_id).copied())
        })
        .collect();
    sort_trials(&mut groups);
    groups
}
