// ABOUTME: Allergen trial commands for nido-cli
// ABOUTME: Lists trials, logs exposures, and records trial outcomes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use anyhow::Result;
use chrono::NaiveDate;
use nido::intelligence::build_exposure_note;
use nido::models::{FoodId, Outcome};
use nido::services::ExposureLedger;

use super::Context;
use crate::helpers::display;

fn ledger(ctx: &Context, days: Option<u32>) -> ExposureLedger {
    ExposureLedger::new(
        ctx.store.clone(),
        days.unwrap_or(ctx.config.exposure_window_days).max(1),
    )
}

/// List trials in the lookback window
pub async fn list(ctx: &Context, days: Option<u32>) -> Result<()> {
    let trials = ledger(ctx, days).trials(ctx.today).await?;
    if ctx.json {
        return display::print_json(&trials);
    }
    display::print_trials(&trials);
    Ok(())
}

/// Log one exposure and show the updated trial
pub async fn expose(
    ctx: &Context,
    food_id: FoodId,
    date: Option<NaiveDate>,
    time: Option<String>,
    note: Option<String>,
) -> Result<()> {
    let date = date.unwrap_or(ctx.today);
    let notes = build_exposure_note(time.as_deref(), note.as_deref());
    let trial = ledger(ctx, None)
        .record_exposure(ctx.today, date, food_id, notes.as_deref())
        .await?;
    if ctx.json {
        return display::print_json(&trial);
    }
    display::print_trials(std::slice::from_ref(&trial));
    Ok(())
}

/// Record the outcome of a trial and show it reclassified
pub async fn outcome(ctx: &Context, food_id: FoodId, outcome: Outcome) -> Result<()> {
    let trial = ledger(ctx, None)
        .set_outcome(ctx.today, food_id, outcome)
        .await?;
    if ctx.json {
        return display::print_json(&trial);
    }
    display::print_trials(std::slice::from_ref(&trial));
    Ok(())
}
