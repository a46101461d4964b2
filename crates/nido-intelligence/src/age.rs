// ABOUTME: Age clock computing elapsed whole months since birth
// ABOUTME: Bounds the recipe suitability filter to the supported month window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use chrono::{Datelike, NaiveDate};
use nido_core::constants::suitability::{MAX_MONTH, MIN_MONTH};

/// Whole months elapsed between `birth` and `today`
///
/// A month only counts once its day-of-month has been reached, so partial
/// months are floored. Dates before birth yield 0.
#[must_use]
pub fn months_between(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut months = i64::from(today.year() - birth.year()) * 12
        + i64::from(today.month()) - i64::from(birth.month());
    if today.day() < birth.day() {
        months -= 1;
    }
    u32::try_from(months.max(0)).unwrap_or(u32::MAX)
}

/// Clamp an age in months to the supported `[4, 12]` recipe window
#[must_use]
pub fn clamp_suitability(months: u32) -> u32 {
    months.clamp(MIN_MONTH, MAX_MONTH)
}

/// Upper bound for the recipe filter given a birth date
#[must_use]
pub fn suitable_to_month(birth: NaiveDate, today: NaiveDate) -> u32 {
    clamp_suitability(months_between(birth, today))
}
