// ABOUTME: Tests for the age clock that bounds recipe suitability
// ABOUTME: Covers whole-month flooring, negative deltas, and the suitability clamp
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::date;
use nido::intelligence::{clamp_suitability, months_between, suitable_to_month};

#[test]
fn test_partial_month_is_floored() {
    assert_eq!(months_between(date(2025, 2, 11), date(2025, 8, 10)), 5);
    assert_eq!(months_between(date(2025, 2, 11), date(2025, 8, 11)), 6);
}

#[test]
fn test_months_across_year_boundary() {
    assert_eq!(months_between(date(2024, 11, 30), date(2025, 3, 1)), 3);
    assert_eq!(months_between(date(2024, 11, 30), date(2025, 11, 30)), 12);
}

#[test]
fn test_same_day_is_zero() {
    assert_eq!(months_between(date(2025, 2, 11), date(2025, 2, 11)), 0);
}

#[test]
fn test_future_birth_date_floors_at_zero() {
    assert_eq!(months_between(date(2025, 9, 1), date(2025, 8, 1)), 0);
    assert_eq!(months_between(date(2026, 1, 1), date(2025, 8, 1)), 0);
}

#[test]
fn test_clamp_suitability() {
    assert_eq!(clamp_suitability(2), 4);
    assert_eq!(clamp_suitability(20), 12);
    assert_eq!(clamp_suitability(7), 7);
    assert_eq!(clamp_suitability(4), 4);
    assert_eq!(clamp_suitability(12), 12);
}

#[test]
fn test_suitable_to_month_combines_both() {
    // Newborns still see first-food recipes
    assert_eq!(suitable_to_month(date(2025, 8, 1), date(2025, 8, 10)), 4);
    assert_eq!(suitable_to_month(date(2025, 2, 11), date(2025, 9, 20)), 7);
    assert_eq!(suitable_to_month(date(2023, 2, 11), date(2025, 9, 20)), 12);
}
