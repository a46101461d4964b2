// ABOUTME: Tests for the reconciliation engine and exposure note construction
// ABOUTME: Covers minimal operations, idempotence, exposures on enable, and partial batch failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::BTreeSet;

use anyhow::Result;
use common::{create_recording_store, date, food_id};
use nido::database::NutritionStore;
use nido::errors::ErrorCode;
use nido::intelligence::{build_exposure_note, ReconcilePlan};
use nido::models::{DateRange, FoodId, Meal, StoreOperation};
use nido::services::{ReconcileOptions, ReconciliationEngine};
use tokio::time::{timeout, Duration};

fn ids(values: &[i64]) -> BTreeSet<FoodId> {
    values.iter().copied().map(FoodId).collect()
}

// ============================================================================
// Planning
// ============================================================================

#[test]
fn test_plan_sets_are_disjoint_differences() {
    let plan = ReconcilePlan::new(
        date(2025, 8, 10),
        Meal::Lunch,
        &ids(&[1, 2, 3]),
        &ids(&[2, 3, 4, 5]),
    );
    assert_eq!(plan.to_enable, ids(&[4, 5]));
    assert_eq!(plan.to_disable, ids(&[1]));
    assert!(plan.to_enable.is_disjoint(&plan.to_disable));
    assert_eq!(plan.operations(false, None).len(), 3);
    assert_eq!(plan.operations(true, None).len(), 5);
    assert_eq!(plan.checked_after(&ids(&[1, 2, 3])), ids(&[2, 3, 4, 5]));
}

#[test]
fn test_plan_against_same_set_is_noop() {
    let set = ids(&[1, 2]);
    let plan = ReconcilePlan::new(date(2025, 8, 10), Meal::Dinner, &set, &set);
    assert!(plan.is_noop());
    assert!(plan.operations(true, Some("note")).is_empty());
}

#[test]
fn test_exposure_note_joins_non_empty_parts() {
    assert_eq!(
        build_exposure_note(Some("12:30"), Some("sin reacción")),
        Some("Hora: 12:30 · sin reacción".to_owned())
    );
    assert_eq!(
        build_exposure_note(Some(" 08:00 "), Some("  ")),
        Some("Hora: 08:00".to_owned())
    );
    assert_eq!(
        build_exposure_note(None, Some("primera vez")),
        Some("primera vez".to_owned())
    );
    assert_eq!(build_exposure_note(Some(""), None), None);
    assert_eq!(build_exposure_note(None, None), None);
}

// ============================================================================
// Engine
// ============================================================================

#[tokio::test]
async fn test_reconcile_issues_one_upsert_per_change() -> Result<()> {
    let (store, foods) = create_recording_store().await?;
    let engine = ReconciliationEngine::new(store.clone());
    let day = date(2025, 8, 10);
    let pera = food_id(&foods, "Pera");
    let avena = food_id(&foods, "Avena");
    let huevo = food_id(&foods, "Huevo");

    let first = engine
        .reconcile_meal(
            day,
            Meal::Lunch,
            &BTreeSet::from([pera, avena]),
            &ReconcileOptions::default(),
        )
        .await?;
    assert_eq!(first.applied.len(), 2);
    assert!(first.exposures.is_empty());
    assert_eq!(first.checked, BTreeSet::from([pera, avena]));

    store.reset();
    let second = engine
        .reconcile_meal(
            day,
            Meal::Lunch,
            &BTreeSet::from([avena, huevo]),
            &ReconcileOptions::default(),
        )
        .await?;

    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    assert!(writes.contains(&StoreOperation::UpsertCheck {
        date: day,
        food_id: huevo,
        meal: Meal::Lunch,
        checked: true,
    }));
    assert!(writes.contains(&StoreOperation::UpsertCheck {
        date: day,
        food_id: pera,
        meal: Meal::Lunch,
        checked: false,
    }));
    assert_eq!(second.checked, BTreeSet::from([avena, huevo]));
    assert_eq!(
        engine.current_selection(day, Meal::Lunch).await?,
        BTreeSet::from([avena, huevo])
    );
    Ok(())
}

#[tokio::test]
async fn test_reconcile_converged_state_is_noop() -> Result<()> {
    let (store, foods) = create_recording_store().await?;
    let engine = ReconciliationEngine::new(store.clone());
    let day = date(2025, 8, 10);
    let desired = BTreeSet::from([food_id(&foods, "Pera"), food_id(&foods, "Plátano")]);

    let options = ReconcileOptions::with_exposure(None, None);

    engine
        .reconcile_meal(day, Meal::Snack, &desired, &options)
        .await?;
    store.reset();

    let again = engine
        .reconcile_meal(day, Meal::Snack, &desired, &options)
        .await?;

    assert!(again.plan.is_noop());
    assert!(again.applied.is_empty());
    assert!(store.writes().is_empty());
    // Only the read of the current selection reached the store
    assert_eq!(store.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_exposures_only_for_newly_checked_foods() -> Result<()> {
    let (store, foods) = create_recording_store().await?;
    let engine = ReconciliationEngine::new(store.clone());
    let day = date(2025, 8, 10);
    let pera = food_id(&foods, "Pera");
    let huevo = food_id(&foods, "Huevo");
    let avena = food_id(&foods, "Avena");

    engine
        .reconcile_meal(
            day,
            Meal::Morning,
            &BTreeSet::from([pera, avena]),
            &ReconcileOptions::default(),
        )
        .await?;

    let options =
        ReconcileOptions::with_exposure(Some("09:15".to_owned()), Some("con leche".to_owned()));
    let outcome = engine
        .reconcile_meal(day, Meal::Morning, &BTreeSet::from([pera, huevo]), &options)
        .await?;

    assert_eq!(outcome.exposures.len(), 1);
    let exposure = &outcome.exposures[0];
    assert_eq!(exposure.food_id, huevo);
    assert_eq!(exposure.date, day);
    assert_eq!(exposure.notes.as_deref(), Some("Hora: 09:15 · con leche"));
    // Enable huevo, disable avena, one exposure for huevo
    assert_eq!(outcome.applied.len(), 3);

    let logged = store.list_exposures(DateRange::day(day)).await?;
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].food_id, huevo);
    Ok(())
}

#[tokio::test]
async fn test_reconcile_dispatches_all_operations_at_once() -> Result<()> {
    let (store, foods) = create_recording_store().await?;
    let engine = ReconciliationEngine::new(store.clone());
    let day = date(2025, 8, 10);
    let selection = BTreeSet::from([
        food_id(&foods, "Pera"),
        food_id(&foods, "Huevo"),
        food_id(&foods, "Avena"),
    ]);

    // Three checks plus three exposures; none may complete until all are pending
    store.hold_writes_until(6);
    let options = ReconcileOptions::with_exposure(None, Some("primera vez".to_owned()));
    let outcome = timeout(
        Duration::from_secs(5),
        engine.reconcile_meal(day, Meal::Dinner, &selection, &options),
    )
    .await??;

    assert_eq!(outcome.applied.len(), 6);
    assert_eq!(outcome.exposures.len(), 3);
    assert_eq!(store.peak_in_flight(), 6);
    assert_eq!(store.writes().len(), 6);
    assert_eq!(engine.current_selection(day, Meal::Dinner).await?, selection);
    Ok(())
}

#[tokio::test]
async fn test_exposure_without_note_omits_notes() -> Result<()> {
    let (store, foods) = create_recording_store().await?;
    let engine = ReconciliationEngine::new(store.clone());
    let pera = food_id(&foods, "Pera");

    let outcome = engine
        .reconcile(
            date(2025, 8, 10),
            Meal::Dinner,
            &BTreeSet::new(),
            &BTreeSet::from([pera]),
            &ReconcileOptions::with_exposure(Some("  ".to_owned()), None),
        )
        .await?;

    assert_eq!(outcome.exposures.len(), 1);
    assert_eq!(outcome.exposures[0].notes, None);
    Ok(())
}

#[tokio::test]
async fn test_partial_failure_names_failed_operations() -> Result<()> {
    let (store, foods) = create_recording_store().await?;
    let engine = ReconciliationEngine::new(store.clone());
    let day = date(2025, 8, 10);
    let pera = food_id(&foods, "Pera");
    let huevo = food_id(&foods, "Huevo");
    let avena = food_id(&foods, "Avena");
    store.fail_writes_for(huevo);

    let err = engine
        .reconcile_meal(
            day,
            Meal::Lunch,
            &BTreeSet::from([pera, huevo, avena]),
            &ReconcileOptions::with_exposure(None, None),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::PartialBatchFailure);
    let report = err.batch.as_ref().unwrap();
    assert_eq!(report.failed.len(), 2);
    assert!(report.failed.iter().all(|f| f.operation.food_id() == huevo));
    assert_eq!(report.applied.len(), 4);
    assert!(err.message.contains("2 of 6"));

    // Applied writes are kept
    assert_eq!(
        engine.current_selection(day, Meal::Lunch).await?,
        BTreeSet::from([pera, avena])
    );
    Ok(())
}

#[tokio::test]
async fn test_unknown_food_fails_without_blocking_others() -> Result<()> {
    let (store, foods) = create_recording_store().await?;
    let engine = ReconciliationEngine::new(store.clone());
    let day = date(2025, 8, 10);
    let pera = food_id(&foods, "Pera");
    let missing = FoodId(9_999);

    let err = engine
        .reconcile_meal(
            day,
            Meal::Lunch,
            &BTreeSet::from([pera, missing]),
            &ReconcileOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.failed_operations().len(), 1);
    assert_eq!(err.failed_operations()[0].operation.food_id(), missing);
    assert_eq!(
        engine.current_selection(day, Meal::Lunch).await?,
        BTreeSet::from([pera])
    );
    Ok(())
}
