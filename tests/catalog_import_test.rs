// ABOUTME: Tests for catalog import by natural key
// ABOUTME: Covers idempotent reruns, case-insensitive matching, unknown ingredients, and JSON catalogs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{create_test_store, food_id};
use nido::database::NutritionStore;
use nido::errors::ErrorCode;
use nido::models::{FoodCategory, NewFood, RecipeFilter};
use nido::services::{import_catalog, Catalog, CatalogRecipe};

fn catalog() -> Catalog {
    Catalog {
        foods: vec![
            NewFood::new("Calabacín", FoodCategory::Vegetable, false),
            NewFood::new("Zanahoria", FoodCategory::Vegetable, false),
            NewFood::new("Huevo", FoodCategory::Protein, true),
        ],
        recipes: vec![
            CatalogRecipe {
                title: "Puré de verduras".to_owned(),
                suitable_from_month: 6,
                steps: "Cocer y triturar.".to_owned(),
                freeze_ok: true,
                ingredients: vec!["calabacín".to_owned(), "ZANAHORIA".to_owned()],
            },
            CatalogRecipe {
                title: "Tortilla".to_owned(),
                suitable_from_month: 8,
                steps: "Cuajar bien el huevo.".to_owned(),
                freeze_ok: false,
                ingredients: vec!["Huevo".to_owned()],
            },
        ],
    }
}

#[tokio::test]
async fn test_import_creates_catalog() -> Result<()> {
    let store = create_test_store().await?;
    let report = import_catalog(&*store, &catalog()).await?;

    assert_eq!(report.foods_created, 3);
    assert_eq!(report.recipes_created, 2);
    assert!(report.unknown_ingredients.is_empty());

    let foods = store.list_foods(None).await?;
    let recipes = store.list_recipes(RecipeFilter::default()).await?;
    let pure = recipes.iter().find(|r| r.title == "Puré de verduras").unwrap();
    assert_eq!(pure.ingredient_food_ids.len(), 2);
    assert!(pure
        .ingredient_food_ids
        .contains(&food_id(&foods, "Zanahoria")));
    Ok(())
}

#[tokio::test]
async fn test_import_twice_is_noop() -> Result<()> {
    let store = create_test_store().await?;
    import_catalog(&*store, &catalog()).await?;

    let report = import_catalog(&*store, &catalog()).await?;
    assert!(report.is_noop());
    assert_eq!(report.foods_existing, 3);
    assert_eq!(report.recipes_existing, 2);
    assert_eq!(store.list_foods(None).await?.len(), 3);
    assert_eq!(
        store.list_recipes(RecipeFilter::default()).await?.len(),
        2
    );
    Ok(())
}

#[tokio::test]
async fn test_duplicate_titles_in_one_catalog_import_once() -> Result<()> {
    let store = create_test_store().await?;
    let mut catalog = catalog();
    let mut copy = catalog.recipes[1].clone();
    copy.title = "  TORTILLA ".to_owned();
    catalog.recipes.push(copy);

    let report = import_catalog(&*store, &catalog).await?;
    assert_eq!(report.recipes_created, 2);
    assert_eq!(report.recipes_existing, 1);
    Ok(())
}

#[tokio::test]
async fn test_unknown_ingredients_reported() -> Result<()> {
    let store = create_test_store().await?;
    let mut catalog = catalog();
    catalog.recipes[0].ingredients.push("Kiwi".to_owned());

    let report = import_catalog(&*store, &catalog).await?;
    assert_eq!(report.unknown_ingredients, vec!["Kiwi".to_owned()]);
    assert_eq!(report.recipes_created, 2);
    Ok(())
}

#[tokio::test]
async fn test_invalid_recipe_rejected() -> Result<()> {
    let store = create_test_store().await?;
    let mut catalog = catalog();
    catalog.recipes[1].steps = "   ".to_owned();

    let err = import_catalog(&*store, &catalog).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert!(store.list_foods(None).await?.is_empty());
    assert!(store
        .list_recipes(RecipeFilter::default())
        .await?
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn test_invalid_month_after_valid_recipe_writes_nothing() -> Result<()> {
    let store = create_test_store().await?;
    let mut catalog = catalog();
    catalog.recipes[1].suitable_from_month = 0;

    let err = import_catalog(&*store, &catalog).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert!(store.list_foods(None).await?.is_empty());
    assert!(store
        .list_recipes(RecipeFilter::default())
        .await?
        .is_empty());
    Ok(())
}

#[test]
fn test_catalog_from_json() {
    let raw = r#"{
        "foods": [
            {"name": "Pera", "category": "fruta", "allergen": false},
            {"name": "Trigo", "category": "cereal", "allergen": true}
        ],
        "recipes": [
            {
                "title": "Pera asada",
                "suitable_from_month": 6,
                "steps": "Asar y chafar.",
                "ingredients": ["Pera"]
            }
        ]
    }"#;
    let catalog: Catalog = serde_json::from_str(raw).unwrap();
    assert_eq!(catalog.foods.len(), 2);
    assert_eq!(catalog.foods[1].category, FoodCategory::Cereal);
    assert!(!catalog.recipes[0].freeze_ok);
}
