// ABOUTME: Food catalog seeding utility for the Nido feeding tracker
// ABOUTME: Imports the starter foods and first-food recipes, or a catalog from a JSON file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! Food catalog seeder.
//!
//! Safe to run repeatedly: foods are matched by name and recipes by title,
//! so a second run only reports what already exists.
//!
//! Usage:
//! ```bash
//! # Seed the starter catalog (uses DATABASE_URL from environment)
//! cargo run --bin seed-foods
//!
//! # Override database URL
//! cargo run --bin seed-foods -- --database-url sqlite:./data/nido.db
//!
//! # Import a catalog exported as JSON
//! cargo run --bin seed-foods -- --file catalog.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use nido::config::NidoConfig;
use nido::database::SqliteStore;
use nido::logging::LoggingConfig;
use nido::models::{FoodCategory, NewFood};
use nido::services::{import_catalog, Catalog, CatalogRecipe};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-foods",
    about = "Nido Food Catalog Seeder",
    long_about = "Import the starter food catalog and recipes, skipping anything already present"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Import this JSON catalog instead of the built-in one
    #[arg(long)]
    file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

// ============================================================================
// Starter Catalog
// ============================================================================

struct FoodData {
    name: &'static str,
    category: FoodCategory,
    allergen: bool,
}

#[rustfmt::skip]
const FOODS: &[FoodData] = &[
    FoodData { name: "Plátano", category: FoodCategory::Fruit, allergen: false },
    FoodData { name: "Pera", category: FoodCategory::Fruit, allergen: false },
    FoodData { name: "Manzana", category: FoodCategory::Fruit, allergen: false },
    FoodData { name: "Aguacate", category: FoodCategory::Fruit, allergen: false },
    FoodData { name: "Melocotón", category: FoodCategory::Fruit, allergen: false },
    FoodData { name: "Calabacín", category: FoodCategory::Vegetable, allergen: false },
    FoodData { name: "Zanahoria", category: FoodCategory::Vegetable, allergen: false },
    FoodData { name: "Boniato", category: FoodCategory::Vegetable, allergen: false },
    FoodData { name: "Calabaza", category: FoodCategory::Vegetable, allergen: false },
    FoodData { name: "Brócoli", category: FoodCategory::Vegetable, allergen: false },
    FoodData { name: "Pollo", category: FoodCategory::Protein, allergen: false },
    FoodData { name: "Ternera", category: FoodCategory::Protein, allergen: false },
    FoodData { name: "Huevo", category: FoodCategory::Protein, allergen: true },
    FoodData { name: "Pescado blanco", category: FoodCategory::Protein, allergen: true },
    FoodData { name: "Lentejas", category: FoodCategory::Protein, allergen: false },
    FoodData { name: "Yogur natural", category: FoodCategory::Protein, allergen: true },
    FoodData { name: "Avena", category: FoodCategory::Cereal, allergen: false },
    FoodData { name: "Arroz", category: FoodCategory::Cereal, allergen: false },
    FoodData { name: "Trigo", category: FoodCategory::Cereal, allergen: true },
];

struct RecipeData {
    title: &'static str,
    suitable_from_month: u32,
    steps: &'static str,
    freeze_ok: bool,
    ingredients: &'static [&'static str],
}

const RECIPES: &[RecipeData] = &[
    RecipeData {
        title: "Puré de calabacín y zanahoria",
        suitable_from_month: 6,
        steps: "Pelar y trocear las verduras.\nCocer al vapor 15 minutos.\nTriturar con un poco del agua de cocción.",
        freeze_ok: true,
        ingredients: &["Calabacín", "Zanahoria"],
    },
    RecipeData {
        title: "Papilla de pera y plátano",
        suitable_from_month: 6,
        steps: "Pelar la pera y el plátano.\nTriturar en crudo hasta que quede fino.",
        freeze_ok: false,
        ingredients: &["Pera", "Plátano"],
    },
    RecipeData {
        title: "Gachas de avena con manzana",
        suitable_from_month: 6,
        steps: "Cocer la avena en agua 5 minutos.\nAñadir la manzana rallada y remover.",
        freeze_ok: false,
        ingredients: &["Avena", "Manzana"],
    },
    RecipeData {
        title: "Pollo con boniato",
        suitable_from_month: 7,
        steps: "Cocer el pollo y el boniato por separado.\nDesmenuzar el pollo y chafar el boniato.\nMezclar con un chorrito de aceite de oliva.",
        freeze_ok: true,
        ingredients: &["Pollo", "Boniato"],
    },
    RecipeData {
        title: "Tortilla francesa en tiras",
        suitable_from_month: 8,
        steps: "Batir el huevo.\nCuajar bien en sartén antiadherente.\nCortar en tiras para que las coja con la mano.",
        freeze_ok: false,
        ingredients: &["Huevo"],
    },
    RecipeData {
        title: "Merluza con arroz y brócoli",
        suitable_from_month: 9,
        steps: "Cocer el arroz.\nHacer la merluza y el brócoli al vapor.\nRetirar espinas y servir en trozos blandos.",
        freeze_ok: true,
        ingredients: &["Pescado blanco", "Arroz", "Brócoli"],
    },
];

fn starter_catalog() -> Catalog {
    Catalog {
        foods: FOODS
            .iter()
            .map(|f| NewFood::new(f.name, f.category, f.allergen))
            .collect(),
        recipes: RECIPES
            .iter()
            .map(|r| CatalogRecipe {
                title: r.title.to_owned(),
                suitable_from_month: r.suitable_from_month,
                steps: r.steps.to_owned(),
                freeze_ok: r.freeze_ok,
                ingredients: r.ingredients.iter().map(|&i| i.to_owned()).collect(),
            })
            .collect(),
    }
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid catalog {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let mut logging = LoggingConfig::from_env();
    if args.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    info!("=== Nido Food Catalog Seeder ===");

    let mut config = NidoConfig::from_env()?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    let catalog = match &args.file {
        Some(path) => load_catalog(path)?,
        None => starter_catalog(),
    };

    info!("Connecting to database: {}", config.database.url);
    let store = SqliteStore::connect(
        &config.database.url,
        config.database.max_connections,
        config.database.acquire_timeout,
    )
    .await?;

    info!(
        "Importing {} foods and {} recipes...",
        catalog.foods.len(),
        catalog.recipes.len()
    );
    let report = import_catalog(&store, &catalog).await?;

    info!("=== Seeding Complete ===");
    info!(
        "Foods: {} created, {} already present",
        report.foods_created, report.foods_existing
    );
    info!(
        "Recipes: {} created, {} already present",
        report.recipes_created, report.recipes_existing
    );
    if !report.unknown_ingredients.is_empty() {
        info!(
            "Unknown ingredients skipped: {}",
            report.unknown_ingredients.join(", ")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn starter_recipes_only_use_catalog_foods() {
        let catalog = starter_catalog();
        let names: HashSet<String> = catalog.foods.iter().map(NewFood::natural_key).collect();
        for recipe in &catalog.recipes {
            for ingredient in &recipe.ingredients {
                assert!(
                    names.contains(&ingredient.to_lowercase()),
                    "{} uses unknown ingredient {ingredient}",
                    recipe.title
                );
            }
        }
    }

    #[test]
    fn starter_catalog_has_unique_names() {
        let catalog = starter_catalog();
        let names: HashSet<String> = catalog.foods.iter().map(NewFood::natural_key).collect();
        assert_eq!(names.len(), catalog.foods.len());
    }
}
