// ABOUTME: Nido CLI - command-line front end for the feeding tracker
// ABOUTME: Lists foods, marks meals, logs exposures and outcomes, and applies recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors
//!
//! Usage:
//! ```bash
//! # List allergen foods in the catalog
//! nido-cli foods --category proteina
//!
//! # Show what was eaten today
//! nido-cli day
//!
//! # Set lunch to foods 3 and 7, logging an exposure for newly added ones
//! nido-cli mark 3 7 --meal comida --expose --time 12:30
//!
//! # Allergen trials over the configured window
//! nido-cli trials
//!
//! # Record the outcome of the egg trial
//! nido-cli outcome 10 ok
//!
//! # Apply recipe 2 to today's dinner
//! nido-cli apply-recipe 2 --meal cena
//! ```

mod commands;
mod helpers;

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use nido::config::NidoConfig;
use nido::database::SqliteStore;
use nido::logging::LoggingConfig;
use nido::models::{FoodCategory, FoodId, Meal, Outcome};
use tracing::debug;

use commands::Context;

#[derive(Parser)]
#[command(
    name = "nido-cli",
    about = "Nido feeding tracker",
    long_about = "Track complementary feeding: meal calendar, allergen exposure trials, and recipes."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Treat this day as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog foods
    Foods {
        /// Only this category (fruta, verdura, proteina, cereal)
        #[arg(long, value_parser = parse_category)]
        category: Option<FoodCategory>,
    },

    /// Show checked foods per meal for a day
    Day {
        /// Day to show (defaults to today)
        date: Option<NaiveDate>,
    },

    /// Set the foods eaten at a meal; foods not listed are unchecked
    Mark {
        /// Food ids to leave checked
        foods: Vec<i64>,

        /// Day (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Meal (manana, comida, merienda, cena; defaults to NIDO_DEFAULT_MEAL)
        #[arg(long, value_parser = parse_meal)]
        meal: Option<Meal>,

        #[command(flatten)]
        exposure: ExposureArgs,
    },

    /// List allergen exposure trials
    Trials {
        /// Lookback window in days (defaults to NIDO_EXPOSURE_WINDOW_DAYS)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Log one exposure of a food
    Expose {
        /// Food id
        food: i64,

        /// Day of the exposure (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Time of day, e.g. 12:30
        #[arg(long)]
        time: Option<String>,

        /// Observations
        #[arg(long)]
        note: Option<String>,
    },

    /// Record the outcome of a food's trial
    Outcome {
        /// Food id
        food: i64,

        /// ok, dudoso, or malo
        #[arg(value_parser = parse_outcome)]
        outcome: Outcome,
    },

    /// List recipes suitable for the baby's age
    Recipes {
        /// Only recipes using this food id
        #[arg(long)]
        food: Option<i64>,

        /// Ignore the age filter
        #[arg(long)]
        all: bool,
    },

    /// Check every ingredient of a recipe for a meal today
    ApplyRecipe {
        /// Recipe id
        recipe: i64,

        /// Meal (defaults to NIDO_DEFAULT_MEAL)
        #[arg(long, value_parser = parse_meal)]
        meal: Option<Meal>,

        #[command(flatten)]
        exposure: ExposureArgs,
    },
}

/// Options for logging exposures alongside checks
#[derive(clap::Args)]
struct ExposureArgs {
    /// Also log an exposure for each newly checked food
    #[arg(long)]
    expose: bool,

    /// Time of day attached to the exposures
    #[arg(long)]
    time: Option<String>,

    /// Note attached to the exposures
    #[arg(long)]
    note: Option<String>,
}

fn parse_meal(raw: &str) -> Result<Meal, String> {
    Meal::parse(raw)
        .ok_or_else(|| format!("unknown meal '{raw}' (manana, comida, merienda, cena)"))
}

fn parse_category(raw: &str) -> Result<FoodCategory, String> {
    FoodCategory::parse(raw)
        .ok_or_else(|| format!("unknown category '{raw}' (fruta, verdura, proteina, cereal)"))
}

fn parse_outcome(raw: &str) -> Result<Outcome, String> {
    Outcome::parse(raw).ok_or_else(|| format!("unknown outcome '{raw}' (ok, dudoso, malo)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    } else if std::env::var("RUST_LOG").is_err() {
        logging = LoggingConfig::quiet();
    }
    logging.init()?;

    let mut config = NidoConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }

    debug!(database.url = %config.database.url, "connecting to database");
    let store = SqliteStore::connect(
        &config.database.url,
        config.database.max_connections,
        config.database.acquire_timeout,
    )
    .await?;

    let ctx = Context {
        store: Arc::new(store),
        today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
        json: cli.json,
        config,
    };

    match cli.command {
        Command::Foods { category } => commands::catalog::foods(&ctx, category).await?,
        Command::Day { date } => commands::calendar::day(&ctx, date).await?,
        Command::Mark {
            foods,
            date,
            meal,
            exposure,
        } => {
            let foods = foods.into_iter().map(FoodId).collect();
            commands::calendar::mark(&ctx, date, meal, foods, exposure.into()).await?;
        }
        Command::Trials { days } => commands::trials::list(&ctx, days).await?,
        Command::Expose {
            food,
            date,
            time,
            note,
        } => commands::trials::expose(&ctx, FoodId(food), date, time, note).await?,
        Command::Outcome { food, outcome } => {
            commands::trials::outcome(&ctx, FoodId(food), outcome).await?;
        }
        Command::Recipes { food, all } => {
            commands::recipes::list(&ctx, food.map(FoodId), all).await?;
        }
        Command::ApplyRecipe {
            recipe,
            meal,
            exposure,
        } => commands::recipes::apply(&ctx, recipe, meal, exposure.into()).await?,
    }

    Ok(())
}

impl From<ExposureArgs> for nido::services::ReconcileOptions {
    fn from(args: ExposureArgs) -> Self {
        Self {
            also_exposure: args.expose,
            time_label: args.time,
            note: args.note,
        }
    }
}
