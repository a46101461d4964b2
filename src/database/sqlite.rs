// ABOUTME: SQLite-backed NutritionStore for foods, meal checks, exposures, and recipes
// ABOUTME: Owns the schema migration, row decoding, and sqlx error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use nido_core::errors::StoreError;
use nido_core::models::{
    DateRange, ExposureEvent, Food, FoodCategory, FoodId, Meal, NewFood, NewRecipe, Outcome,
    RawCheckRow, Recipe, RecipeFilter, TrialOutcome,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tokio::fs;
use tracing::{debug, info};

use super::NutritionStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite implementation of [`NutritionStore`]
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an existing pool; the schema is not touched
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database at `database_url`, creating the file if needed, and migrate
    ///
    /// In-memory databases get a single long-lived connection so every call
    /// sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the database cannot be
    /// opened, or the migration fails
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let in_memory = database_url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::rejected(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        if !in_memory {
            if let Some(parent) = options
                .get_filename()
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
            {
                fs::create_dir_all(parent).await.map_err(|e| {
                    StoreError::unavailable(format!(
                        "create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(acquire_timeout);
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("open database", e))?;

        let store = Self::new(pool);
        store.migrate().await?;
        info!(in_memory, "nutrition store ready");
        Ok(store)
    }

    /// Fresh in-memory store with the schema applied
    ///
    /// # Errors
    ///
    /// Returns an error if the migration fails
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1, Duration::from_secs(30)).await
    }

    /// Underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table the store uses
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> Result<(), StoreError> {
        self.migrate_foods().await?;
        self.migrate_checks().await?;
        self.migrate_exposures().await?;
        self.migrate_recipes().await?;
        debug!("nutrition store schema up to date");
        Ok(())
    }

    async fn migrate_foods(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS foods (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL CHECK (category IN ('fruta', 'verdura', 'proteina', 'cereal')),
                allergen INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create foods table", e))?;
        Ok(())
    }

    async fn migrate_checks(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS checks (
                date TEXT NOT NULL,
                food_id INTEGER NOT NULL REFERENCES foods(id) ON DELETE CASCADE,
                meal TEXT NOT NULL,
                checked INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (date, food_id, meal)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create checks table", e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_checks_date ON checks(date)")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create checks index", e))?;
        Ok(())
    }

    async fn migrate_exposures(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exposures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                food_id INTEGER NOT NULL REFERENCES foods(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                notes TEXT,
                outcome TEXT CHECK (outcome IN ('ok', 'dudoso', 'malo')),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create exposures table", e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exposures_date ON exposures(date)")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create exposures index", e))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS trial_outcomes (
                food_id INTEGER PRIMARY KEY REFERENCES foods(id) ON DELETE CASCADE,
                outcome TEXT NOT NULL CHECK (outcome IN ('ok', 'dudoso', 'malo')),
                tolerated INTEGER NOT NULL DEFAULT 0,
                recorded_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create trial_outcomes table", e))?;
        Ok(())
    }

    async fn migrate_recipes(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                title_key TEXT NOT NULL UNIQUE,
                suitable_from INTEGER NOT NULL,
                steps TEXT NOT NULL,
                freeze_ok INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create recipes table", e))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_foods (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                food_id INTEGER NOT NULL REFERENCES foods(id) ON DELETE CASCADE,
                PRIMARY KEY (recipe_id, food_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create recipe_foods table", e))?;
        Ok(())
    }

    /// Look a food up by its lowercased, trimmed name
    async fn food_by_key(&self, key: &str) -> Result<Option<Food>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, name, category, allergen
            FROM foods
            WHERE name_key = $1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get food by name", e))?;

        row.map(|r| row_to_food(&r)).transpose()
    }

    async fn recipe_food_ids(&self, recipe_id: i64) -> Result<BTreeSet<FoodId>, StoreError> {
        let rows = sqlx::query("SELECT food_id FROM recipe_foods WHERE recipe_id = $1")
            .bind(recipe_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list recipe ingredients", e))?;

        rows.iter()
            .map(|r| {
                r.try_get::<i64, _>("food_id")
                    .map(FoodId)
                    .map_err(|e| decode_error("food_id", &e))
            })
            .collect()
    }
}

#[async_trait]
impl NutritionStore for SqliteStore {
    async fn list_foods(&self, category: Option<FoodCategory>) -> Result<Vec<Food>, StoreError> {
        let rows = match category {
            Some(category) => {
                sqlx::query(
                    r"
                    SELECT id, name, category, allergen
                    FROM foods
                    WHERE category = $1
                    ORDER BY name ASC
                    ",
                )
                .bind(category.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, name, category, allergen
                    FROM foods
                    ORDER BY category ASC, name ASC
                    ",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| map_sqlx_error("list foods", e))?;

        rows.iter().map(row_to_food).collect()
    }

    async fn upsert_food(&self, food: &NewFood) -> Result<(Food, bool), StoreError> {
        // SQLite NOCASE only folds ASCII, so the key is lowercased here
        let name = food.name.trim();
        let key = food.natural_key();
        if let Some(existing) = self.food_by_key(&key).await? {
            return Ok((existing, false));
        }

        let result = sqlx::query(
            r"
            INSERT INTO foods (name, name_key, category, allergen)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(name_key) DO NOTHING
            ",
        )
        .bind(name)
        .bind(&key)
        .bind(food.category.as_str())
        .bind(food.allergen)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert food", e))?;

        let created = result.rows_affected() > 0;
        let stored = self
            .food_by_key(&key)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                resource: "food",
                id: name.to_owned(),
            })?;
        Ok((stored, created))
    }

    async fn list_checks(&self, range: DateRange) -> Result<Vec<RawCheckRow>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT c.date, c.food_id, f.name AS food_name, c.meal, c.checked
            FROM checks c
            LEFT JOIN foods f ON f.id = c.food_id
            WHERE substr(c.date, 1, 10) BETWEEN $1 AND $2
            ORDER BY c.date ASC, c.updated_at ASC
            ",
        )
        .bind(range.from.format(DATE_FORMAT).to_string())
        .bind(range.to.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list checks", e))?;

        rows.iter().map(row_to_raw_check).collect()
    }

    async fn upsert_check(
        &self,
        date: NaiveDate,
        food_id: FoodId,
        meal: Meal,
        checked: bool,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO checks (date, food_id, meal, checked, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(date, food_id, meal) DO UPDATE SET
                checked = excluded.checked,
                updated_at = excluded.updated_at
            ",
        )
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(food_id.get())
        .bind(meal.as_str())
        .bind(checked)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("upsert check", food_id, e))?;
        Ok(())
    }

    async fn list_exposures(&self, range: DateRange) -> Result<Vec<ExposureEvent>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT e.id, e.food_id, f.name AS food_name, e.date, e.notes, e.outcome, e.created_at
            FROM exposures e
            JOIN foods f ON f.id = e.food_id
            WHERE substr(e.date, 1, 10) BETWEEN $1 AND $2
            ORDER BY e.date ASC, e.created_at ASC, e.id ASC
            ",
        )
        .bind(range.from.format(DATE_FORMAT).to_string())
        .bind(range.to.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list exposures", e))?;

        rows.iter().map(row_to_exposure).collect()
    }

    async fn create_exposure(
        &self,
        date: NaiveDate,
        food_id: FoodId,
        notes: Option<&str>,
    ) -> Result<ExposureEvent, StoreError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO exposures (food_id, date, notes, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(food_id.get())
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(notes)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("create exposure", food_id, e))?;

        let row = sqlx::query(
            r"
            SELECT e.id, e.food_id, f.name AS food_name, e.date, e.notes, e.outcome, e.created_at
            FROM exposures e
            JOIN foods f ON f.id = e.food_id
            WHERE e.id = $1
            ",
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get created exposure", e))?;

        row_to_exposure(&row)
    }

    async fn set_exposure_outcome(
        &self,
        food_id: FoodId,
        outcome: Outcome,
    ) -> Result<(), StoreError> {
        let recorded_at = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO trial_outcomes (food_id, outcome, tolerated, recorded_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(food_id) DO UPDATE SET
                outcome = excluded.outcome,
                tolerated = MAX(trial_outcomes.tolerated, excluded.tolerated),
                recorded_at = excluded.recorded_at
            ",
        )
        .bind(food_id.get())
        .bind(outcome.as_str())
        .bind(outcome.is_tolerated())
        .bind(&recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("set trial outcome", food_id, e))?;

        // The latest exposure carries the outcome too
        sqlx::query(
            r"
            UPDATE exposures SET outcome = $1
            WHERE id = (
                SELECT id FROM exposures
                WHERE food_id = $2
                ORDER BY date DESC, created_at DESC, id DESC
                LIMIT 1
            )
            ",
        )
        .bind(outcome.as_str())
        .bind(food_id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("set exposure outcome", food_id, e))?;
        Ok(())
    }

    async fn list_trial_outcomes(&self) -> Result<Vec<TrialOutcome>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT food_id, outcome, tolerated, recorded_at
            FROM trial_outcomes
            ORDER BY food_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list trial outcomes", e))?;

        rows.iter().map(row_to_trial_outcome).collect()
    }

    async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, StoreError> {
        let mut conditions = Vec::new();
        if filter.suitable_to_month.is_some() {
            conditions.push("r.suitable_from <= ?");
        }
        if filter.food_id.is_some() {
            conditions.push("EXISTS (SELECT 1 FROM recipe_foods rf WHERE rf.recipe_id = r.id AND rf.food_id = ?)");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            r"
            SELECT r.id, r.title, r.suitable_from, r.steps, r.freeze_ok
            FROM recipes r
            {where_clause}
            ORDER BY r.suitable_from ASC, r.title ASC
            "
        );

        let mut sql_query = sqlx::query(&query);
        if let Some(month) = filter.suitable_to_month {
            sql_query = sql_query.bind(i64::from(month));
        }
        if let Some(food_id) = filter.food_id {
            sql_query = sql_query.bind(food_id.get());
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list recipes", e))?;

        let mut recipes = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut recipe = row_to_recipe(row)?;
            recipe.ingredient_food_ids = self.recipe_food_ids(recipe.id).await?;
            recipes.push(recipe);
        }
        Ok(recipes)
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin recipe transaction", e))?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (title, title_key, suitable_from, steps, freeze_ok, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(recipe.title.trim())
        .bind(recipe.title.trim().to_lowercase())
        .bind(i64::from(recipe.suitable_from_month))
        .bind(recipe.steps.trim())
        .bind(recipe.freeze_ok)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert recipe", e))?;
        let recipe_id = result.last_insert_rowid();

        for food_id in &recipe.food_ids {
            sqlx::query("INSERT INTO recipe_foods (recipe_id, food_id) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(food_id.get())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_write_error("link recipe ingredient", *food_id, e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit recipe transaction", e))?;

        Ok(Recipe {
            id: recipe_id,
            title: recipe.title.trim().to_owned(),
            suitable_from_month: recipe.suitable_from_month,
            steps: recipe.steps.trim().to_owned(),
            freeze_ok: recipe.freeze_ok,
            ingredient_food_ids: recipe.food_ids.clone(),
        })
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn map_sqlx_error(context: &str, error: sqlx::Error) -> StoreError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::unavailable(format!("{context}: {error}"))
        }
        sqlx::Error::RowNotFound => StoreError::NotFound {
            resource: "row",
            id: context.to_owned(),
        },
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => StoreError::Decode {
            field: "row",
            context: format!("{context}: {error}"),
        },
        other => StoreError::rejected(format!("{context}: {other}")),
    }
}

/// Like [`map_sqlx_error`], but reports a foreign key violation as a missing food
fn map_write_error(context: &str, food_id: FoodId, error: sqlx::Error) -> StoreError {
    let is_fk = error
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if is_fk {
        StoreError::NotFound {
            resource: "food",
            id: food_id.to_string(),
        }
    } else {
        map_sqlx_error(context, error)
    }
}

fn decode_error(field: &'static str, error: &sqlx::Error) -> StoreError {
    StoreError::Decode {
        field,
        context: error.to_string(),
    }
}

// ============================================================================
// Row decoding
// ============================================================================

fn get<'r, T>(row: &'r SqliteRow, field: &'static str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(field).map_err(|e| decode_error(field, &e))
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, StoreError> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|e| StoreError::Decode {
        field,
        context: format!("{raw}: {e}"),
    })
}

fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode {
            field,
            context: format!("{raw}: {e}"),
        })
}

fn parse_outcome(raw: &str) -> Result<Outcome, StoreError> {
    Outcome::parse(raw).ok_or_else(|| StoreError::Decode {
        field: "outcome",
        context: format!("unknown outcome {raw}"),
    })
}

fn row_to_food(row: &SqliteRow) -> Result<Food, StoreError> {
    let category: String = get(row, "category")?;
    Ok(Food {
        id: FoodId(get(row, "id")?),
        name: get(row, "name")?,
        category: FoodCategory::parse(&category).ok_or_else(|| StoreError::Decode {
            field: "category",
            context: format!("unknown category {category}"),
        })?,
        allergen: get(row, "allergen")?,
    })
}

fn row_to_raw_check(row: &SqliteRow) -> Result<RawCheckRow, StoreError> {
    let checked: Option<i64> = get(row, "checked")?;
    Ok(RawCheckRow {
        date: get(row, "date")?,
        food_id: FoodId(get(row, "food_id")?),
        food_name: get(row, "food_name")?,
        meal: get(row, "meal")?,
        checked: checked.map_or(Value::Null, Value::from),
    })
}

fn row_to_exposure(row: &SqliteRow) -> Result<ExposureEvent, StoreError> {
    let date: String = get(row, "date")?;
    let created_at: String = get(row, "created_at")?;
    let outcome: Option<String> = get(row, "outcome")?;
    Ok(ExposureEvent {
        id: get(row, "id")?,
        food_id: FoodId(get(row, "food_id")?),
        food_name: get(row, "food_name")?,
        date: parse_date("date", &date)?,
        notes: get(row, "notes")?,
        outcome: outcome.as_deref().map(parse_outcome).transpose()?,
        created_at: parse_timestamp("created_at", &created_at)?,
    })
}

fn row_to_trial_outcome(row: &SqliteRow) -> Result<TrialOutcome, StoreError> {
    let outcome: String = get(row, "outcome")?;
    let recorded_at: String = get(row, "recorded_at")?;
    Ok(TrialOutcome {
        food_id: FoodId(get(row, "food_id")?),
        outcome: parse_outcome(&outcome)?,
        tolerated: get(row, "tolerated")?,
        recorded_at: parse_timestamp("recorded_at", &recorded_at)?,
    })
}

fn row_to_recipe(row: &SqliteRow) -> Result<Recipe, StoreError> {
    let suitable_from: i64 = get(row, "suitable_from")?;
    Ok(Recipe {
        id: get(row, "id")?,
        title: get(row, "title")?,
        suitable_from_month: u32::try_from(suitable_from).map_err(|e| StoreError::Decode {
            field: "suitable_from",
            context: e.to_string(),
        })?,
        steps: get(row, "steps")?,
        freeze_ok: get(row, "freeze_ok")?,
        ingredient_food_ids: BTreeSet::new(),
    })
}
