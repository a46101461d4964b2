// ABOUTME: Environment configuration for the feeding tracker
// ABOUTME: Parses database, age clock, and trial window settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! Environment-based configuration

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use nido_core::constants::trials::DEFAULT_WINDOW_DAYS;
use nido_core::errors::{AppError, AppResult, ErrorCode};
use nido_core::models::Meal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default pool size for file-backed databases
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default pool acquire timeout in seconds
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Real household use
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(&self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL
    pub url: String,
    /// Maximum pool size; in-memory databases always use one connection
    pub max_connections: u32,
    /// How long to wait for a pooled connection
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Default URL under the user's data directory, or memory if there is none
    #[must_use]
    pub fn default_url() -> String {
        dirs::data_dir().map_or_else(
            || "sqlite::memory:".to_owned(),
            |dir| format!("sqlite:{}", default_database_path(dir).display()),
        )
    }

    /// Whether the URL points at an in-memory database
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

fn default_database_path(data_dir: PathBuf) -> PathBuf {
    data_dir.join("nido").join("nido.db")
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NidoConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Database settings
    pub database: DatabaseConfig,
    /// Baby's birth date; recipe suitability needs it
    pub birth_date: Option<NaiveDate>,
    /// Lookback window for trial listings, in days
    pub exposure_window_days: u32,
    /// Meal used when a command does not name one
    pub default_meal: Meal,
}

impl Default for NidoConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            database: DatabaseConfig::default(),
            birth_date: None,
            exposure_window_days: DEFAULT_WINDOW_DAYS,
            default_meal: Meal::Lunch,
        }
    }
}

impl NidoConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if a variable is set to an unparseable value
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if a variable is set to an unparseable value
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let environment = value("ENVIRONMENT")
            .map(|v| Environment::from_str_or_default(&v))
            .unwrap_or_default();

        let database = DatabaseConfig {
            url: value("DATABASE_URL").unwrap_or_else(DatabaseConfig::default_url),
            max_connections: parse_or(
                "NIDO_DB_MAX_CONNECTIONS",
                value("NIDO_DB_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            acquire_timeout: Duration::from_secs(parse_or(
                "NIDO_DB_ACQUIRE_TIMEOUT_SECS",
                value("NIDO_DB_ACQUIRE_TIMEOUT_SECS"),
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?),
        };

        let birth_date = value("NIDO_BIRTH_DATE")
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                    AppError::config(format!("NIDO_BIRTH_DATE must be YYYY-MM-DD, got {raw}: {e}"))
                })
            })
            .transpose()?;

        let exposure_window_days = parse_or(
            "NIDO_EXPOSURE_WINDOW_DAYS",
            value("NIDO_EXPOSURE_WINDOW_DAYS"),
            DEFAULT_WINDOW_DAYS,
        )?;
        if exposure_window_days == 0 {
            return Err(AppError::config("NIDO_EXPOSURE_WINDOW_DAYS must be positive"));
        }

        let default_meal = match value("NIDO_DEFAULT_MEAL") {
            Some(raw) => Meal::parse(&raw)
                .ok_or_else(|| AppError::config(format!("NIDO_DEFAULT_MEAL: unknown meal {raw}")))?,
            None => Meal::Lunch,
        };

        let config = Self {
            environment,
            database,
            birth_date,
            exposure_window_days,
            default_meal,
        };
        debug!(
            environment = %config.environment,
            database.url = %config.database.url,
            exposure_window_days = config.exposure_window_days,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Birth date, or a configuration error naming the variable to set
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when no birth date is configured
    pub fn require_birth_date(&self) -> AppResult<NaiveDate> {
        self.birth_date.ok_or_else(|| {
            AppError::new(ErrorCode::ConfigMissing, "NIDO_BIRTH_DATE is not set")
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|e| AppError::config(format!("{key}: invalid value {raw}: {e}")))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> AppResult<NidoConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        NidoConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = config_from(&[("DATABASE_URL", "sqlite::memory:")]).unwrap();
        assert_eq!(config.exposure_window_days, 45);
        assert_eq!(config.default_meal, Meal::Lunch);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(30));
        assert!(config.database.is_memory());
        assert!(config.birth_date.is_none());
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_values_are_parsed() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite:/tmp/nido.db"),
            ("NIDO_BIRTH_DATE", "2025-02-11"),
            ("NIDO_EXPOSURE_WINDOW_DAYS", "60"),
            ("NIDO_DEFAULT_MEAL", "cena"),
            ("ENVIRONMENT", "test"),
        ])
        .unwrap();
        assert_eq!(config.birth_date, NaiveDate::from_ymd_opt(2025, 2, 11));
        assert_eq!(config.exposure_window_days, 60);
        assert_eq!(config.default_meal, Meal::Dinner);
        assert!(config.environment.is_testing());
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = config_from(&[("NIDO_BIRTH_DATE", "11/02/2025")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid);

        let err = config_from(&[("NIDO_EXPOSURE_WINDOW_DAYS", "zero")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid);

        let err = config_from(&[("NIDO_DEFAULT_MEAL", "brunch")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_missing_birth_date_is_reported() {
        let config = config_from(&[]).unwrap();
        let err = config.require_birth_date().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissing);
    }

    #[test]
    fn test_default_database_path_is_namespaced() {
        let path = default_database_path(PathBuf::from("/data"));
        assert_eq!(path, PathBuf::from("/data/nido/nido.db"));
    }
}
