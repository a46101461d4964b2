// ABOUTME: Command implementations for nido-cli
// ABOUTME: Shared context plus catalog, calendar, trial, and recipe commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

pub mod calendar;
pub mod catalog;
pub mod recipes;
pub mod trials;

use std::sync::Arc;

use chrono::NaiveDate;
use nido::config::NidoConfig;
use nido::database::SqliteStore;

/// Everything a command needs
pub struct Context {
    pub store: Arc<SqliteStore>,
    pub today: NaiveDate,
    pub json: bool,
    pub config: NidoConfig,
}
