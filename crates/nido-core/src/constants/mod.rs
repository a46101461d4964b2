// ABOUTME: Application-wide constants for exposure trials, recipes, and notes
// ABOUTME: Keeps protocol numbers and wire formatting in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! Constants grouped by the component that owns them.

/// Allergen exposure trial protocol
pub mod trials {
    /// Number of distinct days a food is offered before it is assessed
    pub const TRIAL_DAYS: usize = 3;

    /// Default lookback window when listing trials
    pub const DEFAULT_WINDOW_DAYS: u32 = 45;
}

/// Recipe suitability bounds
pub mod suitability {
    /// Youngest age in months the recipe filter supports
    pub const MIN_MONTH: u32 = 4;

    /// Oldest age in months the recipe filter supports
    pub const MAX_MONTH: u32 = 12;

    /// Upper bound accepted for `suitable_from_month` on new recipes
    pub const MAX_RECIPE_MONTH: u32 = 24;
}

/// Exposure note formatting
pub mod notes {
    /// Prefix placed before the time of day in exposure notes
    pub const TIME_LABEL_PREFIX: &str = "Hora: ";

    /// Separator between note parts
    pub const SEPARATOR: &str = " · ";
}

/// Service identification for logging
pub mod service_names {
    /// Service name used in structured logs
    pub const NIDO: &str = "nido";
}
