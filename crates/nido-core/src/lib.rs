// ABOUTME: Core types and constants for the Nido complementary feeding tracker
// ABOUTME: Foundation crate with domain models, error handling, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

#![deny(unsafe_code)]

//! # Nido Core
//!
//! Foundation crate providing shared types and constants for the Nido
//! feeding tracker. The algorithms crate and the root crate both build on
//! these types, so this crate is kept free of I/O.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `StoreError`
//! - **constants**: Trial, suitability, and note-formatting constants
//! - **models**: Foods, exposures, check entries, recipes, and store operations

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Food, ExposureEvent, CheckEntry, Recipe, etc.)
pub mod models;
