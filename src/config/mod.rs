// ABOUTME: Configuration management module for the feeding tracker
// ABOUTME: Re-exports the environment-driven application configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

//! Configuration is read from environment variables only.

/// Environment variable parsing
pub mod environment;

pub use environment::{DatabaseConfig, Environment, NidoConfig};
