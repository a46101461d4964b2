// ABOUTME: Error types shared across the Nido crate
// ABOUTME: Re-exports the core error taxonomy so services and binaries use one path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

pub use nido_core::errors::*;
