// ABOUTME: Aggregated report for a fan-out batch where some operations failed
// ABOUTME: Names failed operations and lists those that were applied and kept
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use serde::{Deserialize, Serialize};

use crate::models::StoreOperation;

/// One operation that did not apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedOperation {
    /// The operation as dispatched
    pub operation: StoreOperation,
    /// Error reported by the collaborator
    pub reason: String,
}

/// Outcome of a batch in which at least one operation failed
///
/// Applied operations are not compensated; they stay in `applied`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Operations that failed
    pub failed: Vec<FailedOperation>,
    /// Operations that were applied
    pub applied: Vec<StoreOperation>,
}

impl BatchFailure {
    /// Total number of operations in the batch
    #[must_use]
    pub fn total(&self) -> usize {
        self.failed.len() + self.applied.len()
    }

    /// One-line summary naming every failed operation
    #[must_use]
    pub fn summary(&self) -> String {
        let names = self
            .failed
            .iter()
            .map(|f| format!("{} ({})", f.operation, f.reason))
            .collect::<Vec<_>>()
            .join("; ");
        format!(
            "{} of {} operations failed: {names}",
            self.failed.len(),
            self.total()
        )
    }
}
