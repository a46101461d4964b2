// ABOUTME: Errors returned by the persistence collaborator
// ABOUTME: Structured store failures with conversion into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use thiserror::Error;

use super::{AppError, ErrorCode};

/// Failure of a single collaborator call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The collaborator could not be reached or timed out
    #[error("store unavailable: {context}")]
    Unavailable {
        /// What was being attempted
        context: String,
    },

    /// A referenced record does not exist
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of record
        resource: &'static str,
        /// Identifier looked up
        id: String,
    },

    /// The collaborator refused the write
    #[error("store rejected the request: {context}")]
    Rejected {
        /// Reason given
        context: String,
    },

    /// A stored value could not be decoded
    #[error("could not decode {field}: {context}")]
    Decode {
        /// Column or field that failed
        field: &'static str,
        /// Decoder message
        context: String,
    },
}

impl StoreError {
    /// Build an `Unavailable` error
    pub fn unavailable(context: impl Into<String>) -> Self {
        Self::Unavailable {
            context: context.into(),
        }
    }

    /// Build a `Rejected` error
    pub fn rejected(context: impl Into<String>) -> Self {
        Self::Rejected {
            context: context.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        let code = match &error {
            StoreError::Unavailable { .. } => ErrorCode::ExternalServiceUnavailable,
            StoreError::NotFound { .. } => ErrorCode::ResourceNotFound,
            StoreError::Rejected { .. } => ErrorCode::ExternalServiceError,
            StoreError::Decode { .. } => ErrorCode::SerializationError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}
