// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine services

use rota_core::DomainError;
use rota_storage::StorageError;
use thiserror::Error;

/// Failures surfaced by the engine services.
///
/// Domain failures pass through unchanged so callers can match on the
/// taxonomy; storage failures stay distinct because only the host decides
/// whether they are retryable.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl EngineError {
    /// The domain failure, if this is one
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain(err) => Some(err),
            EngineError::Storage(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
