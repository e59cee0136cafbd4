// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed failure taxonomy for every core operation
//!
//! All variants are returned to the caller; nothing is swallowed and the
//! core never retries. Storage-layer failures are a separate type owned by
//! the storage crate.

use crate::id::UserId;
use crate::session::SessionId;
use thiserror::Error;

/// Domain failures surfaced by entity transitions and engine services
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Malformed or out-of-range input, recoverable by the caller
    #[error("validation failed for {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// A referenced entity is absent
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A proposed booking overlaps active sessions of the same instructor
    #[error("schedule conflict for instructor {instructor}: {n} overlapping session(s)", n = .conflicting.len())]
    Conflict {
        instructor: UserId,
        conflicting: Vec<SessionId>,
    },

    /// Unique-constraint violation, e.g. double enrollment
    #[error("duplicate {kind}: {detail}")]
    Duplicate { kind: &'static str, detail: String },

    /// Operation not legal in the entity's current lifecycle state
    #[error("{operation} not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    /// Actor lacks rights over the resource
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Time-boxed self-service action attempted too late
    #[error("window expired: {0}")]
    WindowExpired(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_state(operation: &'static str, state: impl Into<String>) -> Self {
        Self::InvalidState {
            operation,
            state: state.into(),
        }
    }
}
