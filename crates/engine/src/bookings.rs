// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-instructor serialization of booking decisions
//!
//! A conflict check followed by a commit is a check-then-act race: two
//! concurrent bookings for the same instructor could both scan a clean
//! calendar and both land. Every scan-and-commit runs inside the critical
//! section keyed by the instructor id, so the scan is still true at commit.

use rota_core::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Lazily-created lock registry, one lock per instructor
#[derive(Clone, Default)]
pub struct InstructorLocks {
    locks: Arc<Mutex<HashMap<UserId, Arc<Mutex<()>>>>>,
}

impl InstructorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the instructor's booking lock
    pub fn with_booking<T>(&self, instructor: &UserId, f: impl FnOnce() -> T) -> T {
        let slot = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks
                .entry(instructor.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = slot.lock().unwrap_or_else(|e| e.into_inner());
        f()
    }
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
