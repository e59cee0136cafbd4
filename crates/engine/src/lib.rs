// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rota scheduling engine
//!
//! The services over the domain core: session scheduling with per-instructor
//! conflict serialization, enrollment lifecycle with the roster mirror,
//! attendance recording with progress propagation, and the derived calendar
//! projection. External identity and catalog lookups come in through the
//! adapter traits.

mod adapters;
mod bookings;
mod enrollment;
mod error;
mod ledger;
mod projector;
mod queries;
mod scheduler;

pub use adapters::{CourseCatalog, Directory, FakeDirectory, StoreCatalog};
pub use bookings::InstructorLocks;
pub use enrollment::EnrollmentManager;
pub use error::{EngineError, Result};
pub use ledger::{AttendanceEntry, AttendanceLedger};
pub use projector::CalendarProjector;
pub use queries::{Queries, SessionFilter};
pub use scheduler::{NewSession, NoOpProgressTracker, ProgressTracker, SessionScheduler};

use rota_core::Event;

pub(crate) fn log_events(events: &[Event]) {
    for event in events {
        tracing::info!(event = event.name(), detail = ?event, "domain event");
    }
}
