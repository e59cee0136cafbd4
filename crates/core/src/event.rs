// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain events implied by entity transitions
//!
//! Transition functions return the events their state change implies; the
//! engine services log them with `tracing`. Tests match on them to assert
//! that a transition happened for the right reason.

use crate::course::CourseId;
use crate::enrollment::EnrollmentId;
use crate::id::UserId;
use crate::session::SessionId;
use chrono::{DateTime, Utc};

/// Events emitted by session, enrollment, and calendar transitions
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    SessionScheduled {
        id: SessionId,
        instructor: UserId,
        start: DateTime<Utc>,
    },
    SessionRescheduled {
        id: SessionId,
        start: DateTime<Utc>,
    },
    SessionStarted {
        id: SessionId,
    },
    SessionCompleted {
        id: SessionId,
        completed_at: DateTime<Utc>,
    },
    SessionCancelled {
        id: SessionId,
        reason: String,
    },
    ParticipantAdded {
        id: SessionId,
        student: UserId,
    },
    ParticipantRemoved {
        id: SessionId,
        student: UserId,
    },
    AttendanceRecorded {
        id: SessionId,
        student: UserId,
        present: bool,
    },
    EnrollmentRequested {
        id: EnrollmentId,
        student: UserId,
        course: CourseId,
    },
    EnrollmentConfirmed {
        id: EnrollmentId,
        student: UserId,
        course: CourseId,
    },
    EnrollmentCancelled {
        id: EnrollmentId,
        student: UserId,
        course: CourseId,
    },
    ProgressAdvanced {
        id: EnrollmentId,
        hours_completed: f64,
        percentage: f64,
    },
    CalendarEntryCreated {
        owner: UserId,
        session: SessionId,
    },
}

impl Event {
    /// Stable snake_case label for structured logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::SessionScheduled { .. } => "session_scheduled",
            Event::SessionRescheduled { .. } => "session_rescheduled",
            Event::SessionStarted { .. } => "session_started",
            Event::SessionCompleted { .. } => "session_completed",
            Event::SessionCancelled { .. } => "session_cancelled",
            Event::ParticipantAdded { .. } => "participant_added",
            Event::ParticipantRemoved { .. } => "participant_removed",
            Event::AttendanceRecorded { .. } => "attendance_recorded",
            Event::EnrollmentRequested { .. } => "enrollment_requested",
            Event::EnrollmentConfirmed { .. } => "enrollment_confirmed",
            Event::EnrollmentCancelled { .. } => "enrollment_cancelled",
            Event::ProgressAdvanced { .. } => "progress_advanced",
            Event::CalendarEntryCreated { .. } => "calendar_entry_created",
        }
    }
}
