// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session state machine
//!
//! A session is one scheduled teaching instance: an instructor, a start
//! time, a duration, and a set of participating students. Transitions are
//! pure functions returning the new session plus the events it implies;
//! illegal transitions fail with a typed error instead of silently
//! no-opping, so the services can surface them.

use crate::attendance::AttendanceRecord;
use crate::clock::Clock;
use crate::course::CourseId;
use crate::error::DomainError;
use crate::event::Event;
use crate::id::UserId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Shortest bookable session
pub const MIN_DURATION_MINUTES: i64 = 30;
/// Longest bookable session
pub const MAX_DURATION_MINUTES: i64 = 180;
/// Cancellation reasons must carry enough context to audit
pub const MIN_CANCEL_REASON_CHARS: usize = 10;
pub const MAX_CANCEL_REASON_CHARS: usize = 300;

/// Unique identifier for a session
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        SessionId(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_string())
    }
}

/// Where a session takes place.
///
/// The location-XOR-link rule is structural: an in-person session carries a
/// location, a virtual one carries a meeting link. The contents are still
/// validated by the scheduler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modality {
    InPerson { location: String },
    Virtual { meeting_link: String },
}

impl Modality {
    pub fn kind(&self) -> &'static str {
        match self {
            Modality::InPerson { .. } => "in_person",
            Modality::Virtual { .. } => "virtual",
        }
    }

    /// The location or meeting link, whichever this modality carries
    pub fn venue(&self) -> &str {
        match self {
            Modality::InPerson { location } => location,
            Modality::Virtual { meeting_link } => meeting_link,
        }
    }
}

/// The lifecycle state of a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Scheduled,
    InProgress,
    Completed { completed_at: DateTime<Utc> },
    Cancelled { reason: String, cancelled_at: DateTime<Utc> },
}

/// Discriminant-only view of a session state, for filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionState {
    pub fn kind(&self) -> StateKind {
        match self {
            SessionState::Scheduled => StateKind::Scheduled,
            SessionState::InProgress => StateKind::InProgress,
            SessionState::Completed { .. } => StateKind::Completed,
            SessionState::Cancelled { .. } => StateKind::Cancelled,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.kind() {
            StateKind::Scheduled => "scheduled",
            StateKind::InProgress => "in_progress",
            StateKind::Completed => "completed",
            StateKind::Cancelled => "cancelled",
        }
    }
}

/// Mutable fields of a scheduled session, applied by reschedule
#[derive(Clone, Debug, Default)]
pub struct SessionPatch {
    pub title: Option<String>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub modality: Option<Modality>,
}

impl SessionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.scheduled_start = Some(start);
        self
    }

    pub fn with_duration_minutes(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = Some(modality);
        self
    }
}

/// A single scheduled teaching instance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub course_id: CourseId,
    pub instructor_id: UserId,
    pub title: String,
    pub scheduled_start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub modality: Modality,
    pub participants: BTreeSet<UserId>,
    pub state: SessionState,
    /// Keyed by student; attendance lives and dies with the session
    pub attendance: BTreeMap<UserId, AttendanceRecord>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session in the Scheduled state
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<SessionId>,
        course_id: impl Into<CourseId>,
        instructor_id: impl Into<UserId>,
        title: impl Into<String>,
        scheduled_start: DateTime<Utc>,
        duration_minutes: i64,
        modality: Modality,
        clock: &impl Clock,
    ) -> Self {
        Session {
            id: id.into(),
            course_id: course_id.into(),
            instructor_id: instructor_id.into(),
            title: title.into(),
            scheduled_start,
            duration_minutes,
            modality,
            participants: BTreeSet::new(),
            state: SessionState::Scheduled,
            attendance: BTreeMap::new(),
            created_at: clock.now(),
        }
    }

    pub fn with_participants(mut self, participants: impl IntoIterator<Item = UserId>) -> Self {
        self.participants = participants.into_iter().collect();
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes)
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes as f64 / 60.0
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.scheduled_start + self.duration()
    }

    /// Active sessions occupy the instructor's calendar
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            SessionState::Scheduled | SessionState::InProgress
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            SessionState::Completed { .. } | SessionState::Cancelled { .. }
        )
    }

    /// Scheduled → InProgress
    pub fn start(&self) -> Result<(Session, Vec<Event>), DomainError> {
        match self.state {
            SessionState::Scheduled => {
                let session = Session {
                    state: SessionState::InProgress,
                    ..self.clone()
                };
                let events = vec![Event::SessionStarted {
                    id: self.id.clone(),
                }];
                Ok((session, events))
            }
            _ => Err(DomainError::invalid_state("start", self.state.label())),
        }
    }

    /// Scheduled/InProgress → Completed.
    ///
    /// The transition is the exactly-once fence for progress propagation: a
    /// second call fails here, so propagation never runs twice.
    pub fn complete(&self, clock: &impl Clock) -> Result<(Session, Vec<Event>), DomainError> {
        if !self.is_active() {
            return Err(DomainError::invalid_state("complete", self.state.label()));
        }
        let completed_at = clock.now();
        let session = Session {
            state: SessionState::Completed { completed_at },
            ..self.clone()
        };
        let events = vec![Event::SessionCompleted {
            id: self.id.clone(),
            completed_at,
        }];
        Ok((session, events))
    }

    /// Scheduled/InProgress → Cancelled, terminal
    pub fn cancel(
        &self,
        reason: &str,
        clock: &impl Clock,
    ) -> Result<(Session, Vec<Event>), DomainError> {
        if !self.is_active() {
            return Err(DomainError::invalid_state("cancel", self.state.label()));
        }
        let reason = reason.trim();
        let chars = reason.chars().count();
        if !(MIN_CANCEL_REASON_CHARS..=MAX_CANCEL_REASON_CHARS).contains(&chars) {
            return Err(DomainError::validation(
                "reason",
                format!(
                    "cancellation reason must be {}-{} characters (got {})",
                    MIN_CANCEL_REASON_CHARS, MAX_CANCEL_REASON_CHARS, chars
                ),
            ));
        }
        let session = Session {
            state: SessionState::Cancelled {
                reason: reason.to_string(),
                cancelled_at: clock.now(),
            },
            ..self.clone()
        };
        let events = vec![Event::SessionCancelled {
            id: self.id.clone(),
            reason: reason.to_string(),
        }];
        Ok((session, events))
    }

    /// Apply a patch; only legal while Scheduled
    pub fn reschedule(&self, patch: &SessionPatch) -> Result<(Session, Vec<Event>), DomainError> {
        if self.state != SessionState::Scheduled {
            return Err(DomainError::invalid_state(
                "reschedule",
                self.state.label(),
            ));
        }
        let session = Session {
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            scheduled_start: patch.scheduled_start.unwrap_or(self.scheduled_start),
            duration_minutes: patch.duration_minutes.unwrap_or(self.duration_minutes),
            modality: patch
                .modality
                .clone()
                .unwrap_or_else(|| self.modality.clone()),
            ..self.clone()
        };
        let events = vec![Event::SessionRescheduled {
            id: session.id.clone(),
            start: session.scheduled_start,
        }];
        Ok((session, events))
    }

    /// Upsert one student's attendance record.
    ///
    /// Fails Forbidden for non-participants and InvalidState once the
    /// session is cancelled; completed sessions still accept corrections.
    pub fn record_attendance(
        &self,
        record: AttendanceRecord,
    ) -> Result<(Session, Vec<Event>), DomainError> {
        if matches!(self.state, SessionState::Cancelled { .. }) {
            return Err(DomainError::invalid_state(
                "record_attendance",
                self.state.label(),
            ));
        }
        if !self.participants.contains(&record.student_id) {
            return Err(DomainError::Forbidden(format!(
                "{} is not a participant of session {}",
                record.student_id, self.id
            )));
        }
        let mut session = self.clone();
        let events = vec![Event::AttendanceRecorded {
            id: self.id.clone(),
            student: record.student_id.clone(),
            present: record.present,
        }];
        session.attendance.insert(record.student_id.clone(), record);
        Ok((session, events))
    }

    /// Idempotent participant add; only legal while the session is active
    pub fn add_participant(
        &self,
        student: UserId,
    ) -> Result<(Session, Vec<Event>), DomainError> {
        if !self.is_active() {
            return Err(DomainError::invalid_state(
                "add_participant",
                self.state.label(),
            ));
        }
        let mut session = self.clone();
        let events = if session.participants.insert(student.clone()) {
            vec![Event::ParticipantAdded {
                id: self.id.clone(),
                student,
            }]
        } else {
            Vec::new()
        };
        Ok((session, events))
    }

    /// Remove a participant; only legal while the session is active
    pub fn remove_participant(
        &self,
        student: &UserId,
    ) -> Result<(Session, Vec<Event>), DomainError> {
        if !self.is_active() {
            return Err(DomainError::invalid_state(
                "remove_participant",
                self.state.label(),
            ));
        }
        let mut session = self.clone();
        let events = if session.participants.remove(student) {
            vec![Event::ParticipantRemoved {
                id: self.id.clone(),
                student: student.clone(),
            }]
        } else {
            Vec::new()
        };
        Ok((session, events))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
