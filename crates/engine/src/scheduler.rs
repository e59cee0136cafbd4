// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session scheduler
//!
//! Owns the session lifecycle: validated creation, reschedule, cancel,
//! start, and completion with exactly-once progress propagation. All
//! mutations for one instructor run under that instructor's booking lock,
//! so the conflict scan is still true when the commit lands.

use crate::adapters::{CourseCatalog, Directory};
use crate::bookings::InstructorLocks;
use crate::error::{EngineError, Result};
use crate::log_events;
use chrono::{DateTime, Utc};
use rota_core::{
    find_conflicts, overlaps, BookingProposal, Clock, CourseId, DomainError, Event, IdGen,
    Modality, SchedulingPolicy, Session, SessionId, SessionPatch, UserId, MAX_DURATION_MINUTES,
    MIN_DURATION_MINUTES,
};
use rota_storage::SessionStore;
use std::sync::Arc;

/// Seam through which completed sessions advance enrollment progress
pub trait ProgressTracker: Send + Sync {
    fn advance_progress(&self, student: &UserId, course: &CourseId, hours: f64) -> Result<()>;
}

/// Tracker for hosts that propagate progress elsewhere
#[derive(Clone, Default)]
pub struct NoOpProgressTracker;

impl ProgressTracker for NoOpProgressTracker {
    fn advance_progress(&self, _student: &UserId, _course: &CourseId, _hours: f64) -> Result<()> {
        Ok(())
    }
}

/// Input for a new session
#[derive(Clone, Debug)]
pub struct NewSession {
    pub course_id: CourseId,
    pub instructor_id: UserId,
    pub title: String,
    pub scheduled_start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub modality: Modality,
    pub participants: Vec<UserId>,
}

pub struct SessionScheduler<C: Clock, G: IdGen> {
    sessions: Arc<dyn SessionStore>,
    catalog: Arc<dyn CourseCatalog>,
    directory: Arc<dyn Directory>,
    progress: Arc<dyn ProgressTracker>,
    bookings: InstructorLocks,
    policy: SchedulingPolicy,
    clock: C,
    ids: G,
}

impl<C: Clock, G: IdGen> SessionScheduler<C, G> {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        catalog: Arc<dyn CourseCatalog>,
        directory: Arc<dyn Directory>,
        progress: Arc<dyn ProgressTracker>,
        policy: SchedulingPolicy,
        clock: C,
        ids: G,
    ) -> Self {
        Self {
            sessions,
            catalog,
            directory,
            progress,
            bookings: InstructorLocks::new(),
            policy,
            clock,
            ids,
        }
    }

    /// Validate, conflict-check, and commit a new session in Scheduled state
    pub fn create_session(&self, input: NewSession) -> Result<Session> {
        validate_title(&input.title)?;
        validate_duration(input.duration_minutes)?;
        validate_modality(&input.modality)?;
        validate_start(input.scheduled_start, self.clock.now())?;

        let course = self.catalog.get_course(&input.course_id)?;
        if !self.directory.is_instructor(&input.instructor_id) {
            return Err(not_found("instructor", &input.instructor_id));
        }
        if course.instructor_id != input.instructor_id {
            return Err(DomainError::validation(
                "instructor_id",
                format!(
                    "course {} is taught by {}, not {}",
                    input.course_id, course.instructor_id, input.instructor_id
                ),
            )
            .into());
        }
        if !course.status.is_open() {
            return Err(DomainError::invalid_state("create_session", course.status.label()).into());
        }
        for student in &input.participants {
            if !self.directory.is_student(student) {
                return Err(not_found("student", student));
            }
        }

        let instructor = input.instructor_id.clone();
        self.bookings.with_booking(&instructor, || {
            let proposal = BookingProposal::create(
                instructor.clone(),
                input.course_id.clone(),
                input.scheduled_start,
                input.duration_minutes,
            );
            self.check_conflicts(&proposal)?;

            let session = Session::new(
                self.ids.next(),
                input.course_id.clone(),
                instructor.clone(),
                input.title.clone(),
                input.scheduled_start,
                input.duration_minutes,
                input.modality.clone(),
                &self.clock,
            )
            .with_participants(input.participants.iter().cloned());
            self.sessions.put(&session)?;
            log_events(&[Event::SessionScheduled {
                id: session.id.clone(),
                instructor: instructor.clone(),
                start: session.scheduled_start,
            }]);
            Ok(session)
        })
    }

    /// Re-validate and re-check conflicts (excluding the session itself),
    /// then commit the patch. Only legal while Scheduled.
    pub fn reschedule(&self, id: &SessionId, patch: SessionPatch) -> Result<Session> {
        let instructor = self.load(id)?.instructor_id;
        self.bookings.with_booking(&instructor, || {
            let session = self.load(id)?;
            let (updated, events) = session.reschedule(&patch)?;

            validate_title(&updated.title)?;
            validate_duration(updated.duration_minutes)?;
            validate_modality(&updated.modality)?;
            validate_start(updated.scheduled_start, self.clock.now())?;

            let proposal = BookingProposal::create(
                instructor.clone(),
                updated.course_id.clone(),
                updated.scheduled_start,
                updated.duration_minutes,
            )
            .edit(updated.id.clone());
            self.check_conflicts(&proposal)?;

            self.sessions.put(&updated)?;
            log_events(&events);
            Ok(updated)
        })
    }

    /// Scheduled → InProgress
    pub fn start(&self, id: &SessionId) -> Result<Session> {
        self.transition(id, |session| session.start())
    }

    /// Cancel with an auditable reason; terminal, double-cancel fails
    pub fn cancel(&self, id: &SessionId, reason: &str) -> Result<Session> {
        self.transition(id, |session| session.cancel(reason, &self.clock))
    }

    /// Complete the session and propagate attended duration into enrollment
    /// progress, exactly once.
    ///
    /// The Completed transition commits before any propagation; a second
    /// call fails InvalidState at the transition, so propagation can never
    /// run twice.
    pub fn complete(&self, id: &SessionId) -> Result<Session> {
        let completed = self.transition(id, |session| session.complete(&self.clock))?;

        let hours = completed.duration_hours();
        let mut first_err = None;
        for record in completed.attendance.values().filter(|r| r.present) {
            match self
                .progress
                .advance_progress(&record.student_id, &completed.course_id, hours)
            {
                Ok(()) => {}
                Err(EngineError::Domain(DomainError::NotFound { .. })) => {
                    tracing::warn!(
                        student = %record.student_id,
                        course = %completed.course_id,
                        "present student has no confirmed enrollment, progress not advanced"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        student = %record.student_id,
                        error = %err,
                        "progress propagation failed"
                    );
                    if first_err.is_none() {
                        first_err = Some(err);
                    }
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(completed),
        }
    }

    /// Add a student to a session that has not ended yet
    pub fn add_participant(&self, id: &SessionId, student: &UserId) -> Result<Session> {
        if !self.directory.is_student(student) {
            return Err(not_found("student", student));
        }
        self.transition(id, |session| session.add_participant(student.clone()))
    }

    pub fn remove_participant(&self, id: &SessionId, student: &UserId) -> Result<Session> {
        self.transition(id, |session| session.remove_participant(student))
    }

    /// Load, transition, and commit under the instructor's booking lock.
    ///
    /// The re-load inside the lock is what makes the state-transition guard
    /// a real fence under concurrent calls.
    fn transition(
        &self,
        id: &SessionId,
        apply: impl Fn(&Session) -> std::result::Result<(Session, Vec<Event>), DomainError>,
    ) -> Result<Session> {
        let instructor = self.load(id)?.instructor_id;
        self.bookings.with_booking(&instructor, || {
            let session = self.load(id)?;
            let (updated, events) = apply(&session)?;
            self.sessions.put(&updated)?;
            log_events(&events);
            Ok(updated)
        })
    }

    fn check_conflicts(&self, proposal: &BookingProposal) -> Result<()> {
        let candidates = self.sessions.active_for_instructor(&proposal.instructor_id)?;
        let conflicts = find_conflicts(&candidates, proposal, &self.policy);
        if conflicts.is_empty() {
            return Ok(());
        }
        Err(DomainError::Conflict {
            instructor: proposal.instructor_id.clone(),
            conflicting: conflicts.iter().map(|s| s.id.clone()).collect(),
        }
        .into())
    }

    fn load(&self, id: &SessionId) -> Result<Session> {
        self.sessions
            .get(id)?
            .ok_or_else(|| not_found("session", id))
    }

    /// Invariant check over the committed calendar, used by tests and
    /// host-side audits: no two active sessions of one instructor overlap,
    /// modulo the shared-start/same-course exemption when the policy
    /// allows it.
    pub fn verify_no_overlaps(&self, instructor: &UserId) -> Result<bool> {
        let active = self.sessions.active_for_instructor(instructor)?;
        for (i, a) in active.iter().enumerate() {
            for b in active.iter().skip(i + 1) {
                let exempt = self.policy.allow_shared_start_same_course
                    && a.scheduled_start == b.scheduled_start
                    && a.course_id == b.course_id;
                if !exempt
                    && overlaps(a.scheduled_start, a.duration(), b.scheduled_start, b.duration())
                {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

fn not_found(kind: &'static str, id: &impl std::fmt::Display) -> EngineError {
    DomainError::not_found(kind, id.to_string()).into()
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title", "title must not be empty").into());
    }
    Ok(())
}

fn validate_duration(minutes: i64) -> Result<()> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(DomainError::validation(
            "duration_minutes",
            format!(
                "duration must be {}-{} minutes (got {})",
                MIN_DURATION_MINUTES, MAX_DURATION_MINUTES, minutes
            ),
        )
        .into());
    }
    Ok(())
}

fn validate_modality(modality: &Modality) -> Result<()> {
    match modality {
        Modality::InPerson { location } => {
            if location.trim().is_empty() {
                return Err(DomainError::validation(
                    "location",
                    "in-person sessions require a location",
                )
                .into());
            }
        }
        Modality::Virtual { meeting_link } => {
            if !(meeting_link.starts_with("https://") || meeting_link.starts_with("http://")) {
                return Err(DomainError::validation(
                    "meeting_link",
                    format!("virtual sessions require an http(s) link (got {:?})", meeting_link),
                )
                .into());
            }
        }
    }
    Ok(())
}

fn validate_start(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if start < now {
        return Err(DomainError::validation(
            "scheduled_start",
            "sessions cannot be scheduled in the past",
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
