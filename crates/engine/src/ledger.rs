// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attendance ledger
//!
//! Records per-student attendance on sessions and aggregates it into stats.
//! Staff record any participant at any time before cancellation; students
//! record themselves only inside the policy's self-service window.

use crate::error::Result;
use crate::log_events;
use rota_core::{
    AttendanceRecord, AttendanceStats, Clock, CourseId, DomainError, SchedulingPolicy, Session,
    SessionId, SessionState, UserId,
};
use rota_storage::{EnrollmentStore, SessionStore};
use std::sync::Arc;

/// One attendance row as submitted by the caller
#[derive(Clone, Debug)]
pub struct AttendanceEntry {
    pub student_id: UserId,
    pub present: bool,
    pub minutes_late: u32,
    pub comment: Option<String>,
}

impl AttendanceEntry {
    pub fn new(student_id: impl Into<UserId>, present: bool) -> Self {
        Self {
            student_id: student_id.into(),
            present,
            minutes_late: 0,
            comment: None,
        }
    }

    pub fn with_minutes_late(mut self, minutes: u32) -> Self {
        self.minutes_late = minutes;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

pub struct AttendanceLedger<C: Clock> {
    sessions: Arc<dyn SessionStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    policy: SchedulingPolicy,
    clock: C,
}

impl<C: Clock> AttendanceLedger<C> {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        policy: SchedulingPolicy,
        clock: C,
    ) -> Self {
        Self {
            sessions,
            enrollments,
            policy,
            clock,
        }
    }

    /// Upsert one attendance record on behalf of staff
    pub fn record_attendance(
        &self,
        session_id: &SessionId,
        entry: &AttendanceEntry,
        recorded_by: &UserId,
    ) -> Result<Session> {
        let session = self.load(session_id)?;
        let (updated, events) = session.record_attendance(self.to_record(entry, recorded_by))?;
        self.sessions.put(&updated)?;
        log_events(&events);
        Ok(updated)
    }

    /// Apply a batch of records atomically: every entry is validated against
    /// a working copy and nothing persists unless all of them apply.
    pub fn record_bulk_attendance(
        &self,
        session_id: &SessionId,
        entries: &[AttendanceEntry],
        recorded_by: &UserId,
    ) -> Result<Session> {
        let session = self.load(session_id)?;
        let mut working = session;
        let mut applied_events = Vec::new();
        let mut offending = Vec::new();

        for entry in entries {
            match working.record_attendance(self.to_record(entry, recorded_by)) {
                Ok((next, events)) => {
                    working = next;
                    applied_events.extend(events);
                }
                Err(err) => offending.push(format!("{}: {}", entry.student_id, err)),
            }
        }
        if !offending.is_empty() {
            return Err(DomainError::validation("records", offending.join("; ")).into());
        }

        self.sessions.put(&working)?;
        log_events(&applied_events);
        Ok(working)
    }

    /// Self-service: a student records their own attendance, only within
    /// the policy window after session end.
    pub fn record_own_attendance(
        &self,
        session_id: &SessionId,
        entry: &AttendanceEntry,
    ) -> Result<Session> {
        let session = self.load(session_id)?;
        let now = self.clock.now();
        let deadline = session.end_time() + self.policy.self_service_window_chrono();
        if now > deadline {
            return Err(DomainError::WindowExpired(format!(
                "self-service attendance for session {} closed {} after it ended",
                session.id,
                humantime::format_duration(self.policy.self_service_window)
            ))
            .into());
        }
        if self.policy.self_service_requires_confirmed {
            let confirmed = self
                .enrollments
                .find_for(&entry.student_id, &session.course_id)?
                .map(|e| e.is_confirmed())
                .unwrap_or(false);
            if !confirmed {
                return Err(DomainError::Forbidden(format!(
                    "{} has no confirmed enrollment in {}",
                    entry.student_id, session.course_id
                ))
                .into());
            }
        }

        let student = entry.student_id.clone();
        let (updated, events) = session.record_attendance(self.to_record(entry, &student))?;
        self.sessions.put(&updated)?;
        log_events(&events);
        Ok(updated)
    }

    /// Aggregate over completed sessions the student participated in,
    /// optionally narrowed to one course.
    pub fn attendance_stats(
        &self,
        student: &UserId,
        course: Option<&CourseId>,
    ) -> Result<AttendanceStats> {
        let mut total = 0;
        let mut attended = 0;
        for session in self.sessions.list()? {
            if !matches!(session.state, SessionState::Completed { .. }) {
                continue;
            }
            if !session.participants.contains(student) {
                continue;
            }
            if let Some(course) = course {
                if &session.course_id != course {
                    continue;
                }
            }
            total += 1;
            if session
                .attendance
                .get(student)
                .map(|r| r.present)
                .unwrap_or(false)
            {
                attended += 1;
            }
        }
        Ok(AttendanceStats::from_counts(total, attended))
    }

    fn to_record(&self, entry: &AttendanceEntry, recorded_by: &UserId) -> AttendanceRecord {
        let mut record = AttendanceRecord::new(
            entry.student_id.clone(),
            entry.present,
            recorded_by.clone(),
            self.clock.now(),
        )
        .with_minutes_late(entry.minutes_late);
        if let Some(comment) = &entry.comment {
            record = record.with_comment(comment.clone());
        }
        record
    }

    fn load(&self, id: &SessionId) -> Result<Session> {
        self.sessions
            .get(id)?
            .ok_or_else(|| DomainError::not_found("session", id.to_string()).into())
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
