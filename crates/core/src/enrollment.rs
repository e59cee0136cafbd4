// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Enrollment state machine and cumulative progress
//!
//! An enrollment records one student's registration in one course. Progress
//! fields are owned exclusively by the attendance ledger path; hours only
//! accumulate while the enrollment is confirmed.

use crate::clock::Clock;
use crate::course::CourseId;
use crate::error::DomainError;
use crate::event::Event;
use crate::id::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an enrollment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnrollmentId(pub String);

impl EnrollmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EnrollmentId {
    fn from(s: String) -> Self {
        EnrollmentId(s)
    }
}

impl From<&str> for EnrollmentId {
    fn from(s: &str) -> Self {
        EnrollmentId(s.to_string())
    }
}

/// The lifecycle state of an enrollment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnrollmentState {
    Pending,
    Confirmed,
    Cancelled { reason: String, cancelled_at: DateTime<Utc> },
}

impl EnrollmentState {
    pub fn label(&self) -> &'static str {
        match self {
            EnrollmentState::Pending => "pending",
            EnrollmentState::Confirmed => "confirmed",
            EnrollmentState::Cancelled { .. } => "cancelled",
        }
    }
}

/// Cumulative completion progress against the course's required hours
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub hours_completed: f64,
    /// hours_completed / total_required_hours × 100, capped at 100
    pub percentage: f64,
}

impl Progress {
    /// Add hours and recompute the capped percentage
    pub fn advance(&self, hours: f64, total_required_hours: f64) -> Progress {
        let hours_completed = self.hours_completed + hours;
        let percentage = if total_required_hours > 0.0 {
            (hours_completed / total_required_hours * 100.0).min(100.0)
        } else {
            100.0
        };
        Progress {
            hours_completed,
            percentage,
        }
    }
}

/// One student's registration in one course
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub state: EnrollmentState,
    pub enrolled_at: DateTime<Utc>,
    pub progress: Progress,
}

impl Enrollment {
    /// Create a new enrollment in the Pending state
    pub fn new(
        id: impl Into<EnrollmentId>,
        student_id: impl Into<UserId>,
        course_id: impl Into<CourseId>,
        clock: &impl Clock,
    ) -> Self {
        Enrollment {
            id: id.into(),
            student_id: student_id.into(),
            course_id: course_id.into(),
            state: EnrollmentState::Pending,
            enrolled_at: clock.now(),
            progress: Progress::default(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == EnrollmentState::Pending
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == EnrollmentState::Confirmed
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.state, EnrollmentState::Cancelled { .. })
    }

    /// Pending → Confirmed
    pub fn confirm(&self) -> Result<(Enrollment, Vec<Event>), DomainError> {
        match self.state {
            EnrollmentState::Pending => {
                let enrollment = Enrollment {
                    state: EnrollmentState::Confirmed,
                    ..self.clone()
                };
                let events = vec![Event::EnrollmentConfirmed {
                    id: self.id.clone(),
                    student: self.student_id.clone(),
                    course: self.course_id.clone(),
                }];
                Ok((enrollment, events))
            }
            _ => Err(DomainError::invalid_state("confirm", self.state.label())),
        }
    }

    /// Any non-cancelled state → Cancelled, terminal
    pub fn cancel(
        &self,
        reason: &str,
        clock: &impl Clock,
    ) -> Result<(Enrollment, Vec<Event>), DomainError> {
        if self.is_cancelled() {
            return Err(DomainError::invalid_state("cancel", self.state.label()));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::validation(
                "reason",
                "cancellation reason must not be empty",
            ));
        }
        let enrollment = Enrollment {
            state: EnrollmentState::Cancelled {
                reason: reason.to_string(),
                cancelled_at: clock.now(),
            },
            ..self.clone()
        };
        let events = vec![Event::EnrollmentCancelled {
            id: self.id.clone(),
            student: self.student_id.clone(),
            course: self.course_id.clone(),
        }];
        Ok((enrollment, events))
    }

    /// Accumulate completed hours; only legal while Confirmed
    pub fn advance_progress(
        &self,
        hours: f64,
        total_required_hours: f64,
    ) -> Result<(Enrollment, Vec<Event>), DomainError> {
        if !self.is_confirmed() {
            return Err(DomainError::invalid_state(
                "advance_progress",
                self.state.label(),
            ));
        }
        if !hours.is_finite() || hours < 0.0 {
            return Err(DomainError::validation(
                "hours",
                format!("hours to add must be non-negative (got {})", hours),
            ));
        }
        let progress = self.progress.advance(hours, total_required_hours);
        let enrollment = Enrollment {
            progress,
            ..self.clone()
        };
        let events = vec![Event::ProgressAdvanced {
            id: self.id.clone(),
            hours_completed: progress.hours_completed,
            percentage: progress.percentage,
        }];
        Ok((enrollment, events))
    }
}

#[cfg(test)]
#[path = "enrollment_tests.rs"]
mod tests;
