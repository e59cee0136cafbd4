// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only query surface for the excluded presentation layers

use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use rota_core::{
    Course, CourseId, DomainError, Enrollment, EnrollmentId, Session, StateKind, UserId,
};
use rota_storage::{CourseStore, EnrollmentStore, SessionStore};
use std::sync::Arc;

/// Conjunction of session filters; unset fields match everything
#[derive(Clone, Debug, Default)]
pub struct SessionFilter {
    pub instructor: Option<UserId>,
    pub participant: Option<UserId>,
    pub course: Option<CourseId>,
    pub starting_from: Option<DateTime<Utc>>,
    pub starting_before: Option<DateTime<Utc>>,
    pub states: Option<Vec<StateKind>>,
}

impl SessionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_instructor(mut self, instructor: impl Into<UserId>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn by_participant(mut self, participant: impl Into<UserId>) -> Self {
        self.participant = Some(participant.into());
        self
    }

    pub fn by_course(mut self, course: impl Into<CourseId>) -> Self {
        self.course = Some(course.into());
        self
    }

    pub fn starting_from(mut self, from: DateTime<Utc>) -> Self {
        self.starting_from = Some(from);
        self
    }

    pub fn starting_before(mut self, before: DateTime<Utc>) -> Self {
        self.starting_before = Some(before);
        self
    }

    pub fn in_states(mut self, states: impl IntoIterator<Item = StateKind>) -> Self {
        self.states = Some(states.into_iter().collect());
        self
    }

    fn matches(&self, session: &Session) -> bool {
        if let Some(instructor) = &self.instructor {
            if &session.instructor_id != instructor {
                return false;
            }
        }
        if let Some(participant) = &self.participant {
            if !session.participants.contains(participant) {
                return false;
            }
        }
        if let Some(course) = &self.course {
            if &session.course_id != course {
                return false;
            }
        }
        if let Some(from) = self.starting_from {
            if session.scheduled_start < from {
                return false;
            }
        }
        if let Some(before) = self.starting_before {
            if session.scheduled_start >= before {
                return false;
            }
        }
        if let Some(states) = &self.states {
            if !states.contains(&session.state.kind()) {
                return false;
            }
        }
        true
    }
}

pub struct Queries {
    sessions: Arc<dyn SessionStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    courses: Arc<dyn CourseStore>,
}

impl Queries {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        courses: Arc<dyn CourseStore>,
    ) -> Self {
        Self {
            sessions,
            enrollments,
            courses,
        }
    }

    /// Sessions matching the filter, ascending by start
    pub fn sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .list()?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect();
        sessions.sort_by(|a, b| {
            a.scheduled_start
                .cmp(&b.scheduled_start)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sessions)
    }

    pub fn enrollment(&self, id: &EnrollmentId) -> Result<Enrollment> {
        self.enrollments
            .get(id)?
            .ok_or_else(|| not_found("enrollment", id))
    }

    pub fn enrollment_for(&self, student: &UserId, course: &CourseId) -> Result<Enrollment> {
        self.enrollments
            .find_for(student, course)?
            .ok_or_else(|| not_found("enrollment", &format!("{}/{}", student, course)))
    }

    pub fn course(&self, id: &CourseId) -> Result<Course> {
        self.courses.get(id)?.ok_or_else(|| not_found("course", id))
    }
}

fn not_found(kind: &'static str, id: &impl std::fmt::Display) -> EngineError {
    DomainError::not_found(kind, id.to_string()).into()
}

#[cfg(test)]
#[path = "queries_tests.rs"]
mod tests;
