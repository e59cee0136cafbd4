// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interval-overlap conflict engine
//!
//! Pure functions over half-open time intervals; no storage access. The
//! scheduler feeds in candidate sessions and commits only while holding the
//! instructor's booking lock, so a clean scan here stays true at commit.

use crate::course::CourseId;
use crate::id::UserId;
use crate::policy::SchedulingPolicy;
use crate::session::{Session, SessionId};
use chrono::{DateTime, Duration, Utc};

/// True iff the half-open intervals [a, a+ad) and [b, b+bd) intersect.
///
/// Adjacent intervals (one ends exactly where the other starts) do not
/// overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_duration: Duration,
    b_start: DateTime<Utc>,
    b_duration: Duration,
) -> bool {
    a_start < b_start + b_duration && b_start < a_start + a_duration
}

/// A booking being checked before commit
#[derive(Clone, Debug)]
pub struct BookingProposal {
    /// Session being edited, excluded from the scan
    pub exclude: Option<SessionId>,
    pub instructor_id: UserId,
    pub course_id: CourseId,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl BookingProposal {
    /// Proposal for a brand-new session
    pub fn create(
        instructor_id: impl Into<UserId>,
        course_id: impl Into<CourseId>,
        start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Self {
        Self {
            exclude: None,
            instructor_id: instructor_id.into(),
            course_id: course_id.into(),
            start,
            duration_minutes,
        }
    }

    /// Proposal for an edit, excluding the edited session from the scan
    pub fn edit(mut self, session_id: SessionId) -> Self {
        self.exclude = Some(session_id);
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes)
    }
}

/// Scan candidates for active sessions of the proposal's instructor whose
/// interval overlaps the proposed one.
///
/// Sessions of the same course sharing the exact proposed start time are
/// exempt when the policy allows co-taught/split sessions.
pub fn find_conflicts<'a>(
    candidates: &'a [Session],
    proposal: &BookingProposal,
    policy: &SchedulingPolicy,
) -> Vec<&'a Session> {
    candidates
        .iter()
        .filter(|session| {
            session.instructor_id == proposal.instructor_id
                && session.is_active()
                && proposal.exclude.as_ref() != Some(&session.id)
                && overlaps(
                    session.scheduled_start,
                    session.duration(),
                    proposal.start,
                    proposal.duration(),
                )
                && !(policy.allow_shared_start_same_course
                    && session.scheduled_start == proposal.start
                    && session.course_id == proposal.course_id)
        })
        .collect()
}

#[cfg(test)]
#[path = "overlap_tests.rs"]
mod tests;
