// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attendance records and aggregate statistics

use crate::id::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One student's attendance on one session.
///
/// At most one record exists per (session, student); re-recording overwrites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub student_id: UserId,
    pub present: bool,
    pub minutes_late: u32,
    pub comment: Option<String>,
    pub recorded_by: UserId,
    pub recorded_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn new(
        student_id: impl Into<UserId>,
        present: bool,
        recorded_by: impl Into<UserId>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            present,
            minutes_late: 0,
            comment: None,
            recorded_by: recorded_by.into(),
            recorded_at,
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

/// Aggregate over a student's completed sessions
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AttendanceStats {
    pub total_sessions: usize,
    pub attended_sessions: usize,
    /// attended / total × 100; zero when no completed sessions exist
    pub attendance_rate: f64,
}

impl AttendanceStats {
    pub fn from_counts(total_sessions: usize, attended_sessions: usize) -> Self {
        let attendance_rate = if total_sessions == 0 {
            0.0
        } else {
            attended_sessions as f64 / total_sessions as f64 * 100.0
        };
        Self {
            total_sessions,
            attended_sessions,
            attendance_rate,
        }
    }
}
