// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Course record and roster mirror
//!
//! Course metadata (instructor, required hours, status) is authored by the
//! external catalog. The roster is a mirror of confirmed enrollments and is
//! mutated only by the enrollment manager.

use crate::id::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier for a course
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CourseId {
    fn from(s: &str) -> Self {
        CourseId(s.to_string())
    }
}

/// Catalog lifecycle status of a course
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Planned,
    Active,
    Completed,
    Cancelled,
}

impl CourseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CourseStatus::Planned => "planned",
            CourseStatus::Active => "active",
            CourseStatus::Completed => "completed",
            CourseStatus::Cancelled => "cancelled",
        }
    }

    /// New enrollments and sessions are only accepted before the course ends
    pub fn is_open(&self) -> bool {
        matches!(self, CourseStatus::Planned | CourseStatus::Active)
    }
}

/// Read-only course metadata as served by the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub instructor_id: UserId,
    pub total_required_hours: f64,
    pub status: CourseStatus,
}

/// A course with its mirrored roster of confirmed students
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub instructor_id: UserId,
    pub total_required_hours: f64,
    pub status: CourseStatus,
    pub roster: BTreeSet<UserId>,
}

impl Course {
    pub fn new(
        id: impl Into<CourseId>,
        instructor_id: impl Into<UserId>,
        total_required_hours: f64,
        status: CourseStatus,
    ) -> Self {
        Self {
            id: id.into(),
            instructor_id: instructor_id.into(),
            total_required_hours,
            status,
            roster: BTreeSet::new(),
        }
    }

    pub fn info(&self) -> CourseInfo {
        CourseInfo {
            instructor_id: self.instructor_id.clone(),
            total_required_hours: self.total_required_hours,
            status: self.status,
        }
    }

    /// Idempotent roster add; true when the student was newly added
    pub fn roster_add(&mut self, student: UserId) -> bool {
        self.roster.insert(student)
    }

    /// Idempotent roster remove; true when the student was present
    pub fn roster_remove(&mut self, student: &UserId) -> bool {
        self.roster.remove(student)
    }
}

impl From<String> for CourseId {
    fn from(s: String) -> Self {
        CourseId(s)
    }
}
