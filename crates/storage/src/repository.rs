// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository seams over the domain entities
//!
//! The engine services take these as trait objects so conflict scans and
//! lifecycle commits run against in-memory fakes in tests and real stores
//! in the host application. Query helpers have default implementations on
//! top of `list`; stores with native indexes can override them.

use crate::error::StorageError;
use rota_core::{CalendarEntry, Course, CourseId, Enrollment, EnrollmentId, Session, SessionId, UserId};

pub trait SessionStore: Send + Sync {
    fn get(&self, id: &SessionId) -> Result<Option<Session>, StorageError>;
    fn put(&self, session: &Session) -> Result<(), StorageError>;
    fn list(&self) -> Result<Vec<Session>, StorageError>;

    /// Active (scheduled or in-progress) sessions for one instructor
    fn active_for_instructor(&self, instructor: &UserId) -> Result<Vec<Session>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|s| s.is_active() && &s.instructor_id == instructor)
            .collect())
    }

    /// Sessions where the user teaches or participates
    fn involving(&self, user: &UserId) -> Result<Vec<Session>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|s| &s.instructor_id == user || s.participants.contains(user))
            .collect())
    }

    fn for_course(&self, course: &CourseId) -> Result<Vec<Session>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|s| &s.course_id == course)
            .collect())
    }
}

pub trait EnrollmentStore: Send + Sync {
    fn get(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StorageError>;
    fn put(&self, enrollment: &Enrollment) -> Result<(), StorageError>;
    fn list(&self) -> Result<Vec<Enrollment>, StorageError>;

    /// The enrollment for a (student, course) pair.
    ///
    /// At most one non-cancelled enrollment exists per pair; that one wins.
    /// Falls back to the most recent cancelled enrollment otherwise.
    fn find_for(
        &self,
        student: &UserId,
        course: &CourseId,
    ) -> Result<Option<Enrollment>, StorageError> {
        let mut cancelled: Option<Enrollment> = None;
        for enrollment in self.list()? {
            if &enrollment.student_id != student || &enrollment.course_id != course {
                continue;
            }
            if !enrollment.is_cancelled() {
                return Ok(Some(enrollment));
            }
            let newer = match &cancelled {
                None => true,
                Some(held) => enrollment.enrolled_at > held.enrolled_at,
            };
            if newer {
                cancelled = Some(enrollment);
            }
        }
        Ok(cancelled)
    }

    /// Students with a confirmed enrollment in the course
    fn confirmed_for_course(&self, course: &CourseId) -> Result<Vec<Enrollment>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| &e.course_id == course && e.is_confirmed())
            .collect())
    }
}

pub trait CourseStore: Send + Sync {
    fn get(&self, id: &CourseId) -> Result<Option<Course>, StorageError>;
    fn put(&self, course: &Course) -> Result<(), StorageError>;
    fn list(&self) -> Result<Vec<Course>, StorageError>;
}

pub trait CalendarStore: Send + Sync {
    fn get(
        &self,
        owner: &UserId,
        session: &SessionId,
    ) -> Result<Option<CalendarEntry>, StorageError>;
    /// Insert or replace the entry for (entry.owner_id, entry.session_id)
    fn upsert(&self, entry: &CalendarEntry) -> Result<(), StorageError>;
    fn for_owner(&self, owner: &UserId) -> Result<Vec<CalendarEntry>, StorageError>;
}
