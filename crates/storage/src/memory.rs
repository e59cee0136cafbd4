// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store
//!
//! The default store for tests and single-process hosts. Clones share the
//! same maps through an `Arc`; each map takes its own mutex, recovered on
//! poison.

use crate::error::StorageError;
use crate::repository::{CalendarStore, CourseStore, EnrollmentStore, SessionStore};
use rota_core::{
    CalendarEntry, Course, CourseId, Enrollment, EnrollmentId, Session, SessionId, UserId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    sessions: Mutex<HashMap<SessionId, Session>>,
    enrollments: Mutex<HashMap<EnrollmentId, Enrollment>>,
    courses: Mutex<HashMap<CourseId, Course>>,
    calendar: Mutex<HashMap<(UserId, SessionId), CalendarEntry>>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        Ok(locked(&self.inner.sessions).get(id).cloned())
    }

    fn put(&self, session: &Session) -> Result<(), StorageError> {
        locked(&self.inner.sessions).insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Session>, StorageError> {
        Ok(locked(&self.inner.sessions).values().cloned().collect())
    }
}

impl EnrollmentStore for MemoryStore {
    fn get(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StorageError> {
        Ok(locked(&self.inner.enrollments).get(id).cloned())
    }

    fn put(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        locked(&self.inner.enrollments).insert(enrollment.id.clone(), enrollment.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Enrollment>, StorageError> {
        Ok(locked(&self.inner.enrollments).values().cloned().collect())
    }
}

impl CourseStore for MemoryStore {
    fn get(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        Ok(locked(&self.inner.courses).get(id).cloned())
    }

    fn put(&self, course: &Course) -> Result<(), StorageError> {
        locked(&self.inner.courses).insert(course.id.clone(), course.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Course>, StorageError> {
        Ok(locked(&self.inner.courses).values().cloned().collect())
    }
}

impl CalendarStore for MemoryStore {
    fn get(
        &self,
        owner: &UserId,
        session: &SessionId,
    ) -> Result<Option<CalendarEntry>, StorageError> {
        Ok(locked(&self.inner.calendar)
            .get(&(owner.clone(), session.clone()))
            .cloned())
    }

    fn upsert(&self, entry: &CalendarEntry) -> Result<(), StorageError> {
        locked(&self.inner.calendar).insert(
            (entry.owner_id.clone(), entry.session_id.clone()),
            entry.clone(),
        );
        Ok(())
    }

    fn for_owner(&self, owner: &UserId) -> Result<Vec<CalendarEntry>, StorageError> {
        Ok(locked(&self.inner.calendar)
            .values()
            .filter(|e| &e.owner_id == owner)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
