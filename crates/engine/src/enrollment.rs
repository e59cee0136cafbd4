// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Enrollment manager
//!
//! Owns the student↔course lifecycle and keeps the course roster mirror
//! equal to the set of confirmed enrollments. State change and mirror
//! update happen inside one critical section as an explicit two-step with
//! rollback, never as an implicit save hook.

use crate::adapters::Directory;
use crate::error::{EngineError, Result};
use crate::log_events;
use crate::scheduler::ProgressTracker;
use rota_core::{
    Clock, Course, CourseId, DomainError, Enrollment, EnrollmentId, Event, IdGen, UserId,
};
use rota_storage::{CourseStore, EnrollmentStore};
use std::sync::{Arc, Mutex};

pub struct EnrollmentManager<C: Clock, G: IdGen> {
    enrollments: Arc<dyn EnrollmentStore>,
    courses: Arc<dyn CourseStore>,
    directory: Arc<dyn Directory>,
    clock: C,
    ids: G,
    /// Serializes enrollment-state + roster-mirror commits
    commit: Arc<Mutex<()>>,
}

impl<C: Clock, G: IdGen> EnrollmentManager<C, G> {
    pub fn new(
        enrollments: Arc<dyn EnrollmentStore>,
        courses: Arc<dyn CourseStore>,
        directory: Arc<dyn Directory>,
        clock: C,
        ids: G,
    ) -> Self {
        Self {
            enrollments,
            courses,
            directory,
            clock,
            ids,
            commit: Arc::new(Mutex::new(())),
        }
    }

    /// Register a student's interest in a course; created Pending
    pub fn enroll(&self, student: &UserId, course_id: &CourseId) -> Result<Enrollment> {
        if !self.directory.is_student(student) {
            return Err(not_found("student", student));
        }
        let course = self.load_course(course_id)?;
        if !course.status.is_open() {
            return Err(DomainError::invalid_state("enroll", course.status.label()).into());
        }

        let _guard = self.commit.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = self.enrollments.find_for(student, course_id)? {
            if !existing.is_cancelled() {
                return Err(DomainError::Duplicate {
                    kind: "enrollment",
                    detail: format!(
                        "{} already has a {} enrollment in {}",
                        student,
                        existing.state.label(),
                        course_id
                    ),
                }
                .into());
            }
        }

        let enrollment = Enrollment::new(
            self.ids.next(),
            student.clone(),
            course_id.clone(),
            &self.clock,
        );
        self.enrollments.put(&enrollment)?;
        log_events(&[Event::EnrollmentRequested {
            id: enrollment.id.clone(),
            student: student.clone(),
            course: course_id.clone(),
        }]);
        Ok(enrollment)
    }

    /// Pending → Confirmed, adding the student to the course roster
    pub fn confirm(&self, id: &EnrollmentId) -> Result<Enrollment> {
        let _guard = self.commit.lock().unwrap_or_else(|e| e.into_inner());
        let enrollment = self.load(id)?;
        let (confirmed, events) = enrollment.confirm()?;
        self.enrollments.put(&confirmed)?;

        let student = confirmed.student_id.clone();
        if let Err(err) = self.update_roster(&confirmed.course_id, |course| {
            course.roster_add(student.clone());
        }) {
            self.roll_back(&enrollment);
            return Err(err);
        }
        log_events(&events);
        Ok(confirmed)
    }

    /// Any non-cancelled state → Cancelled, removing the student from the
    /// roster. Terminal; a second cancel fails InvalidState and leaves the
    /// roster untouched.
    pub fn cancel(&self, id: &EnrollmentId, reason: &str) -> Result<Enrollment> {
        let _guard = self.commit.lock().unwrap_or_else(|e| e.into_inner());
        let enrollment = self.load(id)?;
        let (cancelled, events) = enrollment.cancel(reason, &self.clock)?;
        self.enrollments.put(&cancelled)?;

        let student = cancelled.student_id.clone();
        if let Err(err) = self.update_roster(&cancelled.course_id, |course| {
            course.roster_remove(&student);
        }) {
            self.roll_back(&enrollment);
            return Err(err);
        }
        log_events(&events);
        Ok(cancelled)
    }

    /// Add attended hours to the student's confirmed enrollment.
    ///
    /// Fails NotFound when no confirmed enrollment exists for the pair;
    /// pending and cancelled enrollments never accumulate progress.
    pub fn advance_progress(
        &self,
        student: &UserId,
        course_id: &CourseId,
        hours: f64,
    ) -> Result<Enrollment> {
        let _guard = self.commit.lock().unwrap_or_else(|e| e.into_inner());
        let enrollment = self
            .enrollments
            .find_for(student, course_id)?
            .filter(|e| e.is_confirmed())
            .ok_or_else(|| {
                not_found(
                    "confirmed enrollment",
                    &format!("{}/{}", student, course_id),
                )
            })?;
        let course = self.load_course(course_id)?;
        let (advanced, events) = enrollment.advance_progress(hours, course.total_required_hours)?;
        self.enrollments.put(&advanced)?;
        log_events(&events);
        Ok(advanced)
    }

    /// Enrollment for a (student, course) pair, for the read surface
    pub fn enrollment_for(&self, student: &UserId, course_id: &CourseId) -> Result<Enrollment> {
        self.enrollments
            .find_for(student, course_id)?
            .ok_or_else(|| not_found("enrollment", &format!("{}/{}", student, course_id)))
    }

    fn load(&self, id: &EnrollmentId) -> Result<Enrollment> {
        self.enrollments
            .get(id)?
            .ok_or_else(|| not_found("enrollment", id))
    }

    fn load_course(&self, id: &CourseId) -> Result<Course> {
        self.courses.get(id)?.ok_or_else(|| not_found("course", id))
    }

    fn update_roster(&self, course_id: &CourseId, apply: impl FnOnce(&mut Course)) -> Result<()> {
        let mut course = self.load_course(course_id)?;
        apply(&mut course);
        self.courses.put(&course)?;
        Ok(())
    }

    fn roll_back(&self, original: &Enrollment) {
        if let Err(err) = self.enrollments.put(original) {
            tracing::warn!(
                enrollment = %original.id,
                error = %err,
                "rollback after roster failure also failed"
            );
        }
    }
}

impl<C: Clock, G: IdGen> ProgressTracker for EnrollmentManager<C, G> {
    fn advance_progress(&self, student: &UserId, course: &CourseId, hours: f64) -> Result<()> {
        EnrollmentManager::advance_progress(self, student, course, hours)?;
        Ok(())
    }
}

fn not_found(kind: &'static str, id: &impl std::fmt::Display) -> EngineError {
    DomainError::not_found(kind, id.to_string()).into()
}

#[cfg(test)]
#[path = "enrollment_tests.rs"]
mod tests;
