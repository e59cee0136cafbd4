//! Enrollment lifecycle, roster mirroring, and progress propagation.

use crate::prelude::*;
use rota_core::{AttendanceRecord, Clock, DomainError, UserId};
use rota_engine::EngineError;
use rota_storage::{CourseStore, SessionStore};
use similar_asserts::assert_eq;

fn domain(err: EngineError) -> DomainError {
    match err {
        EngineError::Domain(err) => err,
        EngineError::Storage(err) => panic!("expected domain error, got storage: {err}"),
    }
}

fn complete_session_with_attendance(world: &World, offset_minutes: i64, duration: i64) {
    let session = world
        .scheduler
        .create_session(world.session_input(offset_minutes, duration))
        .unwrap();
    let loaded = SessionStore::get(&world.store, &session.id)
        .unwrap()
        .unwrap();
    let (with_attendance, _) = loaded
        .record_attendance(AttendanceRecord::new(
            STUDENT,
            true,
            INSTRUCTOR,
            world.clock.now(),
        ))
        .unwrap();
    SessionStore::put(&world.store, &with_attendance).unwrap();
    world.scheduler.complete(&session.id).unwrap();
}

#[test]
fn scenario_b_three_attended_two_hour_sessions_yield_fifteen_percent() {
    let world = world();
    world.confirmed_enrollment(STUDENT);

    // three 2-hour sessions on consecutive slots, all attended
    for offset in [60, 240, 420] {
        complete_session_with_attendance(&world, offset, 120);
    }

    let enrollment = world
        .queries
        .enrollment_for(&STUDENT.into(), &COURSE.into())
        .unwrap();
    assert_eq!(enrollment.progress.hours_completed, 6.0);
    assert_eq!(enrollment.progress.percentage, 15.0);
}

#[test]
fn double_completion_cannot_double_count_progress() {
    let world = world();
    world.confirmed_enrollment(STUDENT);
    let session = world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();
    let loaded = SessionStore::get(&world.store, &session.id)
        .unwrap()
        .unwrap();
    let (with_attendance, _) = loaded
        .record_attendance(AttendanceRecord::new(
            STUDENT,
            true,
            INSTRUCTOR,
            world.clock.now(),
        ))
        .unwrap();
    SessionStore::put(&world.store, &with_attendance).unwrap();

    world.scheduler.complete(&session.id).unwrap();
    let err = domain(world.scheduler.complete(&session.id).unwrap_err());
    assert_eq!(err, DomainError::invalid_state("complete", "completed"));

    let enrollment = world
        .queries
        .enrollment_for(&STUDENT.into(), &COURSE.into())
        .unwrap();
    assert_eq!(enrollment.progress.hours_completed, 1.5);
}

#[test]
fn scenario_d_cancelling_twice_fails_and_leaves_roster_alone() {
    let world = world();
    let enrollment = world
        .enrollments
        .enroll(&STUDENT.into(), &COURSE.into())
        .unwrap();
    world.enrollments.confirm(&enrollment.id).unwrap();
    world.confirmed_enrollment(STUDENT_2);

    world
        .enrollments
        .cancel(&enrollment.id, "family moved out of the district")
        .unwrap();

    let roster = |world: &World| {
        CourseStore::get(&world.store, &COURSE.into())
            .unwrap()
            .unwrap()
            .roster
    };
    assert_eq!(roster(&world).len(), 1);
    assert!(roster(&world).contains(&UserId::new(STUDENT_2)));

    let err = domain(
        world
            .enrollments
            .cancel(&enrollment.id, "family moved out of the district")
            .unwrap_err(),
    );
    assert_eq!(err, DomainError::invalid_state("cancel", "cancelled"));
    assert_eq!(roster(&world).len(), 1);
}

#[test]
fn double_enrollment_is_rejected_while_live() {
    let world = world();
    world
        .enrollments
        .enroll(&STUDENT.into(), &COURSE.into())
        .unwrap();
    let err = domain(
        world
            .enrollments
            .enroll(&STUDENT.into(), &COURSE.into())
            .unwrap_err(),
    );
    assert!(matches!(err, DomainError::Duplicate { .. }));
}

#[test]
fn progress_is_visible_through_the_query_surface() {
    let world = world();
    world.confirmed_enrollment(STUDENT);
    complete_session_with_attendance(&world, 60, 120);

    let enrollment = world
        .queries
        .enrollment_for(&STUDENT.into(), &COURSE.into())
        .unwrap();
    let by_id = world.queries.enrollment(&enrollment.id).unwrap();
    assert_eq!(by_id, enrollment);
    assert_eq!(by_id.progress.hours_completed, 2.0);
    assert_eq!(by_id.progress.percentage, 5.0);
}
