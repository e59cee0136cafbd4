//! Attendance recording: staff, bulk, and student self-service.

use crate::prelude::*;
use chrono::Duration;
use rota_core::{DomainError, UserId};
use rota_engine::{AttendanceEntry, EngineError};

fn domain(err: EngineError) -> DomainError {
    match err {
        EngineError::Domain(err) => err,
        EngineError::Storage(err) => panic!("expected domain error, got storage: {err}"),
    }
}

#[test]
fn staff_record_and_stats_over_completed_sessions() {
    let world = world();
    let mut input = world.session_input(60, 60);
    input.participants.push(STUDENT_2.into());
    let session = world.scheduler.create_session(input).unwrap();

    world
        .ledger
        .record_bulk_attendance(
            &session.id,
            &[
                AttendanceEntry::new(STUDENT, true).with_minutes_late(5),
                AttendanceEntry::new(STUDENT_2, false).with_comment("sick"),
            ],
            &INSTRUCTOR.into(),
        )
        .unwrap();
    world.scheduler.complete(&session.id).unwrap();

    let stats = world
        .ledger
        .attendance_stats(&STUDENT.into(), Some(&COURSE.into()))
        .unwrap();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.attended_sessions, 1);
    assert_eq!(stats.attendance_rate, 100.0);

    let stats = world
        .ledger
        .attendance_stats(&STUDENT_2.into(), Some(&COURSE.into()))
        .unwrap();
    assert_eq!(stats.attended_sessions, 0);
    assert_eq!(stats.attendance_rate, 0.0);
}

#[test]
fn bulk_recording_with_a_stranger_persists_nothing() {
    let world = world();
    let session = world
        .scheduler
        .create_session(world.session_input(60, 60))
        .unwrap();

    let err = domain(
        world
            .ledger
            .record_bulk_attendance(
                &session.id,
                &[
                    AttendanceEntry::new(STUDENT, true),
                    AttendanceEntry::new("someone-else", true),
                ],
                &INSTRUCTOR.into(),
            )
            .unwrap_err(),
    );
    assert!(matches!(err, DomainError::Validation { field: "records", .. }));

    let stats = world.ledger.attendance_stats(&STUDENT.into(), None).unwrap();
    assert_eq!(stats.total_sessions, 0);
}

#[test]
fn scenario_c_self_service_thirty_hours_late_is_expired() {
    let world = world();
    let session = world
        .scheduler
        .create_session(world.session_input(60, 60))
        .unwrap();

    // session ends 11:00; 30 hours later is outside the 24-hour window
    world.clock.set(session.end_time() + Duration::hours(30));
    let err = domain(
        world
            .ledger
            .record_own_attendance(&session.id, &AttendanceEntry::new(STUDENT, true))
            .unwrap_err(),
    );
    assert!(matches!(err, DomainError::WindowExpired(_)));

    // inside the window it works, recorded by the student themselves
    world.clock.set(session.end_time() + Duration::hours(20));
    let updated = world
        .ledger
        .record_own_attendance(&session.id, &AttendanceEntry::new(STUDENT, true))
        .unwrap();
    assert_eq!(
        updated.attendance[&UserId::new(STUDENT)].recorded_by,
        UserId::new(STUDENT)
    );
}
