//! Calendar projection: idempotent sync and reminder timing.

use crate::prelude::*;
use chrono::Duration;
use rota_core::{SessionPatch, UserId};
use rota_storage::CalendarStore;

#[test]
fn sync_is_idempotent_per_owner() {
    let world = world();
    world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();
    world
        .scheduler
        .create_session(world.session_input(240, 60))
        .unwrap();

    let created = world
        .projector
        .sync_from_sessions(&STUDENT.into())
        .unwrap();
    assert_eq!(created.len(), 2);

    // second run creates zero new entries
    assert!(world
        .projector
        .sync_from_sessions(&STUDENT.into())
        .unwrap()
        .is_empty());
    assert_eq!(
        world.store.for_owner(&UserId::new(STUDENT)).unwrap().len(),
        2
    );
}

#[test]
fn instructor_and_student_views_are_separate_entries() {
    let world = world();
    world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();

    assert_eq!(
        world
            .projector
            .sync_from_sessions(&STUDENT.into())
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        world
            .projector
            .sync_from_sessions(&INSTRUCTOR.into())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn cancelled_sessions_never_reach_the_calendar() {
    let world = world();
    let session = world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();
    world
        .scheduler
        .cancel(&session.id, "public holiday, school closed")
        .unwrap();

    assert!(world
        .projector
        .sync_from_sessions(&STUDENT.into())
        .unwrap()
        .is_empty());
}

#[test]
fn reschedule_then_sync_updates_the_existing_entry() {
    let world = world();
    let session = world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();
    world.projector.sync_from_sessions(&STUDENT.into()).unwrap();

    world
        .scheduler
        .reschedule(
            &session.id,
            SessionPatch::new().with_start(t0() + Duration::minutes(360)),
        )
        .unwrap();
    let created = world
        .projector
        .sync_from_sessions(&STUDENT.into())
        .unwrap();
    assert!(created.is_empty());

    let entry = CalendarStore::get(&world.store, &UserId::new(STUDENT), &session.id)
        .unwrap()
        .unwrap();
    assert_eq!(entry.start, t0() + Duration::minutes(360));
}

#[test]
fn reminders_fire_once_inside_the_lead_window() {
    let world = world();
    let session = world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();
    world.projector.sync_from_sessions(&STUDENT.into()).unwrap();

    // 10 minutes before start, inside the default 30-minute lead
    world
        .clock
        .set(session.scheduled_start - Duration::minutes(10));
    let due = world.projector.due_reminders(&STUDENT.into()).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].session_id, session.id);

    world
        .projector
        .mark_reminder_sent(&STUDENT.into(), &session.id)
        .unwrap();
    assert!(world
        .projector
        .due_reminders(&STUDENT.into())
        .unwrap()
        .is_empty());
}
