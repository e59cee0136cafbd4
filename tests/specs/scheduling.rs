//! Conflict detection and session lifecycle, end to end.

use crate::prelude::*;
use rota_core::{DomainError, SchedulingPolicy, SessionPatch, UserId};
use rota_engine::EngineError;

fn domain(err: EngineError) -> DomainError {
    match err {
        EngineError::Domain(err) => err,
        EngineError::Storage(err) => panic!("expected domain error, got storage: {err}"),
    }
}

#[test]
fn scenario_a_overlap_rejected_adjacent_accepted() {
    let world = world();

    // 10:00–11:30
    let first = world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();

    // 11:00–12:00 overlaps and is rejected
    let err = domain(
        world
            .scheduler
            .create_session(world.session_input(120, 60))
            .unwrap_err(),
    );
    match err {
        DomainError::Conflict { conflicting, .. } => assert_eq!(conflicting, vec![first.id]),
        other => panic!("expected conflict, got {other:?}"),
    }

    // 11:30–12:30 is adjacent and accepted
    world
        .scheduler
        .create_session(world.session_input(150, 60))
        .unwrap();

    assert!(world
        .scheduler
        .verify_no_overlaps(&UserId::new(INSTRUCTOR))
        .unwrap());
}

#[test]
fn co_taught_split_sessions_are_a_named_policy() {
    let permissive = world();
    permissive
        .scheduler
        .create_session(permissive.session_input(60, 90))
        .unwrap();
    permissive
        .scheduler
        .create_session(permissive.session_input(60, 45))
        .unwrap();

    let strict = world_with_policy(SchedulingPolicy::new().with_shared_start_same_course(false));
    strict
        .scheduler
        .create_session(strict.session_input(60, 90))
        .unwrap();
    let err = domain(
        strict
            .scheduler
            .create_session(strict.session_input(60, 45))
            .unwrap_err(),
    );
    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[test]
fn reschedule_frees_the_old_slot_and_claims_the_new_one() {
    let world = world();
    let session = world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();

    world
        .scheduler
        .reschedule(
            &session.id,
            SessionPatch::new().with_start(t0() + chrono::Duration::minutes(300)),
        )
        .unwrap();

    // the 10:00 slot is free again
    world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();
    assert!(world
        .scheduler
        .verify_no_overlaps(&UserId::new(INSTRUCTOR))
        .unwrap());
}

#[test]
fn lifecycle_guards_hold_across_services() {
    let world = world();
    let session = world
        .scheduler
        .create_session(world.session_input(60, 90))
        .unwrap();

    world.scheduler.start(&session.id).unwrap();
    world.scheduler.complete(&session.id).unwrap();

    // completed is terminal for every mutation
    let err = domain(world.scheduler.complete(&session.id).unwrap_err());
    assert_eq!(err, DomainError::invalid_state("complete", "completed"));
    let err = domain(
        world
            .scheduler
            .cancel(&session.id, "trying to cancel a finished class")
            .unwrap_err(),
    );
    assert_eq!(err, DomainError::invalid_state("cancel", "completed"));
}
