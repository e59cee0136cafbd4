use super::*;
use chrono::{Duration, TimeZone};
use rota_core::{Course, CourseStatus, Enrollment, FakeClock, Modality, SessionId};
use rota_storage::MemoryStore;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

struct Fixture {
    store: MemoryStore,
    queries: Queries,
}

fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let queries = Queries::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );
    Fixture { store, queries }
}

fn seed(fx: &Fixture) {
    let clock = FakeClock::at(t0());
    let rows = [
        ("s-1", "c-1", "i-1", 1i64, false),
        ("s-2", "c-1", "i-1", 5, true),
        ("s-3", "c-2", "i-2", 3, false),
    ];
    for (id, course, instructor, offset, cancelled) in rows {
        let session = Session::new(
            id,
            course,
            instructor,
            "lesson",
            t0() + Duration::hours(offset),
            60,
            Modality::InPerson {
                location: "Room 3".to_string(),
            },
            &clock,
        )
        .with_participants([UserId::new("student-1")]);
        let session = if cancelled {
            let (cancelled, _) = session
                .cancel("not enough sign-ups this week", &clock)
                .unwrap();
            cancelled
        } else {
            session
        };
        SessionStore::put(&fx.store, &session).unwrap();
    }
}

#[test]
fn unfiltered_query_returns_everything_sorted_by_start() {
    let fx = fixture();
    seed(&fx);
    let sessions = fx.queries.sessions(&SessionFilter::new()).unwrap();
    let ids: Vec<_> = sessions.iter().map(|s| s.id.0.as_str()).collect();
    assert_eq!(ids, ["s-1", "s-3", "s-2"]);
}

#[test]
fn filters_compose_as_a_conjunction() {
    let fx = fixture();
    seed(&fx);

    let by_instructor = fx
        .queries
        .sessions(&SessionFilter::new().by_instructor("i-1"))
        .unwrap();
    assert_eq!(by_instructor.len(), 2);

    let active_for_instructor = fx
        .queries
        .sessions(
            &SessionFilter::new()
                .by_instructor("i-1")
                .in_states([StateKind::Scheduled, StateKind::InProgress]),
        )
        .unwrap();
    assert_eq!(active_for_instructor.len(), 1);
    assert_eq!(active_for_instructor[0].id, SessionId::new("s-1"));

    let in_window = fx
        .queries
        .sessions(
            &SessionFilter::new()
                .by_participant("student-1")
                .starting_from(t0() + Duration::hours(2))
                .starting_before(t0() + Duration::hours(4)),
        )
        .unwrap();
    assert_eq!(in_window.len(), 1);
    assert_eq!(in_window[0].id, SessionId::new("s-3"));

    let by_course = fx
        .queries
        .sessions(&SessionFilter::new().by_course("c-2"))
        .unwrap();
    assert_eq!(by_course.len(), 1);
}

#[test]
fn range_bounds_are_half_open() {
    let fx = fixture();
    seed(&fx);
    let at_bound = fx
        .queries
        .sessions(
            &SessionFilter::new()
                .starting_from(t0() + Duration::hours(1))
                .starting_before(t0() + Duration::hours(3)),
        )
        .unwrap();
    // start == from is included, start == before is not
    assert_eq!(at_bound.len(), 1);
    assert_eq!(at_bound[0].id, SessionId::new("s-1"));
}

#[test]
fn enrollment_lookups_by_id_and_pair() {
    let fx = fixture();
    let clock = FakeClock::at(t0());
    let (enrollment, _) = Enrollment::new("e-1", "student-1", "c-1", &clock)
        .confirm()
        .unwrap();
    EnrollmentStore::put(&fx.store, &enrollment).unwrap();

    assert!(fx.queries.enrollment(&"e-1".into()).is_ok());
    let found = fx
        .queries
        .enrollment_for(&"student-1".into(), &"c-1".into())
        .unwrap();
    assert_eq!(found.id, EnrollmentId::new("e-1"));

    let err = fx.queries.enrollment(&"ghost".into()).unwrap_err();
    assert!(matches!(
        err.domain(),
        Some(DomainError::NotFound { kind: "enrollment", .. })
    ));
}

#[test]
fn course_lookup_round_trips_roster() {
    let fx = fixture();
    let mut course = Course::new("c-1", "i-1", 40.0, CourseStatus::Active);
    course.roster_add(UserId::new("student-1"));
    CourseStore::put(&fx.store, &course).unwrap();

    let found = fx.queries.course(&"c-1".into()).unwrap();
    assert_eq!(found.roster.len(), 1);

    let err = fx.queries.course(&"ghost".into()).unwrap_err();
    assert!(matches!(
        err.domain(),
        Some(DomainError::NotFound { kind: "course", .. })
    ));
}
