use super::*;
use chrono::TimeZone;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

#[test]
fn system_clock_moves_forward() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}

#[test]
fn fake_clock_starts_at_given_instant() {
    let clock = FakeClock::at(t0());
    assert_eq!(clock.now(), t0());
}

#[test]
fn fake_clock_advance_adds_duration() {
    let clock = FakeClock::at(t0());
    clock.advance(Duration::minutes(90));
    assert_eq!(clock.now(), t0() + Duration::minutes(90));
}

#[test]
fn fake_clock_set_overrides_current_time() {
    let clock = FakeClock::at(t0());
    clock.advance(Duration::hours(5));
    clock.set(t0());
    assert_eq!(clock.now(), t0());
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::at(t0());
    let other = clock.clone();
    clock.advance(Duration::minutes(15));
    assert_eq!(other.now(), t0() + Duration::minutes(15));
}
