//! Shared fixture: the full engine wired over one in-memory store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rota_core::{
    Course, CourseStatus, FakeClock, Modality, SchedulingPolicy, SequentialIdGen, UserId,
};
use rota_engine::{
    AttendanceLedger, CalendarProjector, EnrollmentManager, FakeDirectory, NewSession, Queries,
    SessionScheduler, StoreCatalog,
};
use rota_storage::{CourseStore, MemoryStore};
use std::sync::Arc;

pub const INSTRUCTOR: &str = "instructor-ada";
pub const STUDENT: &str = "student-sam";
pub const STUDENT_2: &str = "student-kim";
pub const COURSE: &str = "course-rust-101";

pub struct World {
    pub store: MemoryStore,
    pub clock: FakeClock,
    pub scheduler: SessionScheduler<FakeClock, SequentialIdGen>,
    pub enrollments: Arc<EnrollmentManager<FakeClock, SequentialIdGen>>,
    pub ledger: AttendanceLedger<FakeClock>,
    pub projector: CalendarProjector<FakeClock>,
    pub queries: Queries,
}

/// 09:00 on a fixed Monday
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

pub fn world() -> World {
    world_with_policy(SchedulingPolicy::default())
}

pub fn world_with_policy(policy: SchedulingPolicy) -> World {
    let store = MemoryStore::new();
    let clock = FakeClock::at(t0());
    let directory = FakeDirectory::new();
    directory.add_instructor(INSTRUCTOR);
    directory.add_student(STUDENT);
    directory.add_student(STUDENT_2);
    // 40 required hours, as in the progress scenarios
    CourseStore::put(
        &store,
        &Course::new(COURSE, INSTRUCTOR, 40.0, CourseStatus::Active),
    )
    .unwrap();

    let enrollments = Arc::new(EnrollmentManager::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(directory.clone()),
        clock.clone(),
        SequentialIdGen::new("enr"),
    ));
    let scheduler = SessionScheduler::new(
        Arc::new(store.clone()),
        Arc::new(StoreCatalog::new(Arc::new(store.clone()))),
        Arc::new(directory),
        enrollments.clone(),
        policy.clone(),
        clock.clone(),
        SequentialIdGen::new("sess"),
    );
    let ledger = AttendanceLedger::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        policy.clone(),
        clock.clone(),
    );
    let projector = CalendarProjector::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        policy,
        clock.clone(),
    );
    let queries = Queries::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );

    World {
        store,
        clock,
        scheduler,
        enrollments,
        ledger,
        projector,
        queries,
    }
}

impl World {
    /// A virtual session input starting `offset_minutes` after 09:00
    pub fn session_input(&self, offset_minutes: i64, duration: i64) -> NewSession {
        NewSession {
            course_id: COURSE.into(),
            instructor_id: INSTRUCTOR.into(),
            title: "Rust for beginners".to_string(),
            scheduled_start: t0() + Duration::minutes(offset_minutes),
            duration_minutes: duration,
            modality: Modality::Virtual {
                meeting_link: "https://meet.example.com/rust-101".to_string(),
            },
            participants: vec![UserId::new(STUDENT)],
        }
    }

    /// Enroll and confirm a student in the shared course
    pub fn confirmed_enrollment(&self, student: &str) {
        let enrollment = self
            .enrollments
            .enroll(&student.into(), &COURSE.into())
            .unwrap();
        self.enrollments.confirm(&enrollment.id).unwrap();
    }
}
