//! JSON file-based storage
//!
//! One pretty-printed JSON file per entity under `<base>/<kind>/<id>.json`.
//! Query helpers come from the repository trait defaults over `list`.

use crate::error::StorageError;
use crate::repository::{CalendarStore, CourseStore, EnrollmentStore, SessionStore};
use rota_core::{
    CalendarEntry, Course, CourseId, Enrollment, EnrollmentId, Session, SessionId, UserId,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::PathBuf;

const SESSIONS: &str = "sessions";
const ENROLLMENTS: &str = "enrollments";
const COURSES: &str = "courses";
const CALENDAR: &str = "calendar";

/// JSON file-based store
#[derive(Clone)]
pub struct JsonStore {
    base_path: PathBuf,
}

impl JsonStore {
    /// Open a store at the given path
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Open a temporary store for testing
    pub fn open_temp() -> Result<Self, StorageError> {
        let temp_dir = std::env::temp_dir().join(format!("rota-test-{}", uuid::Uuid::new_v4()));
        Self::open(temp_dir)
    }

    fn save<T: Serialize>(&self, kind: &str, id: &str, data: &T) -> Result<(), StorageError> {
        let path = self.path_for(kind, id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&path, json)?;
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, kind: &str, id: &str) -> Result<Option<T>, StorageError> {
        let path = self.path_for(kind, id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn load_all<T: DeserializeOwned>(&self, kind: &str) -> Result<Vec<T>, StorageError> {
        let dir = self.base_path.join(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut values = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let json = fs::read_to_string(&path)?;
                values.push(serde_json::from_str(&json)?);
            }
        }
        Ok(values)
    }

    fn path_for(&self, kind: &str, id: &str) -> PathBuf {
        self.base_path.join(kind).join(format!("{}.json", id))
    }

    fn calendar_key(owner: &UserId, session: &SessionId) -> String {
        format!("{}__{}", owner, session)
    }
}

impl SessionStore for JsonStore {
    fn get(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        self.load(SESSIONS, &id.0)
    }

    fn put(&self, session: &Session) -> Result<(), StorageError> {
        self.save(SESSIONS, &session.id.0, session)
    }

    fn list(&self) -> Result<Vec<Session>, StorageError> {
        self.load_all(SESSIONS)
    }
}

impl EnrollmentStore for JsonStore {
    fn get(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StorageError> {
        self.load(ENROLLMENTS, &id.0)
    }

    fn put(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        self.save(ENROLLMENTS, &enrollment.id.0, enrollment)
    }

    fn list(&self) -> Result<Vec<Enrollment>, StorageError> {
        self.load_all(ENROLLMENTS)
    }
}

impl CourseStore for JsonStore {
    fn get(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        self.load(COURSES, &id.0)
    }

    fn put(&self, course: &Course) -> Result<(), StorageError> {
        self.save(COURSES, &course.id.0, course)
    }

    fn list(&self) -> Result<Vec<Course>, StorageError> {
        self.load_all(COURSES)
    }
}

impl CalendarStore for JsonStore {
    fn get(
        &self,
        owner: &UserId,
        session: &SessionId,
    ) -> Result<Option<CalendarEntry>, StorageError> {
        self.load(CALENDAR, &Self::calendar_key(owner, session))
    }

    fn upsert(&self, entry: &CalendarEntry) -> Result<(), StorageError> {
        self.save(
            CALENDAR,
            &Self::calendar_key(&entry.owner_id, &entry.session_id),
            entry,
        )
    }

    fn for_owner(&self, owner: &UserId) -> Result<Vec<CalendarEntry>, StorageError> {
        Ok(self
            .load_all::<CalendarEntry>(CALENDAR)?
            .into_iter()
            .filter(|e| &e.owner_id == owner)
            .collect())
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
