// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derived calendar entries and reminder timing
//!
//! Entries are projections of sessions for one owner, keyed by
//! (owner, session). They are never authoritative; the projector upserts
//! them from session state.

use crate::id::UserId;
use crate::session::{Modality, Session, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reminder configuration and delivery state for one entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub enabled: bool,
    /// How long before the session start the reminder becomes due
    #[serde(with = "humantime_serde")]
    pub lead: Duration,
    pub sent_at: Option<DateTime<Utc>>,
}

impl Reminder {
    pub fn with_lead(lead: Duration) -> Self {
        Self {
            enabled: true,
            lead,
            sent_at: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            lead: Duration::ZERO,
            sent_at: None,
        }
    }

    fn lead_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.lead).unwrap_or_else(|_| chrono::Duration::MAX)
    }
}

/// One owner's view of one session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub owner_id: UserId,
    pub session_id: SessionId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
    /// Location or meeting link mirrored from the session
    pub modality: Modality,
    pub reminder: Reminder,
}

impl CalendarEntry {
    /// Derive the entry for one owner from a session
    pub fn project(owner: &UserId, session: &Session, reminder: Reminder) -> Self {
        Self {
            owner_id: owner.clone(),
            session_id: session.id.clone(),
            title: session.title.clone(),
            start: session.scheduled_start,
            duration_minutes: session.duration_minutes,
            modality: session.modality.clone(),
            reminder,
        }
    }

    /// Refresh the mirrored fields from the session, keeping reminder state
    pub fn refreshed_from(&self, session: &Session) -> Self {
        Self {
            title: session.title.clone(),
            start: session.scheduled_start,
            duration_minutes: session.duration_minutes,
            modality: session.modality.clone(),
            ..self.clone()
        }
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + chrono::Duration::minutes(self.duration_minutes)
    }

    /// Reminder is enabled, unsent, and now falls within [start − lead, start)
    pub fn is_reminder_due(&self, now: DateTime<Utc>) -> bool {
        self.reminder.enabled
            && self.reminder.sent_at.is_none()
            && now >= self.start - self.reminder.lead_chrono()
            && now < self.start
    }

    /// Stamp the reminder as delivered
    pub fn mark_reminder_sent(&self, now: DateTime<Utc>) -> Self {
        let mut entry = self.clone();
        entry.reminder.sent_at = Some(now);
        entry
    }
}

#[cfg(test)]
#[path = "calendar_tests.rs"]
mod tests;
