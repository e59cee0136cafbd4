// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar projector
//!
//! Derives read-only calendar entries from sessions, one entry per
//! (owner, session). Sync is idempotent: re-running it upserts in place and
//! reports only newly created entries.

use crate::error::Result;
use crate::log_events;
use chrono::{DateTime, Utc};
use rota_core::{
    CalendarEntry, Clock, DomainError, Event, Reminder, SchedulingPolicy, Session, SessionId,
    UserId,
};
use rota_storage::{CalendarStore, SessionStore};
use std::sync::Arc;

pub struct CalendarProjector<C: Clock> {
    sessions: Arc<dyn SessionStore>,
    calendar: Arc<dyn CalendarStore>,
    policy: SchedulingPolicy,
    clock: C,
}

impl<C: Clock> CalendarProjector<C> {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        calendar: Arc<dyn CalendarStore>,
        policy: SchedulingPolicy,
        clock: C,
    ) -> Self {
        Self {
            sessions,
            calendar,
            policy,
            clock,
        }
    }

    /// Active sessions involving the owner with a start inside
    /// [range_start, range_end), ascending by start
    pub fn entries_for_owner(
        &self,
        owner: &UserId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .involving(owner)?
            .into_iter()
            .filter(|s| {
                s.is_active() && s.scheduled_start >= range_start && s.scheduled_start < range_end
            })
            .collect();
        sessions.sort_by(|a, b| {
            a.scheduled_start
                .cmp(&b.scheduled_start)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sessions)
    }

    /// Upsert a calendar entry per future active session involving the
    /// owner. Existing entries are refreshed in place (reminder state
    /// preserved); only newly created entries are returned.
    pub fn sync_from_sessions(&self, owner: &UserId) -> Result<Vec<CalendarEntry>> {
        let now = self.clock.now();
        let mut created = Vec::new();
        for session in self.sessions.involving(owner)? {
            if !session.is_active() || session.scheduled_start <= now {
                continue;
            }
            match self.calendar.get(owner, &session.id)? {
                Some(existing) => {
                    self.calendar.upsert(&existing.refreshed_from(&session))?;
                }
                None => {
                    let entry = CalendarEntry::project(
                        owner,
                        &session,
                        Reminder::with_lead(self.policy.default_reminder_lead),
                    );
                    self.calendar.upsert(&entry)?;
                    log_events(&[Event::CalendarEntryCreated {
                        owner: owner.clone(),
                        session: session.id.clone(),
                    }]);
                    created.push(entry);
                }
            }
        }
        created.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.session_id.cmp(&b.session_id)));
        Ok(created)
    }

    /// Entries whose reminder is due right now
    pub fn due_reminders(&self, owner: &UserId) -> Result<Vec<CalendarEntry>> {
        let now = self.clock.now();
        let mut due: Vec<CalendarEntry> = self
            .calendar
            .for_owner(owner)?
            .into_iter()
            .filter(|entry| entry.is_reminder_due(now))
            .collect();
        due.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.session_id.cmp(&b.session_id)));
        Ok(due)
    }

    /// Stamp an entry's reminder as delivered so it never fires again
    pub fn mark_reminder_sent(
        &self,
        owner: &UserId,
        session_id: &SessionId,
    ) -> Result<CalendarEntry> {
        let entry = self.calendar.get(owner, session_id)?.ok_or_else(|| {
            crate::error::EngineError::from(DomainError::not_found(
                "calendar entry",
                format!("{}/{}", owner, session_id),
            ))
        })?;
        let stamped = entry.mark_reminder_sent(self.clock.now());
        self.calendar.upsert(&stamped)?;
        Ok(stamped)
    }
}

#[cfg(test)]
#[path = "projector_tests.rs"]
mod tests;
