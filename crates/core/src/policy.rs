// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling policy configuration
//!
//! Policy knobs the host application tunes per deployment, loadable from
//! TOML. Duration fields use humantime syntax ("24h", "30m").

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunable scheduling rules
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulingPolicy {
    /// Two sessions of the same course sharing an identical start time do
    /// not count as a conflict (co-taught / split sessions).
    pub allow_shared_start_same_course: bool,
    /// How long after session end a student may record their own attendance
    #[serde(with = "humantime_serde")]
    pub self_service_window: Duration,
    /// Require a confirmed enrollment for self-service attendance
    pub self_service_requires_confirmed: bool,
    /// Reminder lead time for newly projected calendar entries
    #[serde(with = "humantime_serde")]
    pub default_reminder_lead: Duration,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            allow_shared_start_same_course: true,
            self_service_window: Duration::from_secs(24 * 60 * 60),
            self_service_requires_confirmed: false,
            default_reminder_lead: Duration::from_secs(30 * 60),
        }
    }
}

impl SchedulingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shared_start_same_course(mut self, allow: bool) -> Self {
        self.allow_shared_start_same_course = allow;
        self
    }

    pub fn with_self_service_window(mut self, window: Duration) -> Self {
        self.self_service_window = window;
        self
    }

    pub fn with_self_service_requires_confirmed(mut self, require: bool) -> Self {
        self.self_service_requires_confirmed = require;
        self
    }

    pub fn with_default_reminder_lead(mut self, lead: Duration) -> Self {
        self.default_reminder_lead = lead;
        self
    }

    /// Parse a policy from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, PolicyError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a policy file; missing file falls back to defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no policy file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let policy = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "scheduling policy loaded");
        Ok(policy)
    }

    /// Self-service window as a chrono duration for timestamp arithmetic
    pub fn self_service_window_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.self_service_window)
            .unwrap_or_else(|_| chrono::Duration::MAX)
    }

    /// Reminder lead as a chrono duration for timestamp arithmetic
    pub fn default_reminder_lead_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.default_reminder_lead)
            .unwrap_or_else(|_| chrono::Duration::MAX)
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
