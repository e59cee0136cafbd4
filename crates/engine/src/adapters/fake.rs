// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory directory fake for tests and single-tenant hosts

use super::traits::Directory;
use rota_core::UserId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Roles {
    instructors: HashSet<UserId>,
    students: HashSet<UserId>,
}

/// Directory fake registered by id
#[derive(Clone, Default)]
pub struct FakeDirectory {
    roles: Arc<Mutex<Roles>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_instructor(&self, user: impl Into<UserId>) {
        let mut roles = self.roles.lock().unwrap_or_else(|e| e.into_inner());
        roles.instructors.insert(user.into());
    }

    pub fn add_student(&self, user: impl Into<UserId>) {
        let mut roles = self.roles.lock().unwrap_or_else(|e| e.into_inner());
        roles.students.insert(user.into());
    }
}

impl Directory for FakeDirectory {
    fn is_instructor(&self, user: &UserId) -> bool {
        let roles = self.roles.lock().unwrap_or_else(|e| e.into_inner());
        roles.instructors.contains(user)
    }

    fn is_student(&self, user: &UserId) -> bool {
        let roles = self.roles.lock().unwrap_or_else(|e| e.into_inner());
        roles.students.contains(user)
    }
}
