// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter trait definitions

use crate::error::Result;
use rota_core::{CourseId, CourseInfo, UserId};

/// Resolves identities against the external directory service
pub trait Directory: Send + Sync {
    fn is_instructor(&self, user: &UserId) -> bool;
    fn is_student(&self, user: &UserId) -> bool;
}

/// Read-only course metadata supplied by the external catalog
pub trait CourseCatalog: Send + Sync {
    /// Fails NotFound when the course is unknown to the catalog
    fn get_course(&self, id: &CourseId) -> Result<CourseInfo>;
}
