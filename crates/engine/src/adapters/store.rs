// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Catalog adapter backed by the local course store
//!
//! Hosts that mirror catalog data into the course store get a catalog view
//! for free; hosts with a remote catalog implement `CourseCatalog` directly.

use super::traits::CourseCatalog;
use crate::error::{EngineError, Result};
use rota_core::{CourseId, CourseInfo, DomainError};
use rota_storage::CourseStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct StoreCatalog {
    courses: Arc<dyn CourseStore>,
}

impl StoreCatalog {
    pub fn new(courses: Arc<dyn CourseStore>) -> Self {
        Self { courses }
    }
}

impl CourseCatalog for StoreCatalog {
    fn get_course(&self, id: &CourseId) -> Result<CourseInfo> {
        match self.courses.get(id)? {
            Some(course) => Ok(course.info()),
            None => Err(EngineError::from(DomainError::not_found(
                "course",
                id.to_string(),
            ))),
        }
    }
}
