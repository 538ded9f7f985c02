//! Storage seam. The directory store is an external collaborator; this
//! module only defines the per-collection contracts the services program
//! against, plus the in-memory implementation used by the dev server and
//! the test suite.
//!
//! Filters are always built in-process and expressed as domain-specific
//! finder methods, so an empty disjunction never reaches a driver.

pub mod memory;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Class, Course, CourseId, Request, RequestType, Response, Role, Section, User};

/// Outcome of a store write, as reported by the driver.
#[derive(Debug, Clone, Copy)]
pub struct WriteResult {
    pub acknowledged: bool,
    /// Documents matched by the write's filter. For inserts this is 1.
    pub matched_count: u64,
}

impl WriteResult {
    pub fn matched(count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count: count,
        }
    }
}

/// Treat a non-acknowledged write as fatal. Retrying, if it happens at
/// all, is the caller's business.
pub fn ensure_acknowledged(result: WriteResult, op: &str) -> Result<(), AppError> {
    if result.acknowledged {
        Ok(())
    } else {
        Err(AppError::WriteNotAcknowledged(op.to_string()))
    }
}

#[async_trait]
pub trait UserCollection: Send + Sync {
    async fn find_one(&self, email: &str) -> Result<Option<User>, AppError>;
    /// All users holding an enrollment entry matching (course, section, role).
    async fn find_by_class_role(&self, class: &Class, role: Role) -> Result<Vec<User>, AppError>;
    async fn insert_one(&self, user: User) -> Result<WriteResult, AppError>;
    async fn update_name(&self, email: &str, name: &str) -> Result<WriteResult, AppError>;
}

#[async_trait]
pub trait CourseCollection: Send + Sync {
    async fn find_one(&self, id: &CourseId) -> Result<Option<Course>, AppError>;
    /// Disjunctive lookup; callers must not pass an empty slice.
    async fn find_many(&self, ids: &[CourseId]) -> Result<Vec<Course>, AppError>;
    async fn insert_one(&self, course: Course) -> Result<WriteResult, AppError>;
    async fn replace_sections(
        &self,
        id: &CourseId,
        sections: BTreeMap<String, Section>,
    ) -> Result<WriteResult, AppError>;
    async fn replace_effective_request_types(
        &self,
        id: &CourseId,
        types: BTreeMap<RequestType, bool>,
    ) -> Result<WriteResult, AppError>;
}

#[async_trait]
pub trait RequestCollection: Send + Sync {
    async fn find_one(&self, id: &str) -> Result<Option<Request>, AppError>;
    async fn find_by_requester(&self, email: &str) -> Result<Vec<Request>, AppError>;
    /// Disjunctive lookup; callers must not pass an empty slice.
    async fn find_by_classes(&self, classes: &[Class]) -> Result<Vec<Request>, AppError>;
    async fn insert_one(&self, request: Request) -> Result<WriteResult, AppError>;
    /// Atomically attach `response` to the request, conditioned on no
    /// response being present at write time. A `matched_count` of zero
    /// means the condition did not hold (or the request is gone); the
    /// first writer wins and the document is never overwritten.
    async fn set_response_if_absent(
        &self,
        id: &str,
        response: Response,
    ) -> Result<WriteResult, AppError>;
}

/// Handles to the three collections, shared across services.
#[derive(Clone)]
pub struct Collections {
    pub users: Arc<dyn UserCollection>,
    pub courses: Arc<dyn CourseCollection>,
    pub requests: Arc<dyn RequestCollection>,
}

impl Collections {
    pub async fn require_user(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_one(email)
            .await?
            .ok_or_else(|| AppError::UserNotFound(email.to_string()))
    }

    pub async fn require_course(&self, id: &CourseId) -> Result<Course, AppError> {
        self.courses
            .find_one(id)
            .await?
            .ok_or_else(|| AppError::CourseNotFound(id.clone()))
    }

    pub async fn require_request(&self, id: &str) -> Result<Request, AppError> {
        self.requests
            .find_one(id)
            .await?
            .ok_or_else(|| AppError::RequestNotFound(id.to_string()))
    }
}
