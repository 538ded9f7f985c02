use std::collections::BTreeMap;

use crate::db::{ensure_acknowledged, Collections};
use crate::error::AppError;
use crate::models::{Course, CourseId, RequestType, Section};
use crate::services::permission::{assert_course_instructor, assert_in_course};

pub struct CourseService {
    collections: Collections,
}

impl CourseService {
    pub fn new(collections: Collections) -> Self {
        Self { collections }
    }

    /// Course details, visible to anyone enrolled in the course.
    pub async fn get_course(&self, uid: &str, course_id: &CourseId) -> Result<Course, AppError> {
        let user = self.collections.require_user(uid).await?;
        assert_in_course(&user, course_id, "accessing course information")?;
        self.collections.require_course(course_id).await
    }

    /// All courses referenced by the viewer's enrollment, deduplicated.
    pub async fn get_courses_from_enrollment(&self, uid: &str) -> Result<Vec<Course>, AppError> {
        let user = self.collections.require_user(uid).await?;
        let mut ids: Vec<CourseId> = Vec::new();
        for entry in &user.enrollment {
            if !ids.contains(&entry.course) {
                ids.push(entry.course.clone());
            }
        }
        // Never issue an empty disjunction.
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.collections.courses.find_many(&ids).await
    }

    /// Full replace of the section map. Instructor in any section only.
    pub async fn update_sections(
        &self,
        uid: &str,
        course_id: &CourseId,
        sections: BTreeMap<String, Section>,
    ) -> Result<(), AppError> {
        let user = self.collections.require_user(uid).await?;
        assert_course_instructor(&user, course_id, "updating course sections")?;
        let result = self
            .collections
            .courses
            .replace_sections(course_id, sections)
            .await?;
        ensure_acknowledged(result, &format!("update course {course_id}"))
    }

    /// Full replace of the enabled request types. Instructor only.
    pub async fn set_effective_request_types(
        &self,
        uid: &str,
        course_id: &CourseId,
        effective_request_types: BTreeMap<RequestType, bool>,
    ) -> Result<(), AppError> {
        let user = self.collections.require_user(uid).await?;
        assert_course_instructor(&user, course_id, "updating effective request types")?;
        let result = self
            .collections
            .courses
            .replace_effective_request_types(course_id, effective_request_types)
            .await?;
        ensure_acknowledged(result, &format!("update request types for course {course_id}"))
    }
}
