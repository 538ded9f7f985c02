//! Authorization guard: pure decision functions over an already-resolved
//! user. No storage access; policy stays testable with in-memory fixtures.

use crate::error::AppError;
use crate::models::{Class, CourseId, Role, User};

/// Any enrollment entry in the course, regardless of role or section.
pub fn assert_in_course(user: &User, course: &CourseId, op: &str) -> Result<(), AppError> {
    let in_course = user.enrollment.iter().any(|e| e.course == *course);
    if in_course {
        Ok(())
    } else {
        Err(AppError::CoursePermission {
            user: user.email.clone(),
            roles: vec![],
            course: course.clone(),
            operation: op.to_string(),
        })
    }
}

/// Instructor standing in any section of the course.
pub fn assert_course_instructor(user: &User, course: &CourseId, op: &str) -> Result<(), AppError> {
    let is_instructor = user
        .enrollment
        .iter()
        .any(|e| e.course == *course && e.role == Role::Instructor);
    if is_instructor {
        Ok(())
    } else {
        Err(AppError::CoursePermission {
            user: user.email.clone(),
            roles: vec![Role::Instructor],
            course: course.clone(),
            operation: op.to_string(),
        })
    }
}

/// One of `roles`, held in exactly the (course, section) of `class`. A
/// different section of the same course does not qualify.
pub fn assert_class_role(
    user: &User,
    class: &Class,
    roles: &[Role],
    op: &str,
) -> Result<(), AppError> {
    let has_role = user
        .enrollment
        .iter()
        .any(|e| e.course == class.course && e.section == class.section && roles.contains(&e.role));
    if has_role {
        Ok(())
    } else {
        Err(AppError::ClassPermission {
            user: user.email.clone(),
            roles: roles.to_vec(),
            class: class.clone(),
            operation: op.to_string(),
        })
    }
}
