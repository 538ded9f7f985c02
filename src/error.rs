use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::models::{Class, CourseId, Role};

fn role_list(roles: &[Role]) -> String {
    if roles.is_empty() {
        "any role".to_string()
    } else {
        let joined = roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join("/");
        format!("the role {joined}")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Course {0} not found")]
    CourseNotFound(CourseId),

    #[error("Section {section} not found in course {course}")]
    SectionNotFound { course: CourseId, section: String },

    #[error("Request {0} not found")]
    RequestNotFound(String),

    #[error("Request {0} does not have a response yet")]
    ResponseNotFound(String),

    #[error("User {user} does not have {} in course {course} for {operation}.", role_list(.roles))]
    CoursePermission {
        user: String,
        roles: Vec<Role>,
        course: CourseId,
        operation: String,
    },

    #[error("User {user} does not have {} in class {class} for {operation}.", role_list(.roles))]
    ClassPermission {
        user: String,
        roles: Vec<Role>,
        class: Class,
        operation: String,
    },

    #[error("Request {0} already has a response")]
    ResponseAlreadyExists(String),

    #[error("Operation {0} not acknowledged")]
    WriteNotAcknowledged(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::UserNotFound(_)
            | AppError::CourseNotFound(_)
            | AppError::SectionNotFound { .. }
            | AppError::RequestNotFound(_)
            | AppError::ResponseNotFound(_) => StatusCode::NOT_FOUND,
            AppError::CoursePermission { .. } | AppError::ClassPermission { .. } => {
                StatusCode::FORBIDDEN
            }
            AppError::ResponseAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::WriteNotAcknowledged(op) => {
                error!("write not acknowledged: {}", op);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
