use std::collections::BTreeMap;

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::models::{
    Class, Course, CourseId, Request, RequestInit, RequestType, ResponseInit, Role, Section, User,
    MAX_PROOF_FILES, MAX_PROOF_FILE_BYTES,
};
use crate::services::{CourseService, RequestService, UserService};
use crate::state::AppState;

/// Acting identity, taken from the `X-User-Email` header. Authentication
/// happens upstream of this service; the header is the seam.
pub struct Identity(pub String);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get("x-user-email")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("X-User-Email header is required".to_string()))?;
        Ok(Identity(email))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(get_enrolled_courses))
        .route("/courses/{code}/{term}", get(get_course))
        .route("/courses/{code}/{term}/sections", put(update_sections))
        .route(
            "/courses/{code}/{term}/request-types",
            put(set_effective_request_types),
        )
        .route("/user", get(get_user))
        .route("/user/name", patch(update_user_name))
        .route("/users", get(get_users_from_class))
        .route("/requests", get(get_requests_as).post(create_request))
        .route("/requests/{id}", get(get_request))
        .route("/requests/{id}/response", post(create_response))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    // A point lookup stands in for a driver ping.
    state.collections.users.find_one("health@invalid").await?;
    Ok(StatusCode::OK)
}

async fn get_enrolled_courses(
    State(state): State<AppState>,
    Identity(uid): Identity,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::new(state.collections.clone())
        .get_courses_from_enrollment(&uid)
        .await?;
    Ok(Json(courses))
}

async fn get_course(
    State(state): State<AppState>,
    Identity(uid): Identity,
    Path((code, term)): Path<(String, String)>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::new(state.collections.clone())
        .get_course(&uid, &CourseId { code, term })
        .await?;
    Ok(Json(course))
}

async fn update_sections(
    State(state): State<AppState>,
    Identity(uid): Identity,
    Path((code, term)): Path<(String, String)>,
    Json(sections): Json<BTreeMap<String, Section>>,
) -> Result<StatusCode, AppError> {
    CourseService::new(state.collections.clone())
        .update_sections(&uid, &CourseId { code, term }, sections)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_effective_request_types(
    State(state): State<AppState>,
    Identity(uid): Identity,
    Path((code, term)): Path<(String, String)>,
    Json(types): Json<BTreeMap<RequestType, bool>>,
) -> Result<StatusCode, AppError> {
    CourseService::new(state.collections.clone())
        .set_effective_request_types(&uid, &CourseId { code, term }, types)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_user(
    State(state): State<AppState>,
    Identity(uid): Identity,
) -> Result<Json<User>, AppError> {
    let user = UserService::new(state.collections.clone())
        .get_user(&uid)
        .await?;
    Ok(Json(user))
}

#[derive(Deserialize)]
struct UpdateNameBody {
    name: String,
}

async fn update_user_name(
    State(state): State<AppState>,
    Identity(uid): Identity,
    Json(body): Json<UpdateNameBody>,
) -> Result<StatusCode, AppError> {
    UserService::new(state.collections.clone())
        .update_user_name(&uid, &body.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct ClassMembersParams {
    code: String,
    term: String,
    section: String,
    role: Role,
}

async fn get_users_from_class(
    State(state): State<AppState>,
    Identity(uid): Identity,
    Query(params): Query<ClassMembersParams>,
) -> Result<Json<Vec<User>>, AppError> {
    let class = Class {
        course: CourseId {
            code: params.code,
            term: params.term,
        },
        section: params.section,
    };
    let users = UserService::new(state.collections.clone())
        .get_users_from_class(&uid, &class, params.role)
        .await?;
    Ok(Json(users))
}

#[derive(Deserialize)]
struct RequestListParams {
    #[serde(rename = "as")]
    acting_as: Role,
}

async fn get_requests_as(
    State(state): State<AppState>,
    Identity(uid): Identity,
    Query(params): Query<RequestListParams>,
) -> Result<Json<Vec<Request>>, AppError> {
    let requests = RequestService::new(state.collections.clone())
        .get_requests_as(&uid, params.acting_as)
        .await?;
    Ok(Json(requests))
}

async fn get_request(
    State(state): State<AppState>,
    Identity(uid): Identity,
    Path(id): Path<String>,
) -> Result<Json<Request>, AppError> {
    let request = RequestService::new(state.collections.clone())
        .get_request(&uid, &id)
        .await?;
    Ok(Json(request))
}

fn check_proof_bounds(init: &RequestInit) -> Result<(), AppError> {
    if let Some(proof) = &init.details.proof {
        if proof.len() > MAX_PROOF_FILES {
            return Err(AppError::BadRequest(format!(
                "At most {MAX_PROOF_FILES} supporting documents are allowed"
            )));
        }
        if let Some(file) = proof.iter().find(|f| f.size > MAX_PROOF_FILE_BYTES) {
            return Err(AppError::BadRequest(format!(
                "File {} exceeds the {} byte limit",
                file.name, MAX_PROOF_FILE_BYTES
            )));
        }
    }
    Ok(())
}

async fn create_request(
    State(state): State<AppState>,
    Identity(uid): Identity,
    Json(init): Json<RequestInit>,
) -> Result<Json<String>, AppError> {
    check_proof_bounds(&init)?;
    let service = RequestService::new(state.collections.clone());
    let id = service.create_request(&uid, init).await?;

    // Notify after the mutation is durable; a delivery failure never
    // rolls it back.
    let request = service.get_request(&uid, &id).await?;
    if let Err(e) = state.notifier.notify_new_request(&request).await {
        warn!("failed to notify new request {}: {}", id, e);
    }
    Ok(Json(id))
}

async fn create_response(
    State(state): State<AppState>,
    Identity(uid): Identity,
    Path(id): Path<String>,
    Json(init): Json<ResponseInit>,
) -> Result<StatusCode, AppError> {
    let service = RequestService::new(state.collections.clone());
    service.create_response(&uid, &id, init).await?;

    // Re-fetch so the notification carries the attached response.
    let request = service.get_request(&uid, &id).await?;
    if let Err(e) = state.notifier.notify_new_response(&request).await {
        warn!("failed to notify new response for {}: {}", id, e);
    }
    Ok(StatusCode::NO_CONTENT)
}
