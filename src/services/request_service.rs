use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::{ensure_acknowledged, Collections};
use crate::error::AppError;
use crate::models::{Class, Request, RequestInit, Response, ResponseInit, Role};
use crate::services::permission::assert_class_role;

/// Request lifecycle: `Open` (no response) transitions to `Resolved`
/// (response present) exactly once, and `Resolved` is terminal.
pub struct RequestService {
    collections: Collections,
}

impl RequestService {
    pub fn new(collections: Collections) -> Self {
        Self { collections }
    }

    /// File a new request. The requester must hold student standing in the
    /// target class, and the class must resolve to a real course section.
    pub async fn create_request(&self, from: &str, init: RequestInit) -> Result<String, AppError> {
        let user = self.collections.require_user(from).await?;
        assert_class_role(&user, &init.class, &[Role::Student], "create request")?;

        let course = self.collections.require_course(&init.class.course).await?;
        if !course.sections.contains_key(&init.class.section) {
            return Err(AppError::SectionNotFound {
                course: init.class.course,
                section: init.class.section,
            });
        }

        let id = Uuid::new_v4().to_string();
        let request = Request {
            id: id.clone(),
            from: from.to_string(),
            class: init.class,
            data: init.data,
            details: init.details,
            timestamp: Utc::now(),
            response: None,
        };
        let result = self.collections.requests.insert_one(request).await?;
        ensure_acknowledged(result, &format!("create request {id}"))?;
        info!("request {} created by {}", id, from);
        Ok(id)
    }

    /// Fetch one request. The requester always may; anyone else needs
    /// instructor or TA standing in the request's class.
    pub async fn get_request(&self, viewer: &str, id: &str) -> Result<Request, AppError> {
        let user = self.collections.require_user(viewer).await?;
        let request = self.collections.require_request(id).await?;
        if request.from != viewer {
            assert_class_role(
                &user,
                &request.class,
                &[Role::Instructor, Role::Ta],
                &format!("viewing request {id}"),
            )?;
        }
        Ok(request)
    }

    /// All requests visible to the viewer when acting as `role`.
    ///
    /// As a student this is the requests they filed. As an instructor or
    /// TA it is the requests of every class they hold that exact role in;
    /// a different section of the same course does not qualify.
    pub async fn get_requests_as(&self, viewer: &str, role: Role) -> Result<Vec<Request>, AppError> {
        let user = self.collections.require_user(viewer).await?;
        if role == Role::Student {
            return self.collections.requests.find_by_requester(viewer).await;
        }
        let classes: Vec<Class> = user
            .enrollment
            .iter()
            .filter(|e| e.role == role)
            .map(|e| e.class())
            .collect();
        // No standing as that role: an empty result, never an empty
        // disjunction pushed to the store.
        if classes.is_empty() {
            return Ok(Vec::new());
        }
        self.collections.requests.find_by_classes(&classes).await
    }

    /// Attach the response, resolving the request. First writer wins: the
    /// write is a single conditional update filtered on the response still
    /// being absent, so under concurrent attempts exactly one succeeds and
    /// the rest observe `ResponseAlreadyExists`.
    pub async fn create_response(
        &self,
        responder: &str,
        request_id: &str,
        init: ResponseInit,
    ) -> Result<(), AppError> {
        let user = self.collections.require_user(responder).await?;
        let request = self.collections.require_request(request_id).await?;
        assert_class_role(
            &user,
            &request.class,
            &[Role::Instructor],
            &format!("create response for request {request_id}"),
        )?;
        if request.response.is_some() {
            return Err(AppError::ResponseAlreadyExists(request_id.to_string()));
        }

        let response = Response {
            from: responder.to_string(),
            timestamp: Utc::now(),
            decision: init.decision,
            remarks: init.remarks,
        };
        let result = self
            .collections
            .requests
            .set_response_if_absent(request_id, response)
            .await?;
        ensure_acknowledged(result, &format!("create response for request {request_id}"))?;

        if result.matched_count == 0 {
            // Lost the race. Re-fetch to tell a concurrent resolution
            // apart from the request having vanished.
            let current = self.collections.require_request(request_id).await?;
            if current.response.is_some() {
                return Err(AppError::ResponseAlreadyExists(request_id.to_string()));
            }
            return Err(AppError::WriteNotAcknowledged(format!(
                "create response for request {request_id}"
            )));
        }
        info!("request {} resolved by {}", request_id, responder);
        Ok(())
    }
}
