//! Notification sink. Invoked by the API layer after a successful
//! mutation; delivery failures are logged by the caller and never roll
//! the mutation back.

pub mod dto;

use std::env;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::AppError;
use crate::models::{Request, Role};
use crate::services::UserService;

#[derive(Clone, Debug)]
pub struct NotifyConfig {
    pub webhook_url: String,
    pub base_url: String,
}

impl NotifyConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let webhook_url = env::var("WEBHOOK_URL")
            .map_err(|_| AppError::BadRequest("WEBHOOK_URL is not set".to_string()))?;
        let base_url = env::var("BASE_URL")
            .map_err(|_| AppError::BadRequest("BASE_URL is not set".to_string()))?;
        Ok(Self {
            webhook_url,
            base_url,
        })
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Notify the responsible instructors, and the requester, of a new
    /// request.
    async fn notify_new_request(&self, request: &Request) -> Result<(), AppError>;
    /// Notify the requester, and the responsible instructors and TAs, of
    /// a new response. The request must carry its response already.
    async fn notify_new_response(&self, request: &Request) -> Result<(), AppError>;
}

pub struct WebhookNotifier {
    client: Client,
    config: NotifyConfig,
    users: UserService,
}

impl WebhookNotifier {
    pub fn new(config: NotifyConfig, users: UserService) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {e}")))?;
        Ok(Self {
            client,
            config,
            users,
        })
    }

    fn url_to_request(&self, rid: &str) -> String {
        format!("{}/request/{}", self.config.base_url.trim_end_matches('/'), rid)
    }

    fn url_to_response(&self, rid: &str) -> String {
        format!("{}/response/{}", self.config.base_url.trim_end_matches('/'), rid)
    }

    async fn post(&self, message: &dto::NotificationMessage) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(message)
            .send()
            .await
            .map_err(|e| AppError::BadRequest(format!("Webhook request failed: {e}")))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::BadRequest(format!(
                "Webhook error {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn notify_new_request(&self, request: &Request) -> Result<(), AppError> {
        let instructors = self
            .users
            .list_class_members(&request.class, Role::Instructor)
            .await?;
        let student = self.users.get_user(&request.from).await?;

        let instructor_emails: Vec<String> =
            instructors.iter().map(|i| i.email.clone()).collect();
        let instructor_names = instructors
            .iter()
            .map(|i| i.name.clone())
            .collect::<Vec<_>>()
            .join(", ");

        self.post(&dto::NotificationMessage {
            event: dto::NotificationEvent::NewRequest,
            to: instructor_emails,
            cc: vec![student.email.clone()],
            subject: "New Request".to_string(),
            context: dto::NotificationContext {
                request_link: self.url_to_request(&request.id),
                response_link: self.url_to_response(&request.id),
                student_name: student.name,
                instructor_names: Some(instructor_names),
                instructor_name: None,
                decision: None,
                remarks: None,
            },
        })
        .await
    }

    async fn notify_new_response(&self, request: &Request) -> Result<(), AppError> {
        let response = request
            .response
            .as_ref()
            .ok_or_else(|| AppError::ResponseNotFound(request.id.clone()))?;

        let student = self.users.get_user(&request.from).await?;
        let instructor = self.users.get_user(&response.from).await?;
        let instructors = self
            .users
            .list_class_members(&request.class, Role::Instructor)
            .await?;
        let tas = self
            .users
            .list_class_members(&request.class, Role::Ta)
            .await?;

        let cc = instructors
            .iter()
            .chain(tas.iter())
            .map(|u| u.email.clone())
            .collect();

        self.post(&dto::NotificationMessage {
            event: dto::NotificationEvent::NewResponse,
            to: vec![student.email.clone()],
            cc,
            subject: "New Response".to_string(),
            context: dto::NotificationContext {
                request_link: self.url_to_request(&request.id),
                response_link: self.url_to_response(&request.id),
                student_name: student.name,
                instructor_names: None,
                instructor_name: Some(instructor.name),
                decision: Some(format!("{:?}", response.decision)),
                remarks: Some(response.remarks.clone()),
            },
        })
        .await
    }
}

/// Inert sink for tests and deployments without a webhook configured.
pub struct NoopNotifier;

#[async_trait]
impl NotificationSink for NoopNotifier {
    async fn notify_new_request(&self, _request: &Request) -> Result<(), AppError> {
        Ok(())
    }

    async fn notify_new_response(&self, _request: &Request) -> Result<(), AppError> {
        Ok(())
    }
}
