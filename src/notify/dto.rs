use serde::Serialize;

/// Envelope posted to the notification webhook. The receiving side owns
/// templating and delivery; this core only names recipients and context.
#[derive(Debug, Serialize)]
pub struct NotificationMessage {
    pub event: NotificationEvent,
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    pub subject: String,
    pub context: NotificationContext,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    NewRequest,
    NewResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContext {
    pub request_link: String,
    pub response_link: String,
    pub student_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_names: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}
