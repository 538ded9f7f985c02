use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::course::CourseId;

/// A (course, section) pair. Derived from enrollment data, never stored on
/// its own; this is the unit of role-based authorization for requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Class {
    pub course: CourseId,
    pub section: String,
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.course, self.section)
    }
}

/// Closed set of request categories. The serde names are the wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RequestType {
    #[serde(rename = "Swap Section")]
    SwapSection,
    #[serde(rename = "Deadline Extension")]
    DeadlineExtension,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::SwapSection => write!(f, "Swap Section"),
            RequestType::DeadlineExtension => write!(f, "Deadline Extension"),
        }
    }
}

/// Type-specific request payload, tagged by the request-type name. The
/// lifecycle service passes this through untouched; validating the variant
/// contents against the course is the transport layer's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "metadata")]
pub enum RequestData {
    #[serde(rename = "Swap Section", rename_all = "camelCase")]
    SwapSection {
        from_section: String,
        from_date: String,
        to_section: String,
        to_date: String,
    },
    #[serde(rename = "Deadline Extension", rename_all = "camelCase")]
    DeadlineExtension {
        /// Assignment code within the course's `assignments` map.
        assignment: String,
        /// Requested new deadline.
        deadline: DateTime<Utc>,
    },
}

impl RequestData {
    pub fn request_type(&self) -> RequestType {
        match self {
            RequestData::SwapSection { .. } => RequestType::SwapSection,
            RequestData::DeadlineExtension { .. } => RequestType::DeadlineExtension,
        }
    }
}

pub const MAX_PROOF_FILES: usize = 4;
pub const MAX_PROOF_FILE_BYTES: u64 = 2 * 1024 * 1024;

/// A supporting document attached to a request, content base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofFile {
    pub name: String,
    pub size: u64,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDetails {
    /// A brief explanation of the request.
    pub reason: String,
    #[serde(default)]
    pub proof: Option<Vec<ProofFile>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approve,
    Reject,
}

/// Staff response embedded in a request. Set exactly once, then immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Responder's email.
    pub from: String,
    pub timestamp: DateTime<Utc>,
    pub decision: Decision,
    pub remarks: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseInit {
    pub decision: Decision,
    pub remarks: String,
}

/// A student request. Everything but `response` is immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    /// Requester's email.
    pub from: String,
    pub class: Class,
    #[serde(flatten)]
    pub data: RequestData,
    pub details: RequestDetails,
    pub timestamp: DateTime<Utc>,
    /// Absent while the request is open; present exactly once resolved.
    pub response: Option<Response>,
}

impl Request {
    pub fn is_resolved(&self) -> bool {
        self.response.is_some()
    }
}

/// Client-supplied part of a new request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInit {
    pub class: Class,
    #[serde(flatten)]
    pub data: RequestData,
    pub details: RequestDetails,
}
