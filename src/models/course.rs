use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::request::RequestType;

/// Composite course key: catalog code plus term, both opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId {
    pub code: String,
    pub term: String,
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.term)
    }
}

/// A weekly meeting of a section. `day` is an ISO weekday (1 = Monday),
/// `from`/`to` are ISO time-of-day strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: u8,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    pub schedule: Vec<TimeSlot>,
}

/// An assignment of a course. `max_extension` is an ISO 8601 duration
/// bounding how far past `due` a deadline-extension request may reach;
/// this core passes it through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub name: String,
    pub due: DateTime<Utc>,
    pub max_extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: String,
    pub term: String,
    pub title: String,
    /// Section label -> schedule.
    pub sections: BTreeMap<String, Section>,
    /// Assignment code -> assignment.
    #[serde(default)]
    pub assignments: BTreeMap<String, Assignment>,
    /// Which request types are currently enabled for this course.
    pub effective_request_types: BTreeMap<RequestType, bool>,
}

impl Course {
    pub fn id(&self) -> CourseId {
        CourseId {
            code: self.code.clone(),
            term: self.term.clone(),
        }
    }
}
