use serde::{Deserialize, Serialize};

use crate::models::course::CourseId;
use crate::models::request::Class;

/// Closed set of roles a user may hold within a (course, section). The
/// serde names are the wire names, also used in query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Ta,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Ta => "ta",
        }
    }
}

/// A single enrollment entry: the role a user holds in one (course,
/// section). Authorization is evaluated per entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub course: CourseId,
    pub section: String,
    pub role: Role,
}

impl Enrollment {
    /// The (course, section) this entry is for.
    pub fn class(&self) -> Class {
        Class {
            course: self.course.clone(),
            section: self.section.clone(),
        }
    }
}

/// A directory user, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user's email address, used as the unique identifier.
    pub email: String,
    /// The full name of the user.
    pub name: String,
    pub enrollment: Vec<Enrollment>,
}
