//! Shared fixtures. Users and courses are seeded into the store up
//! front; requests are created by the tests themselves. Modifying this
//! data may affect multiple tests.

#![allow(dead_code)]

use coursereq::db::memory::{MemoryStore, SeedData};
use coursereq::db::Collections;
use coursereq::models::{
    Class, Course, CourseId, Decision, Enrollment, RequestData, RequestDetails, RequestInit,
    RequestType, ResponseInit, Role, Section, User,
};

pub const STUDENT1: &str = "student1@connect.ust.hk";
pub const STUDENT2: &str = "student2@connect.ust.hk";
pub const STUDENT3: &str = "student3@connect.ust.hk";
pub const TA1: &str = "ta1@connect.ust.hk";
pub const INSTRUCTOR1: &str = "instructor1@ust.hk";
pub const INSTRUCTOR2: &str = "instructor2@ust.hk";

pub fn course_id(code: &str, term: &str) -> CourseId {
    CourseId {
        code: code.to_string(),
        term: term.to_string(),
    }
}

pub fn class(code: &str, term: &str, section: &str) -> Class {
    Class {
        course: course_id(code, term),
        section: section.to_string(),
    }
}

pub fn user(email: &str, name: &str, enrollment: Vec<(&str, &str, &str, Role)>) -> User {
    User {
        email: email.to_string(),
        name: name.to_string(),
        enrollment: enrollment
            .into_iter()
            .map(|(code, term, section, role)| Enrollment {
                course: course_id(code, term),
                section: section.to_string(),
                role,
            })
            .collect(),
    }
}

fn course(code: &str, term: &str, title: &str, sections: &[&str]) -> Course {
    Course {
        code: code.to_string(),
        term: term.to_string(),
        title: title.to_string(),
        sections: sections
            .iter()
            .map(|s| (s.to_string(), Section::default()))
            .collect(),
        assignments: Default::default(),
        effective_request_types: [
            (RequestType::SwapSection, true),
            (RequestType::DeadlineExtension, true),
        ]
        .into_iter()
        .collect(),
    }
}

pub fn seed_data() -> SeedData {
    SeedData {
        users: vec![
            user(
                STUDENT1,
                "student1",
                vec![
                    ("COMP 1023", "2510", "L1", Role::Student),
                    ("COMP 1023", "2510", "LA1", Role::Student),
                ],
            ),
            user(
                STUDENT2,
                "student2",
                vec![
                    ("COMP 1023", "2510", "L2", Role::Student),
                    ("COMP 1023", "2510", "LA2", Role::Student),
                ],
            ),
            user(
                STUDENT3,
                "student3",
                vec![("COMP 1023", "2530", "L1", Role::Student)],
            ),
            user(
                TA1,
                "ta1",
                vec![
                    ("COMP 1023", "2510", "L1", Role::Ta),
                    ("COMP 1023", "2510", "LA1", Role::Ta),
                    ("COMP 4971H", "2510", "R1", Role::Student),
                ],
            ),
            user(
                INSTRUCTOR1,
                "instructor1",
                vec![
                    ("COMP 1023", "2510", "L1", Role::Instructor),
                    ("COMP 1023", "2510", "LA1", Role::Instructor),
                ],
            ),
            user(
                INSTRUCTOR2,
                "instructor2",
                vec![("COMP 4971H", "2510", "R1", Role::Instructor)],
            ),
        ],
        courses: vec![
            course("COMP 1023", "2510", "Python", &["L1", "L2", "LA1", "LA2"]),
            course("COMP 1023", "2530", "Python", &["L1"]),
            course("COMP 4971H", "2510", "Independent Work", &["R1"]),
        ],
    }
}

pub async fn seeded_collections() -> Collections {
    let store = MemoryStore::new();
    store.seed(seed_data()).await;
    store.collections()
}

/// A swap-section request against COMP 1023 (2510) L1, the class
/// `STUDENT1` is enrolled in.
pub fn request_init() -> RequestInit {
    RequestInit {
        class: class("COMP 1023", "2510", "L1"),
        data: RequestData::SwapSection {
            from_section: "L1".to_string(),
            from_date: "2025-11-25".to_string(),
            to_section: "L2".to_string(),
            to_date: "2025-11-26".to_string(),
        },
        details: RequestDetails {
            reason: "time clash".to_string(),
            proof: None,
        },
    }
}

pub fn response_init() -> ResponseInit {
    ResponseInit {
        decision: Decision::Approve,
        remarks: "^^".to_string(),
    }
}
