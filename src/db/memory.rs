//! In-memory directory store. Backs the dev server and the test suite;
//! a real deployment swaps in a driver-backed implementation of the same
//! traits. Writes on a collection serialize through its `RwLock`, which
//! is what makes `set_response_if_absent` a single atomic step.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::db::{
    Collections, CourseCollection, RequestCollection, UserCollection, WriteResult,
};
use crate::error::AppError;
use crate::models::{Class, Course, CourseId, Request, RequestType, Response, Role, Section, User};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<BTreeMap<String, User>>,
    courses: RwLock<BTreeMap<(String, String), Course>>,
    requests: RwLock<BTreeMap<String, Request>>,
}

/// Users and courses provisioned at boot, standing in for the external
/// onboarding process.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn collections(self: &Arc<Self>) -> Collections {
        Collections {
            users: self.clone(),
            courses: self.clone(),
            requests: self.clone(),
        }
    }

    pub async fn seed(&self, data: SeedData) {
        let mut users = self.users.write().await;
        for user in data.users {
            users.insert(user.email.clone(), user);
        }
        let mut courses = self.courses.write().await;
        for course in data.courses {
            courses.insert((course.code.clone(), course.term.clone()), course);
        }
    }

    pub async fn seed_from_file(&self, path: &Path) -> Result<(), AppError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::BadRequest(format!("cannot read seed file: {e}")))?;
        let data: SeedData = serde_json::from_str(&raw)
            .map_err(|e| AppError::BadRequest(format!("cannot parse seed file: {e}")))?;
        self.seed(data).await;
        Ok(())
    }
}

fn course_key(id: &CourseId) -> (String, String) {
    (id.code.clone(), id.term.clone())
}

#[async_trait]
impl UserCollection for MemoryStore {
    async fn find_one(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn find_by_class_role(&self, class: &Class, role: Role) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| {
                u.enrollment
                    .iter()
                    .any(|e| e.role == role && e.course == class.course && e.section == class.section)
            })
            .cloned()
            .collect())
    }

    async fn insert_one(&self, user: User) -> Result<WriteResult, AppError> {
        self.users.write().await.insert(user.email.clone(), user);
        Ok(WriteResult::matched(1))
    }

    async fn update_name(&self, email: &str, name: &str) -> Result<WriteResult, AppError> {
        let mut users = self.users.write().await;
        match users.get_mut(email) {
            Some(user) => {
                user.name = name.to_string();
                Ok(WriteResult::matched(1))
            }
            None => Ok(WriteResult::matched(0)),
        }
    }
}

#[async_trait]
impl CourseCollection for MemoryStore {
    async fn find_one(&self, id: &CourseId) -> Result<Option<Course>, AppError> {
        Ok(self.courses.read().await.get(&course_key(id)).cloned())
    }

    async fn find_many(&self, ids: &[CourseId]) -> Result<Vec<Course>, AppError> {
        let courses = self.courses.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| courses.get(&course_key(id)).cloned())
            .collect())
    }

    async fn insert_one(&self, course: Course) -> Result<WriteResult, AppError> {
        self.courses
            .write()
            .await
            .insert((course.code.clone(), course.term.clone()), course);
        Ok(WriteResult::matched(1))
    }

    async fn replace_sections(
        &self,
        id: &CourseId,
        sections: BTreeMap<String, Section>,
    ) -> Result<WriteResult, AppError> {
        let mut courses = self.courses.write().await;
        match courses.get_mut(&course_key(id)) {
            Some(course) => {
                course.sections = sections;
                Ok(WriteResult::matched(1))
            }
            None => Ok(WriteResult::matched(0)),
        }
    }

    async fn replace_effective_request_types(
        &self,
        id: &CourseId,
        types: BTreeMap<RequestType, bool>,
    ) -> Result<WriteResult, AppError> {
        let mut courses = self.courses.write().await;
        match courses.get_mut(&course_key(id)) {
            Some(course) => {
                course.effective_request_types = types;
                Ok(WriteResult::matched(1))
            }
            None => Ok(WriteResult::matched(0)),
        }
    }
}

#[async_trait]
impl RequestCollection for MemoryStore {
    async fn find_one(&self, id: &str) -> Result<Option<Request>, AppError> {
        Ok(self.requests.read().await.get(id).cloned())
    }

    async fn find_by_requester(&self, email: &str) -> Result<Vec<Request>, AppError> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .filter(|r| r.from == email)
            .cloned()
            .collect())
    }

    async fn find_by_classes(&self, classes: &[Class]) -> Result<Vec<Request>, AppError> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .filter(|r| classes.contains(&r.class))
            .cloned()
            .collect())
    }

    async fn insert_one(&self, request: Request) -> Result<WriteResult, AppError> {
        self.requests
            .write()
            .await
            .insert(request.id.clone(), request);
        Ok(WriteResult::matched(1))
    }

    async fn set_response_if_absent(
        &self,
        id: &str,
        response: Response,
    ) -> Result<WriteResult, AppError> {
        let mut requests = self.requests.write().await;
        match requests.get_mut(id) {
            Some(request) if request.response.is_none() => {
                request.response = Some(response);
                Ok(WriteResult::matched(1))
            }
            // Filter did not match: request resolved already, or gone.
            _ => Ok(WriteResult::matched(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::{Decision, RequestData, RequestDetails};

    fn request(id: &str) -> Request {
        Request {
            id: id.to_string(),
            from: "student1@connect.ust.hk".to_string(),
            class: Class {
                course: CourseId {
                    code: "COMP 1023".to_string(),
                    term: "2510".to_string(),
                },
                section: "L1".to_string(),
            },
            data: RequestData::SwapSection {
                from_section: "L1".to_string(),
                from_date: "2025-11-25".to_string(),
                to_section: "L2".to_string(),
                to_date: "2025-11-26".to_string(),
            },
            details: RequestDetails {
                reason: "clash".to_string(),
                proof: None,
            },
            timestamp: Utc::now(),
            response: None,
        }
    }

    fn response(from: &str, remarks: &str) -> Response {
        Response {
            from: from.to_string(),
            timestamp: Utc::now(),
            decision: Decision::Approve,
            remarks: remarks.to_string(),
        }
    }

    #[tokio::test]
    async fn set_response_matches_only_while_absent() {
        let store = MemoryStore::new();
        let requests: &dyn RequestCollection = store.as_ref();
        requests.insert_one(request("r1")).await.unwrap();

        let first = requests
            .set_response_if_absent("r1", response("instructor1@ust.hk", "ok"))
            .await
            .unwrap();
        assert_eq!(first.matched_count, 1);

        let second = requests
            .set_response_if_absent("r1", response("instructor2@ust.hk", "no"))
            .await
            .unwrap();
        assert_eq!(second.matched_count, 0);

        let kept = requests.find_one("r1").await.unwrap().unwrap();
        assert_eq!(kept.response.unwrap().remarks, "ok");
    }

    #[tokio::test]
    async fn set_response_on_missing_request_matches_nothing() {
        let store = MemoryStore::new();
        let requests: &dyn RequestCollection = store.as_ref();
        let result = requests
            .set_response_if_absent("nope", response("instructor1@ust.hk", "ok"))
            .await
            .unwrap();
        assert_eq!(result.matched_count, 0);
    }

    #[tokio::test]
    async fn find_by_classes_matches_exact_section() {
        let store = MemoryStore::new();
        let requests: &dyn RequestCollection = store.as_ref();
        requests.insert_one(request("r1")).await.unwrap();

        let l1 = Class {
            course: CourseId {
                code: "COMP 1023".to_string(),
                term: "2510".to_string(),
            },
            section: "L1".to_string(),
        };
        let l2 = Class {
            section: "L2".to_string(),
            ..l1.clone()
        };

        assert_eq!(requests.find_by_classes(&[l1]).await.unwrap().len(), 1);
        assert_eq!(requests.find_by_classes(&[l2]).await.unwrap().len(), 0);
    }
}
