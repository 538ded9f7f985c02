pub mod course;
pub mod request;
pub mod user;

pub use course::{Assignment, Course, CourseId, Section, TimeSlot};
pub use request::{
    Class, Decision, ProofFile, Request, RequestData, RequestDetails, RequestInit, RequestType,
    Response, ResponseInit, MAX_PROOF_FILES, MAX_PROOF_FILE_BYTES,
};
pub use user::{Enrollment, Role, User};
