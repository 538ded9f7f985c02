mod common;

use coursereq::error::AppError;
use coursereq::models::Role;
use coursereq::services::UserService;

use common::*;

#[tokio::test]
async fn get_and_rename_user() {
    let collections = seeded_collections().await;
    let service = UserService::new(collections);

    let user = service.get_user(STUDENT1).await.unwrap();
    assert_eq!(user.name, "student1");

    service.update_user_name(STUDENT1, "Ada").await.unwrap();
    let user = service.get_user(STUDENT1).await.unwrap();
    assert_eq!(user.name, "Ada");
}

#[tokio::test]
async fn get_unknown_user_is_not_found() {
    let collections = seeded_collections().await;
    let service = UserService::new(collections);

    let err = service.get_user("ghost@x").await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(_)));
}

#[tokio::test]
async fn only_staff_may_list_students() {
    let collections = seeded_collections().await;
    let service = UserService::new(collections);
    let l1 = class("COMP 1023", "2510", "L1");

    let students = service
        .get_users_from_class(INSTRUCTOR1, &l1, Role::Student)
        .await
        .unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].email, STUDENT1);

    assert!(service
        .get_users_from_class(TA1, &l1, Role::Student)
        .await
        .is_ok());

    // A student's own standing does not reveal classmates.
    let err = service
        .get_users_from_class(STUDENT1, &l1, Role::Student)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ClassPermission { .. }));
}

#[tokio::test]
async fn any_member_may_list_staff() {
    let collections = seeded_collections().await;
    let service = UserService::new(collections);
    let l1 = class("COMP 1023", "2510", "L1");

    let instructors = service
        .get_users_from_class(STUDENT1, &l1, Role::Instructor)
        .await
        .unwrap();
    assert_eq!(instructors.len(), 1);
    assert_eq!(instructors[0].email, INSTRUCTOR1);

    let tas = service
        .get_users_from_class(STUDENT1, &l1, Role::Ta)
        .await
        .unwrap();
    assert_eq!(tas.len(), 1);
    assert_eq!(tas[0].email, TA1);

    // Outsiders see neither staff nor students.
    let err = service
        .get_users_from_class(STUDENT3, &l1, Role::Instructor)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ClassPermission { .. }));
}

#[tokio::test]
async fn class_member_listing_matches_exact_section_and_role() {
    let collections = seeded_collections().await;
    let service = UserService::new(collections);

    let l2 = class("COMP 1023", "2510", "L2");
    let members = service.list_class_members(&l2, Role::Instructor).await.unwrap();
    assert!(members.is_empty());

    let members = service.list_class_members(&l2, Role::Student).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].email, STUDENT2);
}
