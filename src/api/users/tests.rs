use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn admin_lists_users_with_pagination() {
    let ctx = test_support::setup_test_context().await;

    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin User",
        "admin@example.com",
        UserRole::Admin,
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(admin.id, ctx.state.settings());

    for index in 0..12 {
        test_support::insert_user(
            ctx.state.db(),
            &format!("Student {index}"),
            &format!("student{index}@example.com"),
            UserRole::Student,
            "student-pass",
        )
        .await;
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/users", Some(&token), None))
        .await
        .expect("list users");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    // 12 students + the admin, first page capped at USERS_PER_PAGE
    assert_eq!(body["total_count"], 13);
    assert_eq!(body["items"].as_array().expect("items").len(), 10);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/users?page=2",
            Some(&token),
            None,
        ))
        .await
        .expect("list users page 2");

    let body = test_support::read_json(response).await;
    assert_eq!(body["items"].as_array().expect("items").len(), 3);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/users?page=99",
            Some(&token),
            None,
        ))
        .await
        .expect("list users out of range");

    let body = test_support::read_json(response).await;
    assert_eq!(body["items"].as_array().expect("items").len(), 0);
}

#[tokio::test]
async fn non_admin_cannot_list_users() {
    let ctx = test_support::setup_test_context().await;

    let student = test_support::insert_user(
        ctx.state.db(),
        "Student",
        "student@example.com",
        UserRole::Student,
        "student-pass",
    )
    .await;
    let token = test_support::bearer_token(student.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/users", Some(&token), None))
        .await
        .expect("list users as student");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_user_cascades_to_taught_courses_only() {
    let ctx = test_support::setup_test_context().await;

    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "admin@example.com",
        UserRole::Admin,
        "admin-pass",
    )
    .await;
    let instructor = test_support::insert_user(
        ctx.state.db(),
        "Doomed Instructor",
        "doomed@example.com",
        UserRole::Instructor,
        "teach-pass",
    )
    .await;
    let other_instructor = test_support::insert_user(
        ctx.state.db(),
        "Other Instructor",
        "other@example.com",
        UserRole::Instructor,
        "teach-pass",
    )
    .await;
    let student = test_support::insert_user(
        ctx.state.db(),
        "Student",
        "student@example.com",
        UserRole::Student,
        "student-pass",
    )
    .await;

    let category = test_support::insert_category(ctx.state.db(), "Web Development").await;
    let doomed_course =
        test_support::insert_course(ctx.state.db(), "Doomed Course", instructor.id, category.id)
            .await;
    let surviving_course = test_support::insert_course(
        ctx.state.db(),
        "Surviving Course",
        other_instructor.id,
        category.id,
    )
    .await;

    // The student is active on both courses; only the doomed course's rows
    // should disappear with the instructor.
    test_support::insert_enrollment(ctx.state.db(), student.id, doomed_course.id).await;
    test_support::insert_enrollment(ctx.state.db(), student.id, surviving_course.id).await;
    test_support::insert_review(ctx.state.db(), student.id, doomed_course.id, 5).await;
    test_support::insert_review(ctx.state.db(), student.id, surviving_course.id, 4).await;

    let token = test_support::bearer_token(admin.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/users/{}", instructor.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete instructor");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let gone = repositories::users::find_by_id(ctx.state.db(), instructor.id)
        .await
        .expect("find deleted instructor");
    assert!(gone.is_none());

    let course_gone = repositories::courses::find_by_id(ctx.state.db(), doomed_course.id)
        .await
        .expect("find doomed course");
    assert!(course_gone.is_none());

    let doomed_enrollments =
        repositories::enrollments::count_for_course(ctx.state.db(), doomed_course.id)
            .await
            .expect("count doomed enrollments");
    assert_eq!(doomed_enrollments, 0);

    // Unrelated course and its rows are untouched.
    let surviving = repositories::courses::find_by_id(ctx.state.db(), surviving_course.id)
        .await
        .expect("find surviving course");
    assert!(surviving.is_some());

    let surviving_enrollments =
        repositories::enrollments::count_for_course(ctx.state.db(), surviving_course.id)
            .await
            .expect("count surviving enrollments");
    assert_eq!(surviving_enrollments, 1);

    let surviving_reviews =
        repositories::reviews::list_for_course(ctx.state.db(), surviving_course.id)
            .await
            .expect("list surviving reviews");
    assert_eq!(surviving_reviews.len(), 1);
}

#[tokio::test]
async fn deleting_student_removes_their_enrollments_and_reviews() {
    let ctx = test_support::setup_test_context().await;

    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "admin@example.com",
        UserRole::Admin,
        "admin-pass",
    )
    .await;
    let instructor = test_support::insert_user(
        ctx.state.db(),
        "Instructor",
        "teach@example.com",
        UserRole::Instructor,
        "teach-pass",
    )
    .await;
    let student = test_support::insert_user(
        ctx.state.db(),
        "Doomed Student",
        "doomed@example.com",
        UserRole::Student,
        "student-pass",
    )
    .await;

    let category = test_support::insert_category(ctx.state.db(), "Data Science").await;
    let course =
        test_support::insert_course(ctx.state.db(), "Kept Course", instructor.id, category.id)
            .await;

    test_support::insert_enrollment(ctx.state.db(), student.id, course.id).await;
    test_support::insert_review(ctx.state.db(), student.id, course.id, 3).await;

    let token = test_support::bearer_token(admin.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/users/{}", student.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete student");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The course the student was active on belongs to someone else and stays.
    let kept = repositories::courses::find_by_id(ctx.state.db(), course.id)
        .await
        .expect("find kept course");
    assert!(kept.is_some());

    let enrollments = repositories::enrollments::count_for_course(ctx.state.db(), course.id)
        .await
        .expect("count enrollments");
    assert_eq!(enrollments, 0);

    let reviews = repositories::reviews::list_for_course(ctx.state.db(), course.id)
        .await
        .expect("list reviews");
    assert!(reviews.is_empty());
}

#[tokio::test]
async fn admin_cannot_delete_own_account() {
    let ctx = test_support::setup_test_context().await;

    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "admin@example.com",
        UserRole::Admin,
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(admin.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/users/{}", admin.id),
            Some(&token),
            None,
        ))
        .await
        .expect("self delete");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let still_there = repositories::users::find_by_id(ctx.state.db(), admin.id)
        .await
        .expect("find admin");
    assert!(still_there.is_some());
}

#[tokio::test]
async fn profile_update_changes_name_email_and_bio() {
    let ctx = test_support::setup_test_context().await;

    let user = test_support::insert_user(
        ctx.state.db(),
        "Old Name",
        "old@example.com",
        UserRole::Student,
        "student-pass",
    )
    .await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/users/me",
            Some(&token),
            Some(json!({
                "name": "New Name",
                "email": "new@example.com",
                "bio": "Learning things"
            })),
        ))
        .await
        .expect("update profile");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["name"], "New Name");
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["bio"], "Learning things");
}

#[tokio::test]
async fn profile_update_rejects_taken_email() {
    let ctx = test_support::setup_test_context().await;

    test_support::insert_user(
        ctx.state.db(),
        "Owner",
        "taken@example.com",
        UserRole::Student,
        "student-pass",
    )
    .await;
    let user = test_support::insert_user(
        ctx.state.db(),
        "Claimer",
        "claimer@example.com",
        UserRole::Student,
        "student-pass",
    )
    .await;
    let token = test_support::bearer_token(user.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/users/me",
            Some(&token),
            Some(json!({ "email": "taken@example.com" })),
        ))
        .await
        .expect("update profile");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
