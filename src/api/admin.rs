use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::repositories;

#[derive(Debug, Serialize)]
pub(crate) struct StatsResponse {
    pub(crate) total_users: i64,
    pub(crate) total_courses: i64,
    pub(crate) total_enrollments: i64,
    pub(crate) total_categories: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

async fn stats(
    CurrentAdmin(_admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let totals = repositories::stats::platform_totals(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to compute platform stats"))?;

    Ok(Json(StatsResponse {
        total_users: totals.total_users,
        total_courses: totals.total_courses,
        total_enrollments: totals.total_enrollments,
        total_categories: totals.total_categories,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::test_support;

    #[tokio::test]
    async fn stats_counts_current_state() {
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
            "Student",
            "student@example.com",
            UserRole::Student,
            "student-pass",
        )
        .await;

        let category = test_support::insert_category(ctx.state.db(), "Web Development").await;
        let course =
            test_support::insert_course(ctx.state.db(), "Rust 101", instructor.id, category.id)
                .await;
        test_support::insert_enrollment(ctx.state.db(), student.id, course.id).await;

        let token = test_support::bearer_token(admin.id, ctx.state.settings());
        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/admin/stats",
                Some(&token),
                None,
            ))
            .await
            .expect("stats");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["total_users"], 3);
        assert_eq!(body["total_courses"], 1);
        assert_eq!(body["total_enrollments"], 1);
        assert_eq!(body["total_categories"], 1);
    }

    #[tokio::test]
    async fn stats_requires_admin_role() {
        let ctx = test_support::setup_test_context().await;

        let instructor = test_support::insert_user(
            ctx.state.db(),
            "Instructor",
            "teach@example.com",
            UserRole::Instructor,
            "teach-pass",
        )
        .await;
        let token = test_support::bearer_token(instructor.id, ctx.state.settings());

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/admin/stats",
                Some(&token),
                None,
            ))
            .await
            .expect("stats as instructor");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
