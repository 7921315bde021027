use axum::{routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::repositories::enrollments::EnrollOutcome;
use crate::schemas::enrollment::{
    EnrollRequest, EnrollResponse, EnrollmentListItem, EnrollmentResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_enrollments).post(enroll))
        .route("/:enrollment_id", axum::routing::delete(unenroll))
}

async fn list_my_enrollments(
    CurrentStudent(student): CurrentStudent,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<EnrollmentListItem>>, ApiError> {
    let enrollments = repositories::enrollments::list_for_user(state.db(), student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;

    Ok(Json(enrollments.into_iter().map(EnrollmentListItem::from_view).collect()))
}

async fn enroll(
    CurrentStudent(student): CurrentStudent,
    state: axum::extract::State<AppState>,
    Json(payload): Json<EnrollRequest>,
) -> Result<(axum::http::StatusCode, Json<EnrollResponse>), ApiError> {
    let course = repositories::courses::find_by_id(state.db(), payload.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    if course.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let outcome = repositories::enrollments::enroll(
        state.db(),
        student.id,
        payload.course_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to enroll"))?;

    let (status, response) = match outcome {
        EnrollOutcome::Enrolled(enrollment) => {
            tracing::info!(
                student_id = student.id,
                course_id = payload.course_id,
                action = "enroll",
                "Student enrolled in course"
            );
            (
                axum::http::StatusCode::CREATED,
                EnrollResponse {
                    already_enrolled: false,
                    enrollment: EnrollmentResponse::from_db(enrollment),
                },
            )
        }
        EnrollOutcome::AlreadyEnrolled(enrollment) => (
            axum::http::StatusCode::OK,
            EnrollResponse {
                already_enrolled: true,
                enrollment: EnrollmentResponse::from_db(enrollment),
            },
        ),
    };

    Ok((status, Json(response)))
}

async fn unenroll(
    axum::extract::Path(enrollment_id): axum::extract::Path<i32>,
    CurrentStudent(student): CurrentStudent,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let enrollment = repositories::enrollments::find_by_id(state.db(), enrollment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch enrollment"))?
        .ok_or_else(|| ApiError::NotFound("Enrollment not found".to_string()))?;

    if enrollment.user_id != student.id {
        return Err(ApiError::Forbidden("You can only remove your own enrollments"));
    }

    let deleted = repositories::enrollments::delete(state.db(), enrollment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete enrollment"))?;

    if !deleted {
        return Err(ApiError::NotFound("Enrollment not found".to_string()));
    }

    tracing::info!(
        student_id = student.id,
        enrollment_id = enrollment_id,
        action = "unenroll",
        "Student unenrolled from course"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}
