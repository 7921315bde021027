use axum::Json;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::review::{ReviewCreate, ReviewResponse};

// Review creation is intentionally not gated on enrollment; any student may
// rate a course once.
pub(crate) async fn create_review(
    axum::extract::Path(course_id): axum::extract::Path<i32>,
    CurrentStudent(student): CurrentStudent,
    state: axum::extract::State<AppState>,
    Json(payload): Json<ReviewCreate>,
) -> Result<(axum::http::StatusCode, Json<ReviewResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;

    if course.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let review = repositories::reviews::create(
        state.db(),
        repositories::reviews::CreateReview {
            user_id: student.id,
            course_id,
            rating: payload.rating,
            comment: payload.comment.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to create review"))?;

    Ok((axum::http::StatusCode::CREATED, Json(ReviewResponse::from_db(review))))
}
