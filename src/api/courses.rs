use axum::{extract::Query, routing::get, Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentInstructor, OptionalUser};
use crate::api::pagination::{page_offset, PaginatedResponse};
use crate::api::reviews;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::course::{
    CourseCreate, CourseDetailResponse, CourseResponse, CourseUpdate,
};
use crate::schemas::review::ReviewResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct CourseListQuery {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    category: Option<i32>,
}

fn default_page() -> i64 {
    1
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/featured", get(featured_courses))
        .route("/mine", get(my_courses))
        .route(
            "/:course_id",
            get(course_details).patch(update_course).delete(delete_course),
        )
        .route("/:course_id/reviews", axum::routing::post(reviews::create_review))
}

async fn list_courses(
    Query(params): Query<CourseListQuery>,
    state: axum::extract::State<AppState>,
) -> Result<Json<PaginatedResponse<CourseResponse>>, ApiError> {
    let per_page = state.settings().pagination().courses_per_page;
    let offset = page_offset(params.page, per_page);

    let (courses, total_count) = repositories::courses::list_paginated(
        state.db(),
        repositories::courses::ListCourses {
            search: params.search.as_deref(),
            category_id: params.category,
            offset,
            limit: per_page,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(PaginatedResponse {
        items: courses.into_iter().map(CourseResponse::from_db).collect(),
        total_count,
        page: params.page.max(1),
        per_page,
    }))
}

async fn featured_courses(
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let limit = state.settings().pagination().featured_courses_limit;
    let courses = repositories::courses::list_featured(state.db(), limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list featured courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn my_courses(
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_by_instructor(state.db(), instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list instructor courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn course_details(
    axum::extract::Path(course_id): axum::extract::Path<i32>,
    OptionalUser(user): OptionalUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let reviews = repositories::reviews::list_for_course(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list reviews"))?;

    let enrollment_count = repositories::enrollments::count_for_course(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count enrollments"))?;

    let average_rating = repositories::reviews::average_for_course(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to compute average rating"))?;

    let is_enrolled = match user {
        Some(user) => repositories::enrollments::is_enrolled(state.db(), user.id, course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?,
        None => false,
    };

    Ok(Json(CourseDetailResponse {
        course: CourseResponse::from_db(course),
        enrollment_count,
        average_rating,
        is_enrolled,
        reviews: reviews.into_iter().map(ReviewResponse::from_db).collect(),
    }))
}

async fn create_course(
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(axum::http::StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            title: payload.title.trim(),
            description: &payload.description,
            price: payload.price,
            duration: payload.duration.as_deref(),
            level: payload.level,
            instructor_id: instructor.id,
            category_id: payload.category_id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to create course"))?;

    tracing::info!(
        instructor_id = instructor.id,
        course_id = course.id,
        action = "course_create",
        "Instructor created course"
    );

    Ok((axum::http::StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn update_course(
    axum::extract::Path(course_id): axum::extract::Path<i32>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if course.instructor_id != instructor.id {
        return Err(ApiError::Forbidden("You can only edit your own courses"));
    }

    repositories::courses::update(
        state.db(),
        course_id,
        repositories::courses::UpdateCourse {
            title: payload.title,
            description: payload.description,
            price: payload.price,
            duration: payload.duration,
            level: payload.level,
            category_id: payload.category_id,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to update course"))?;

    let updated = repositories::courses::fetch_one_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated course"))?;

    Ok(Json(CourseResponse::from_db(updated)))
}

async fn delete_course(
    axum::extract::Path(course_id): axum::extract::Path<i32>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if course.instructor_id != instructor.id {
        return Err(ApiError::Forbidden("You can only delete your own courses"));
    }

    repositories::courses::delete_cascading(state.db(), course_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete course"))?;

    tracing::info!(
        instructor_id = instructor.id,
        course_id = course_id,
        action = "course_delete",
        "Instructor deleted course"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}
