use sqlx::PgPool;

use crate::db::models::Review;
use crate::repositories::{is_foreign_key_violation, is_unique_violation, StoreError};

const COLUMNS: &str = "id, user_id, course_id, rating, comment, created_at";

pub(crate) struct CreateReview<'a> {
    pub(crate) user_id: i32,
    pub(crate) course_id: i32,
    pub(crate) rating: i32,
    pub(crate) comment: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateReview<'_>) -> Result<Review, StoreError> {
    sqlx::query_as::<_, Review>(&format!(
        "INSERT INTO reviews (user_id, course_id, rating, comment, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.user_id)
    .bind(params.course_id)
    .bind(params.rating)
    .bind(params.comment)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
    .map_err(|error| {
        if is_unique_violation(&error) {
            StoreError::DuplicateReview
        } else if is_foreign_key_violation(&error) {
            StoreError::DanglingReference
        } else {
            StoreError::Database(error)
        }
    })
}

pub(crate) async fn list_for_course(
    pool: &PgPool,
    course_id: i32,
) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>(&format!(
        "SELECT {COLUMNS} FROM reviews WHERE course_id = $1 ORDER BY created_at DESC",
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Mean rating across a course's reviews; 0.0 when it has none.
pub(crate) async fn average_for_course(pool: &PgPool, course_id: i32) -> Result<f64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COALESCE(AVG(rating)::float8, 0) FROM reviews WHERE course_id = $1",
    )
    .bind(course_id)
    .fetch_one(pool)
    .await
}
