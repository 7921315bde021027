use sqlx::PgPool;

use crate::db::models::Enrollment;
use crate::repositories::{is_foreign_key_violation, StoreError};

const COLUMNS: &str = "id, user_id, course_id, enrolled_at, progress, completed";

/// Outcome of an enroll attempt. A repeat enrollment is an observable no-op,
/// reported distinctly from a first-time success; both carry the live row.
pub(crate) enum EnrollOutcome {
    Enrolled(Enrollment),
    AlreadyEnrolled(Enrollment),
}

pub(crate) async fn enroll(
    pool: &PgPool,
    user_id: i32,
    course_id: i32,
    enrolled_at: time::PrimitiveDateTime,
) -> Result<EnrollOutcome, StoreError> {
    let inserted = sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (user_id, course_id, enrolled_at)
         VALUES ($1,$2,$3)
         ON CONFLICT (user_id, course_id) DO NOTHING
         RETURNING {COLUMNS}",
    ))
    .bind(user_id)
    .bind(course_id)
    .bind(enrolled_at)
    .fetch_optional(pool)
    .await
    .map_err(|error| {
        if is_foreign_key_violation(&error) {
            StoreError::DanglingReference
        } else {
            StoreError::Database(error)
        }
    })?;

    if let Some(enrollment) = inserted {
        return Ok(EnrollOutcome::Enrolled(enrollment));
    }

    let existing = find_for_user_course(pool, user_id, course_id)
        .await?
        .ok_or(StoreError::NotFound)?;
    Ok(EnrollOutcome::AlreadyEnrolled(existing))
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    enrollment_id: i32,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1"))
        .bind(enrollment_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_for_user_course(
    pool: &PgPool,
    user_id: i32,
    course_id: i32,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2",
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn is_enrolled(
    pool: &PgPool,
    user_id: i32,
    course_id: i32,
) -> Result<bool, sqlx::Error> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT id FROM enrollments WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EnrollmentView {
    pub(crate) id: i32,
    pub(crate) course_id: i32,
    pub(crate) course_title: String,
    pub(crate) enrolled_at: time::PrimitiveDateTime,
    pub(crate) progress: i32,
    pub(crate) completed: bool,
}

pub(crate) async fn list_for_user(
    pool: &PgPool,
    user_id: i32,
) -> Result<Vec<EnrollmentView>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentView>(
        "SELECT e.id, e.course_id, c.title AS course_title,
                e.enrolled_at, e.progress, e.completed
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         WHERE e.user_id = $1
         ORDER BY e.enrolled_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, enrollment_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
        .bind(enrollment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn count_for_course(pool: &PgPool, course_id: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
        .bind(course_id)
        .fetch_one(pool)
        .await
}
