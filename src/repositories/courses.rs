use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::Course;
use crate::db::types::CourseLevel;
use crate::repositories::{is_foreign_key_violation, StoreError};

const COLUMNS: &str = "id, title, description, price, duration, level, \
     instructor_id, category_id, created_at, updated_at";

pub(crate) struct CreateCourse<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) price: f64,
    pub(crate) duration: Option<&'a str>,
    pub(crate) level: Option<CourseLevel>,
    pub(crate) instructor_id: i32,
    pub(crate) category_id: i32,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, StoreError> {
    let instructor: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
        .bind(params.instructor_id)
        .fetch_optional(pool)
        .await?;
    let category: Option<i32> = sqlx::query_scalar("SELECT id FROM categories WHERE id = $1")
        .bind(params.category_id)
        .fetch_optional(pool)
        .await?;

    if instructor.is_none() || category.is_none() {
        return Err(StoreError::DanglingReference);
    }

    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            title, description, price, duration, level,
            instructor_id, category_id, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
         RETURNING {COLUMNS}",
    ))
    .bind(params.title)
    .bind(params.description)
    .bind(params.price)
    .bind(params.duration)
    .bind(params.level)
    .bind(params.instructor_id)
    .bind(params.category_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
    .map_err(|error| {
        if is_foreign_key_violation(&error) {
            StoreError::DanglingReference
        } else {
            StoreError::Database(error)
        }
    })
}

pub(crate) async fn find_by_id(pool: &PgPool, course_id: i32) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, course_id: i32) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_one(pool)
        .await
}

pub(crate) struct UpdateCourse {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) price: Option<f64>,
    pub(crate) duration: Option<String>,
    pub(crate) level: Option<CourseLevel>,
    pub(crate) category_id: Option<i32>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    course_id: i32,
    params: UpdateCourse,
) -> Result<(), StoreError> {
    if let Some(category_id) = params.category_id {
        let category: Option<i32> = sqlx::query_scalar("SELECT id FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(pool)
            .await?;
        if category.is_none() {
            return Err(StoreError::DanglingReference);
        }
    }

    sqlx::query(
        "UPDATE courses SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            duration = COALESCE($4, duration),
            level = COALESCE($5, level),
            category_id = COALESCE($6, category_id),
            updated_at = $7
         WHERE id = $8",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.price)
    .bind(params.duration)
    .bind(params.level)
    .bind(params.category_id)
    .bind(params.updated_at)
    .bind(course_id)
    .execute(pool)
    .await
    .map_err(|error| {
        if is_foreign_key_violation(&error) {
            StoreError::DanglingReference
        } else {
            StoreError::Database(error)
        }
    })?;
    Ok(())
}

/// Delete a course together with its enrollments and reviews, children
/// first, in one transaction.
pub(crate) async fn delete_cascading(pool: &PgPool, course_id: i32) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM enrollments WHERE course_id = $1")
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM reviews WHERE course_id = $1")
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(StoreError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}

pub(crate) struct ListCourses<'a> {
    pub(crate) search: Option<&'a str>,
    pub(crate) category_id: Option<i32>,
    pub(crate) offset: i64,
    pub(crate) limit: i64,
}

pub(crate) async fn list_paginated(
    pool: &PgPool,
    params: ListCourses<'_>,
) -> Result<(Vec<Course>, i64), sqlx::Error> {
    let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM courses");
    push_filters(&mut count_builder, params.search, params.category_id);
    let total_count: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM courses"));
    push_filters(&mut builder, params.search, params.category_id);
    builder.push(" ORDER BY created_at DESC");
    builder.push(" OFFSET ");
    builder.push_bind(params.offset.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(params.limit);

    let items = builder.build_query_as::<Course>().fetch_all(pool).await?;
    Ok((items, total_count))
}

fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    search: Option<&str>,
    category_id: Option<i32>,
) {
    let mut has_where = false;

    if let Some(term) = search.filter(|term| !term.is_empty()) {
        builder.push(" WHERE (title ILIKE ");
        builder.push_bind(format!("%{term}%"));
        builder.push(" OR description ILIKE ");
        builder.push_bind(format!("%{term}%"));
        builder.push(")");
        has_where = true;
    }

    if let Some(category_id) = category_id {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("category_id = ");
        builder.push_bind(category_id);
    }
}

pub(crate) async fn list_featured(pool: &PgPool, limit: i64) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses ORDER BY created_at DESC LIMIT $1",
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_instructor(
    pool: &PgPool,
    instructor_id: i32,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses WHERE instructor_id = $1 ORDER BY created_at DESC",
    ))
    .bind(instructor_id)
    .fetch_all(pool)
    .await
}
