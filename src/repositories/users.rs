use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories::{is_unique_violation, StoreError};

const COLUMNS: &str = "id, name, email, hashed_password, role, bio, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub(crate) name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, StoreError> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (name, email, hashed_password, role, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
    .map_err(|error| {
        if is_unique_violation(&error) {
            StoreError::DuplicateEmail
        } else {
            StoreError::Database(error)
        }
    })
}

pub(crate) struct UpdateProfile {
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) bio: Option<String>,
}

pub(crate) async fn update_profile(
    pool: &PgPool,
    id: i32,
    params: UpdateProfile,
) -> Result<(), StoreError> {
    sqlx::query(
        "UPDATE users SET
            name = COALESCE($1, name),
            email = COALESCE($2, email),
            bio = COALESCE($3, bio)
         WHERE id = $4",
    )
    .bind(params.name)
    .bind(params.email)
    .bind(params.bio)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|error| {
        if is_unique_violation(&error) {
            StoreError::DuplicateEmail
        } else {
            StoreError::Database(error)
        }
    })?;
    Ok(())
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: i32) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn list(
    pool: &PgPool,
    role: Option<UserRole>,
    offset: i64,
    limit: i64,
) -> Result<Vec<User>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM users"));

    if let Some(role) = role {
        builder.push(" WHERE role = ");
        builder.push_bind(role);
    }

    builder.push(" ORDER BY created_at DESC");
    builder.push(" OFFSET ");
    builder.push_bind(offset.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit);

    builder.build_query_as::<User>().fetch_all(pool).await
}

pub(crate) async fn count(pool: &PgPool, role: Option<UserRole>) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");

    if let Some(role) = role {
        builder.push(" WHERE role = ");
        builder.push_bind(role);
    }

    let row = builder.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(row)
}

/// Delete a user and everything they exclusively own: the courses they
/// instruct (with those courses' enrollments and reviews), their own
/// enrollments, and their own reviews. Children are removed before parents
/// inside a single transaction so a partial cascade is never visible.
pub(crate) async fn delete_cascading(pool: &PgPool, user_id: i32) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM reviews
         WHERE course_id IN (SELECT id FROM courses WHERE instructor_id = $1)",
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "DELETE FROM enrollments
         WHERE course_id IN (SELECT id FROM courses WHERE instructor_id = $1)",
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM reviews WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM enrollments WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM courses WHERE instructor_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(StoreError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}
