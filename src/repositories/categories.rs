use sqlx::PgPool;

use crate::db::models::Category;
use crate::repositories::{is_foreign_key_violation, is_unique_violation, StoreError};

const COLUMNS: &str = "id, name, description, created_at";

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories ORDER BY name"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateCategory<'a> {
    pub(crate) name: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateCategory<'_>,
) -> Result<Category, StoreError> {
    sqlx::query_as::<_, Category>(&format!(
        "INSERT INTO categories (name, description, created_at)
         VALUES ($1,$2,$3)
         RETURNING {COLUMNS}",
    ))
    .bind(params.name)
    .bind(params.description)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
    .map_err(|error| {
        if is_unique_violation(&error) {
            StoreError::DuplicateCategory
        } else {
            StoreError::Database(error)
        }
    })
}

/// Delete a category. Fails with `CategoryInUse` while any course references
/// it; the in-use check and the delete run in one transaction, with the FK
/// constraint as the second line of defense.
pub(crate) async fn delete(pool: &PgPool, category_id: i32) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    let referencing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&mut *tx)
            .await?;

    if referencing > 0 {
        tx.rollback().await?;
        return Err(StoreError::CategoryInUse);
    }

    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(category_id)
        .execute(&mut *tx)
        .await
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                StoreError::CategoryInUse
            } else {
                StoreError::Database(error)
            }
        })?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(StoreError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}
