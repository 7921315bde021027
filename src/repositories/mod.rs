pub(crate) mod categories;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod reviews;
pub(crate) mod stats;
pub(crate) mod users;

use thiserror::Error;

/// Failure taxonomy for repository mutations. Uniqueness and referential
/// violations are detected both by explicit pre-checks and by mapping the
/// database constraint errors, so the invariants hold even when callers skip
/// their own validation.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("email is already registered")]
    DuplicateEmail,
    #[error("category name is already taken")]
    DuplicateCategory,
    #[error("course is already reviewed by this user")]
    DuplicateReview,
    #[error("referenced entity does not exist")]
    DanglingReference,
    #[error("category is referenced by existing courses")]
    CategoryInUse,
    #[error("entity not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23505"),
        _ => false,
    }
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23503"),
        _ => false,
    }
}
