use axum::{extract::Query, routing::get, routing::patch, Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::pagination::{page_offset, PaginatedResponse};
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::user::{ProfileUpdate, UserResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct UserListQuery {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default)]
    role: Option<UserRole>,
}

fn default_page() -> i64 {
    1
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/me", patch(update_me))
        .route("/", get(list_users))
        .route("/:user_id", get(get_user).delete(delete_user))
}

async fn list_users(
    Query(params): Query<UserListQuery>,
    CurrentAdmin(_admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
) -> Result<Json<PaginatedResponse<UserResponse>>, ApiError> {
    let per_page = state.settings().pagination().users_per_page;
    let offset = page_offset(params.page, per_page);

    let total_count = repositories::users::count(state.db(), params.role)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count users"))?;
    let users = repositories::users::list(state.db(), params.role, offset, per_page)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;

    Ok(Json(PaginatedResponse {
        items: users.into_iter().map(UserResponse::from_db).collect(),
        total_count,
        page: params.page.max(1),
        per_page,
    }))
}

async fn get_user(
    axum::extract::Path(user_id): axum::extract::Path<i32>,
    CurrentAdmin(_admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;

    let Some(user) = user else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    Ok(Json(UserResponse::from_db(user)))
}

async fn delete_user(
    axum::extract::Path(user_id): axum::extract::Path<i32>,
    CurrentAdmin(admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    if admin.id == user_id {
        return Err(ApiError::Forbidden("You cannot delete your own account"));
    }

    let user = repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;

    if user.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    repositories::users::delete_cascading(state.db(), user_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete user"))?;

    tracing::info!(
        admin_id = admin.id,
        user_id = user_id,
        action = "user_delete",
        "Admin deleted user"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn update_me(
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if let Some(email) = payload.email.as_deref() {
        let existing = repositories::users::exists_by_email(state.db(), email)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check existing email"))?;
        if existing.is_some_and(|id| id != user.id) {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }
    }

    repositories::users::update_profile(
        state.db(),
        user.id,
        repositories::users::UpdateProfile {
            name: payload.name,
            email: payload.email,
            bio: payload.bio,
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to update profile"))?;

    let updated = repositories::users::fetch_one_by_id(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated profile"))?;

    Ok(Json(UserResponse::from_db(updated)))
}

#[cfg(test)]
mod tests;
