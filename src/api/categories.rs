use axum::{routing::get, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::category::{CategoryCreate, CategoryResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:category_id", axum::routing::delete(delete_category))
}

async fn list_categories(
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = repositories::categories::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list categories"))?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from_db).collect()))
}

async fn create_category(
    CurrentAdmin(admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(axum::http::StatusCode, Json<CategoryResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let category = repositories::categories::create(
        state.db(),
        repositories::categories::CreateCategory {
            name: payload.name.trim(),
            description: payload.description.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to create category"))?;

    tracing::info!(
        admin_id = admin.id,
        category_id = category.id,
        action = "category_create",
        "Admin added category"
    );

    Ok((axum::http::StatusCode::CREATED, Json(CategoryResponse::from_db(category))))
}

async fn delete_category(
    axum::extract::Path(category_id): axum::extract::Path<i32>,
    CurrentAdmin(admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let category = repositories::categories::find_by_id(state.db(), category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch category"))?;

    if category.is_none() {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    repositories::categories::delete(state.db(), category_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete category"))?;

    tracing::info!(
        admin_id = admin.id,
        category_id = category_id,
        action = "category_delete",
        "Admin deleted category"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}
