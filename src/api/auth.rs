use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::auth::TokenResponse;
use crate::schemas::user::{UserCreate, UserLogin, UserResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // Admin accounts only exist through seeding.
    if payload.role == UserRole::Admin {
        return Err(ApiError::Forbidden("Admin accounts cannot be self-registered"));
    }

    let existing = repositories::users::exists_by_email(state.db(), &payload.email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            name: &payload.name,
            email: &payload.email,
            hashed_password,
            role: payload.role,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_store(e, "Failed to create user"))?;

    let token = security::create_access_token(&user.id.to_string(), state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    let response = TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserResponse::from_db(user),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = fetch_user_by_email(&state, &payload.email).await?;

    if !security::verify_password(&payload.password, &user.hashed_password) {
        return Err(ApiError::Unauthorized("Incorrect email or password"));
    }

    let token = security::create_access_token(&user.id.to_string(), state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserResponse::from_db(user),
    }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}

async fn fetch_user_by_email(state: &AppState, email: &str) -> Result<User, ApiError> {
    repositories::users::find_by_email(state.db(), email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthorized("Incorrect email or password"))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::repositories;
    use crate::test_support;

    #[tokio::test]
    async fn signup_then_login_returns_token() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({
                    "name": "Sam Student",
                    "email": "sam@example.com",
                    "password": "student-pass",
                    "role": "student"
                })),
            ))
            .await
            .expect("signup");

        let status = response.status();
        let created = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {created}");
        assert_eq!(created["user"]["email"], "sam@example.com");
        assert_eq!(created["user"]["role"], "student");
        assert!(created["access_token"].as_str().is_some());
        assert!(created["user"].get("hashed_password").is_none());

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({
                    "email": "sam@example.com",
                    "password": "student-pass"
                })),
            ))
            .await
            .expect("login");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["user"]["name"], "Sam Student");
    }

    #[tokio::test]
    async fn duplicate_email_signup_leaves_store_unchanged() {
        let ctx = test_support::setup_test_context().await;

        test_support::insert_user(
            ctx.state.db(),
            "First User",
            "taken@example.com",
            UserRole::Student,
            "first-pass",
        )
        .await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({
                    "name": "Second User",
                    "email": "taken@example.com",
                    "password": "second-pass",
                    "role": "instructor"
                })),
            ))
            .await
            .expect("signup duplicate");

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let total = repositories::users::count(ctx.state.db(), None).await.expect("count");
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let ctx = test_support::setup_test_context().await;

        test_support::insert_user(
            ctx.state.db(),
            "Sam Student",
            "sam@example.com",
            UserRole::Student,
            "student-pass",
        )
        .await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({
                    "email": "sam@example.com",
                    "password": "wrong-pass"
                })),
            ))
            .await
            .expect("login");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_signup_is_rejected() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({
                    "name": "Sneaky Admin",
                    "email": "sneaky@example.com",
                    "password": "admin-pass",
                    "role": "admin"
                })),
            ))
            .await
            .expect("signup admin");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
