//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for registration, login,
//! logout and the current-user lookup, set or clear the session cookie, and
//! interact with the `auth::service` for core business logic.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::middleware::{build_session_cookie, clear_session_cookie};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::utils::jwt::{Claims, JwtUtils};
use axum::{
    extract::{Extension, Json},
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Json as ResponseJson},
};
use sqlx::SqlitePool;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<JwtUtils>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let max_age = jwt_utils.expires_in_seconds();
    let auth_service = AuthService::new(&pool, jwt_utils);

    match auth_service.register(payload).await {
        Ok(session) => Ok((
            StatusCode::CREATED,
            [(SET_COOKIE, build_session_cookie(&session.token, max_age))],
            ResponseJson(ApiResponse::success(
                session.user,
                "User registered successfully",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<JwtUtils>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let max_age = jwt_utils.expires_in_seconds();
    let auth_service = AuthService::new(&pool, jwt_utils);

    match auth_service.login(payload).await {
        Ok(session) => Ok((
            StatusCode::OK,
            [(SET_COOKIE, build_session_cookie(&session.token, max_age))],
            ResponseJson(ApiResponse::success(session.user, "Login successful")),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request.
///
/// Clears the session cookie; the token itself stays valid until expiry.
#[axum::debug_handler]
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(SET_COOKIE, clear_session_cookie())],
        ResponseJson(ApiResponse::success(
            serde_json::json!({}),
            "Logged out successfully",
        )),
    )
}

/// Get current user information from the session
#[axum::debug_handler]
pub async fn current_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<JwtUtils>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<UserInfo>>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, jwt_utils);

    match auth_service.current_user(claims.user_id()).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "User retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
