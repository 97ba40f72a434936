//! Handler functions for post-related API endpoints.
//!
//! These functions process requests for post CRUD, likes, comments and audio
//! narration, and interact with the `services` layer for business logic.

use crate::api::common::{ApiResponse, service_error_to_http, validation_error_response};
use crate::api::post::models::*;
use crate::database::models::{Comment, CommentWithAuthor, Post, PostDetail, PostWithAuthor};
use crate::services::narration_service::NarrationService;
use crate::services::post_service::PostService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

/// Create a new post authored by the current user.
#[axum::debug_handler]
pub async fn create_post(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Post>>), (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let post_service = PostService::new(&pool);
    match post_service.create_post(claims.user_id(), payload).await {
        Ok(post) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(post, "Post created successfully")),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// List all posts, newest first.
#[axum::debug_handler]
pub async fn get_posts(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<Vec<PostWithAuthor>>>, (StatusCode, String)> {
    let post_service = PostService::new(&pool);
    match post_service.get_feed().await {
        Ok(posts) => Ok(ResponseJson(ApiResponse::ok(posts))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieve a single post, personalized for a logged-in viewer.
#[axum::debug_handler]
pub async fn get_post(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Option<Claims>>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PostDetail>>, (StatusCode, String)> {
    let viewer_id = claims.as_ref().map(|c| c.user_id().to_string());

    let post_service = PostService::new(&pool);
    match post_service
        .get_post_detail(&id, viewer_id.as_deref())
        .await
    {
        Ok(post) => Ok(ResponseJson(ApiResponse::ok(post))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Update a post. Authorship is enforced by the ownership guard.
#[axum::debug_handler]
pub async fn update_post(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<ResponseJson<ApiResponse<Post>>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let post_service = PostService::new(&pool);
    match post_service.update_post(&id, payload).await {
        Ok(post) => Ok(ResponseJson(ApiResponse::success(
            post,
            "Post updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Delete a post. Authorship is enforced by the ownership guard.
#[axum::debug_handler]
pub async fn delete_post(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    let post_service = PostService::new(&pool);
    match post_service.delete_post(&id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            serde_json::json!({}),
            "Post deleted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Like a post as the current user.
#[axum::debug_handler]
pub async fn like_post(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    let post_service = PostService::new(&pool);
    match post_service.like_post(&id, claims.user_id()).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            serde_json::json!({}),
            "Post liked successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Remove the current user's like from a post.
#[axum::debug_handler]
pub async fn unlike_post(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    let post_service = PostService::new(&pool);
    match post_service.unlike_post(&id, claims.user_id()).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            serde_json::json!({}),
            "Post unliked successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Add a comment to a post as the current user.
#[axum::debug_handler]
pub async fn add_comment(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Comment>>), (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let post_service = PostService::new(&pool);
    match post_service
        .add_comment(&id, claims.user_id(), payload)
        .await
    {
        Ok(comment) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(comment, "Comment added successfully")),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// List a post's comments, newest first.
#[axum::debug_handler]
pub async fn get_comments(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<CommentWithAuthor>>>, (StatusCode, String)> {
    let post_service = PostService::new(&pool);
    match post_service.get_comments(&id).await {
        Ok(comments) => Ok(ResponseJson(ApiResponse::ok(comments))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Synthesize narrated audio for a post's content.
#[axum::debug_handler]
pub async fn get_audio(
    Extension(pool): Extension<SqlitePool>,
    Extension(narrator): Extension<NarrationService>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<AudioResponse>>, (StatusCode, String)> {
    let post_service = PostService::new(&pool);
    let post = match post_service.get_post_required(&id).await {
        Ok(post) => post,
        Err(error) => return Err(service_error_to_http(error)),
    };

    match narrator.narrate(&post.id, &post.content).await {
        Ok(audio_url) => Ok(ResponseJson(ApiResponse::success(
            AudioResponse { audio_url },
            "Audio generated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
