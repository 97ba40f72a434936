//! Middleware for protecting authenticated routes and handling authorization.
//!
//! This module contains logic for validating the session token carried by the
//! request's cookie and for enforcing post ownership before mutations.

use crate::api::common::ApiResponse;
use crate::repositories::post_repository::PostRepository;
use crate::utils::jwt::{Claims, JwtUtils};
use axum::{
    extract::{Extension, Path, Request},
    http::{HeaderMap, StatusCode, header::COOKIE},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// Name of the session cookie set on register/login.
pub const SESSION_COOKIE: &str = "token";

/// Session authentication middleware.
///
/// Rejects requests without a valid session token; on success the decoded
/// [`Claims`] are attached to request extensions for downstream handlers.
pub async fn session_auth(
    Extension(jwt_utils): Extension<JwtUtils>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = extract_session_token(request.headers()).ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            "Authentication required",
            "authentication_required",
        )
    })?;

    match jwt_utils.validate_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(_) => Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid token",
            "invalid_token",
        )),
    }
}

/// Optional session authentication middleware (doesn't fail if no token).
///
/// Attaches `Option<Claims>` so read endpoints can personalize their
/// response for a logged-in viewer.
pub async fn optional_session_auth(
    Extension(jwt_utils): Extension<JwtUtils>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let claims: Option<Claims> = extract_session_token(request.headers())
        .and_then(|token| jwt_utils.validate_token(&token).ok());

    // Always insert the Option<Claims>, even if it's None
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Post ownership guard.
///
/// Must run after `session_auth`; compares the post's author against the
/// authenticated user and rejects mutations by anyone else.
pub async fn require_post_author(
    Extension(pool): Extension<SqlitePool>,
    Path(post_id): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let claims = request.extensions().get::<Claims>().ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            "Authentication required",
            "authentication_required",
        )
    })?;

    let post_repo = PostRepository::new(&pool);
    let author_id = post_repo.get_post_author(&post_id).await.map_err(|e| {
        tracing::error!("Failed to look up author of post {}: {}", post_id, e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "database_error",
        )
    })?;

    authorize_author(author_id.as_deref(), claims.user_id())?;
    Ok(next.run(request).await)
}

/// The ownership decision itself: missing post is a 404, someone else's
/// post is a 403.
fn authorize_author(
    author_id: Option<&str>,
    user_id: &str,
) -> Result<(), (StatusCode, String)> {
    match author_id {
        None => Err(error_response(
            StatusCode::NOT_FOUND,
            "Post not found",
            "not_found",
        )),
        Some(author_id) if author_id != user_id => Err(error_response(
            StatusCode::FORBIDDEN,
            "Not authorized",
            "permission_denied",
        )),
        Some(_) => Ok(()),
    }
}

/// Pull the session token out of the request's Cookie header.
fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(COOKIE)?.to_str().ok()?;

    for cookie_str in cookie_header.split(';') {
        if let Ok(parsed) = cookie::Cookie::parse(cookie_str.trim()) {
            if parsed.name() == SESSION_COOKIE {
                return Some(parsed.value().to_string());
            }
        }
    }

    None
}

/// Build the session cookie string set on register/login.
pub fn build_session_cookie(token: &str, max_age_seconds: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    )
}

/// Build the expired cookie string that clears the session on logout.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)
}

fn error_response(status: StatusCode, message: &str, error_type: &str) -> (StatusCode, String) {
    let body = ApiResponse::<()>::error(message.to_string(), error_type, None);
    (status, serde_json::to_string(&body).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_session_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def.ghi; lang=en"),
        );

        assert_eq!(
            extract_session_token(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_session_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn test_authorize_author() {
        assert!(authorize_author(Some("user-a"), "user-a").is_ok());

        let (status, _) = authorize_author(Some("user-a"), "user-b").unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = authorize_author(None, "user-a").unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = build_session_cookie("abc.def.ghi", 86400);
        assert_eq!(cookie, "token=abc.def.ghi; Path=/; HttpOnly; Max-Age=86400");

        let cleared = clear_session_cookie();
        assert_eq!(cleared, "token=; Path=/; HttpOnly; Max-Age=0");
    }
}
