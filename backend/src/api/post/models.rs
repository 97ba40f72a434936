//! Request and response models for the post endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Post creation payload.
///
/// `image_url` references an already-stored image; this backend does not
/// handle binary uploads.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    pub image_url: Option<String>,
}

/// Post update payload. A missing `image_url` keeps the current image.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    pub image_url: Option<String>,
}

/// Comment creation payload
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Narrated-audio response
#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub audio_url: String,
}
