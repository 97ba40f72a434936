//! Data structures for authentication-related entities.
//!
//! This module defines request and response models for registration, login
//! and the current-user endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User information returned by register, login and current-user
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

/// An established session: the user to return in the body and the token that
/// goes into the session cookie.
#[derive(Debug)]
pub struct AuthenticatedSession {
    pub user: UserInfo,
    pub token: String,
}
