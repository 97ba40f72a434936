//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle user registration, login, logout and the current-user
//! lookup. They are designed to be integrated into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::*;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route(
            "/user",
            get(current_user).layer(middleware::from_fn(session_auth)),
        )
}
