//! Defines the HTTP routes for posts, likes, comments and narration.
//!
//! Reads are public; mutations require a session, and post update/delete
//! additionally require authorship.

use super::handlers::*;
use crate::auth::middleware::{optional_session_auth, require_post_author, session_auth};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

/// Creates the post router with all post-related routes
pub fn post_router() -> Router {
    // Public reads. The single-post view runs the optional session check so
    // `user_liked` reflects a logged-in viewer.
    let public = Router::new()
        .route("/", get(get_posts))
        .route(
            "/{id}",
            get(get_post).layer(middleware::from_fn(optional_session_auth)),
        )
        .route("/{id}/comments", get(get_comments))
        .route("/{id}/audio", get(get_audio));

    let session_required = Router::new()
        .route("/", post(create_post))
        .route("/{id}/like", post(like_post).delete(unlike_post))
        .route("/{id}/comments", post(add_comment))
        .layer(middleware::from_fn(session_auth));

    // Layers added last run first: session_auth must populate the claims
    // before the ownership guard reads them.
    let author_only = Router::new()
        .route("/{id}", put(update_post).delete(delete_post))
        .layer(middleware::from_fn(require_post_author))
        .layer(middleware::from_fn(session_auth));

    public.merge(session_required).merge(author_only)
}
