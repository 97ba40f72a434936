//! Main entry point for the Blogcast backend.
//!
//! This file initializes the Axum web server, sets up database connections,
//! and registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    response::Json,
    routing::get,
};
use config::Config;
use database::Database;
use services::narration_service::NarrationService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::fmt::init;
use utils::jwt::JwtUtils;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    db.run_migrations().await.unwrap();
    let pool = db.pool().clone();

    let jwt_utils = JwtUtils::new(&config);
    let narrator = NarrationService::new(&config);

    // The frontend runs on another origin and sends the session cookie.
    let cors = CorsLayer::new()
        .allow_origin(config.cors_allowed_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::routes::auth_router())
        .nest("/api/posts", api::post::routes::post_router())
        .layer(Extension(pool))
        .layer(Extension(jwt_utils))
        .layer(Extension(narrator))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting Blogcast server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Blogcast Backend",
            "version": "0.1.0"
        }),
        "Welcome to Blogcast API",
    ))
}
