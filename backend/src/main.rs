//! Main entry point for the authentication backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection, constructs the authentication service and registers all API
//! routes. It orchestrates the application's startup and defines its overall
//! structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod utils;

use crate::api::common::ApiResponse;
use auth::service::AuthService;
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use database::Database;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();

    // Fatal when the signing secrets are missing: the process must not
    // serve traffic it cannot sign for.
    let auth_service = AuthService::from_config(&pool, &config).unwrap();

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/auth", auth::routes::auth_router())
        .layer(Extension(auth_service));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Auth service running on port {}", config.server_port);
    info!(
        "Health check: http://localhost:{}/health",
        config.server_port
    );
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Auth Service Backend",
            "version": "0.1.0"
        }),
        "Welcome to the Auth API",
    ))
}

async fn health_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "status": "ok"
        }),
        "Service is healthy",
    ))
}
