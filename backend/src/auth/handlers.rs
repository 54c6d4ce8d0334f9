//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for user registration,
//! login and token refresh, validate request data, and interact with the
//! `auth::service` for core business logic.

use crate::api::common::{service_error_to_http, validation_error_response};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use validator::Validate;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(auth_service): Extension<AuthService>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ResponseJson<TokenPairResponse>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    match auth_service.register(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(auth_service): Extension<AuthService>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<TokenPairResponse>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(auth_service): Extension<AuthService>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<ResponseJson<TokenPairResponse>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    match auth_service.refresh(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
