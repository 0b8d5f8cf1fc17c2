//! Axum route handlers for the credential endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub username: String,
    pub display_name: String,
    pub email: String,
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "username and password are required".to_string(),
        ));
    }

    auth::register_user(
        &state.db,
        request.username.trim(),
        &request.password,
        &request.display_name,
        &request.email,
    )
    .await?;

    Ok(Json(AuthResponse {
        username: request.username.trim().to_string(),
        display_name: request.display_name,
        email: request.email,
    }))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = auth::authenticate(&state.db, &request.username, &request.password).await?;
    Ok(Json(AuthResponse {
        username: user.username,
        display_name: user.display_name,
        email: user.email,
    }))
}
