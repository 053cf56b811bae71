//! Admin auth route handlers.
//!
//! No self-registration: admin accounts are created with the CLI.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use valroux_core::Email;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::{AdminUser, CurrentAdmin};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AdminUser>> {
    let invalid = || AppError::Unauthorized("invalid credentials".to_string());

    let email = Email::parse(&req.email).map_err(|_| invalid())?;
    let row = state
        .admin_users()
        .get_by_email_with_hash(&email)
        .await?
        .ok_or_else(invalid)?;

    let parsed_hash =
        PasswordHash::new(&row.password_hash).map_err(|e| AppError::Internal(e.to_string()))?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid())?;

    state.admin_users().touch_last_login(row.user.id).await?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    set_current_admin(
        &session,
        &CurrentAdmin {
            id: row.user.id,
            email: row.user.email.clone(),
            role: row.user.role,
        },
    )
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(admin_id = row.user.id.as_i32(), "Admin logged in");

    Ok(Json(row.user))
}

/// `POST /api/auth/logout`
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`
pub async fn me(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
) -> Result<Json<AdminUser>> {
    let user = state.admin_users().get_by_id(current.id).await?;
    Ok(Json(user))
}
