//! Dashboard route handler.

use axum::{Json, extract::State};

use crate::db::DashboardData;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// `GET /api/dashboard`
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<DashboardData>> {
    let data = state.dashboard().load().await?;
    Ok(Json(data))
}
