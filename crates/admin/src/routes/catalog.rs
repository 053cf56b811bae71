//! Ad-catalog sync route handler.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::middleware::RequireWriter;
use crate::services::SyncReport;
use crate::state::AppState;

/// `POST /api/catalog/sync`
pub async fn sync(
    State(state): State<AppState>,
    RequireWriter(_admin): RequireWriter,
) -> Result<Json<SyncReport>> {
    let report = state.catalog().sync().await?;
    Ok(Json(report))
}
