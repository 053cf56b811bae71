//! Admin user model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use valroux_core::{AdminRole, AdminUserId, Email};

/// A back-office user.
///
/// The password hash stays in the repository layer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}
