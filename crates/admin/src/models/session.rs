//! Admin session types.

use serde::{Deserialize, Serialize};

use valroux_core::{AdminRole, AdminUserId, Email};

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub email: Email,
    pub role: AdminRole,
}

/// Session keys.
pub mod session_keys {
    /// Key for storing the logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
