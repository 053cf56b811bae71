//! Admin user queries.

use sqlx::PgPool;

use valroux_core::{AdminUserId, Email};

use super::RepositoryError;
use crate::models::AdminUser;

/// An admin row together with its password hash, for login verification.
#[derive(Debug, sqlx::FromRow)]
pub struct AdminUserWithHash {
    #[sqlx(flatten)]
    pub user: AdminUser,
    pub password_hash: String,
}

/// Repository for back-office users.
#[derive(Debug, Clone)]
pub struct AdminUserRepository {
    pool: PgPool,
}

impl AdminUserRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up an admin by email, including the password hash.
    pub async fn get_by_email_with_hash(
        &self,
        email: &Email,
    ) -> Result<Option<AdminUserWithHash>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserWithHash>(
            r"
            SELECT id, email, name, role, created_at, last_login_at, password_hash
            FROM admin.admin_users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Fetch an admin by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such admin exists.
    pub async fn get_by_id(&self, id: AdminUserId) -> Result<AdminUser, RepositoryError> {
        sqlx::query_as::<_, AdminUser>(
            r"
            SELECT id, email, name, role, created_at, last_login_at
            FROM admin.admin_users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, id: AdminUserId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE admin.admin_users SET last_login_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
