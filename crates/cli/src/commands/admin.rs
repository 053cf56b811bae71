//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! vx-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string for the admin
//!   database (falls back to `DATABASE_URL`)

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use rand::Rng;
use sqlx::PgPool;
use thiserror::Error;

use valroux_core::AdminRole;

const GENERATED_PASSWORD_LENGTH: usize = 24;

/// Alphabet for generated passwords. Alphanumeric minus look-alikes.
const PASSWORD_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin, viewer")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// User already exists.
    #[error("Admin user already exists with email: {0}")]
    UserExists(String),

    /// Password hashing failed.
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

/// Create a new admin user with a generated password.
///
/// The password is printed exactly once; only its argon2 hash is stored.
///
/// # Returns
///
/// The ID of the created admin user.
pub async fn create_user(email: &str, name: &str, role: &str) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    // Parse and validate role
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;

    // Basic email validation
    if !email.contains('@') || !email.contains('.') {
        return Err(AdminError::InvalidEmail(email.to_owned()));
    }

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to admin database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin user: {} ({})", email, role);

    // Check if user already exists
    let existing = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM admin.admin_users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&pool)
    .await?;

    if existing.is_some() {
        return Err(AdminError::UserExists(email.to_owned()));
    }

    let password = generate_password();
    let password_hash = hash_password(&password)?;

    // Create the user
    let user_id = sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO admin.admin_users (email, name, role, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        ",
    )
    .bind(email)
    .bind(name)
    .bind(role)
    .bind(&password_hash)
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        user_id,
        email,
        role
    );

    // The one place the password is ever shown
    #[allow(clippy::print_stdout)]
    {
        println!("Generated password (shown once, store it now):");
        println!("  {password}");
    }

    Ok(user_id)
}

#[allow(clippy::indexing_slicing)] // index bounded by the alphabet length
fn generate_password() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..PASSWORD_ALPHABET.len());
            char::from(PASSWORD_ALPHABET[idx])
        })
        .collect()
}

fn hash_password(password: &str) -> Result<String, AdminError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AdminError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use argon2::{PasswordHash, PasswordVerifier};

    use super::*;

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(
            password
                .bytes()
                .all(|b| PASSWORD_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn test_generated_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }

    #[test]
    fn test_generated_password_verifies() {
        let password = generate_password();
        let hash = hash_password(&password).unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        );
    }
}
