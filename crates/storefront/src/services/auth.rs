//! Customer authentication.
//!
//! Passwords are hashed with argon2id using per-password salts. Login fails
//! with the same error for unknown email and wrong password.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::NaiveDate;
use sqlx::PgPool;
use thiserror::Error;

use valroux_core::{Email, EmailError};

use crate::db::customers::{CustomerRepository, NewCustomer};
use crate::db::RepositoryError;
use crate::models::Customer;

/// Minimum password length for registration.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account already exists for this email.
    #[error("email already registered")]
    EmailTaken,

    /// Password does not meet the minimum requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Database error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Hashing or hash parsing failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),
}

/// Registration input, validated by the route before it gets here.
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub marketing_consent: bool,
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
}

/// Customer registration and login.
#[derive(Debug, Clone)]
pub struct AuthService {
    customers: CustomerRepository,
}

impl AuthService {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
        }
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// - `AuthError::WeakPassword` if the password is shorter than 8 chars
    /// - `AuthError::InvalidEmail` if the email does not parse
    /// - `AuthError::EmailTaken` if an account already exists
    pub async fn register(&self, input: RegisterInput) -> Result<Customer, AuthError> {
        if input.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let email = Email::parse(&input.email)?;
        let password_hash = hash_password(&input.password)?;

        let customer = self
            .customers
            .create(NewCustomer {
                email: &email,
                password_hash: &password_hash,
                first_name: &input.first_name,
                last_name: &input.last_name,
                birth_date: input.birth_date,
                marketing_consent: input.marketing_consent,
                company_name: input.company_name.as_deref(),
                vat_number: input.vat_number.as_deref(),
            })
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(customer)
    }

    /// Verify a customer's credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for unknown email and wrong
    /// password alike.
    pub async fn login(&self, email: &str, password: &str) -> Result<Customer, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(row) = self.customers.get_by_email_with_hash(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&row.password_hash)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(row.customer)
    }

    /// Fetch a customer by id, for the `me` endpoint.
    pub async fn get_customer(
        &self,
        id: valroux_core::CustomerId,
    ) -> Result<Customer, AuthError> {
        Ok(self.customers.get_by_id(id).await?)
    }
}

/// Hash a password with argon2id and a fresh salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse battery", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong password", &parsed)
                .is_err()
        );
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }
}
