//! Customer account queries.

use chrono::NaiveDate;
use sqlx::PgPool;

use valroux_core::{CustomerId, Email};

use super::RepositoryError;
use crate::models::Customer;

/// A customer row together with its password hash, for login verification.
#[derive(Debug, sqlx::FromRow)]
pub struct CustomerWithHash {
    #[sqlx(flatten)]
    pub customer: Customer,
    pub password_hash: String,
}

/// Fields needed to create a customer account.
#[derive(Debug)]
pub struct NewCustomer<'a> {
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub birth_date: NaiveDate,
    pub marketing_consent: bool,
    pub company_name: Option<&'a str>,
    pub vat_number: Option<&'a str>,
}

/// Repository for customer accounts.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create(&self, new: NewCustomer<'_>) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            INSERT INTO shop.customers
                (email, password_hash, first_name, last_name, birth_date,
                 marketing_consent, company_name, vat_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, email, first_name, last_name, birth_date,
                      marketing_consent, company_name, vat_number,
                      created_at, updated_at
            ",
        )
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.birth_date)
        .bind(new.marketing_consent)
        .bind(new.company_name)
        .bind(new.vat_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict("email already registered".to_string())
            }
            other => RepositoryError::Database(other),
        })?;

        Ok(customer)
    }

    /// Look up a customer by email, including the password hash.
    ///
    /// Returns `Ok(None)` for an unknown email so that login can fail with
    /// the same error as a wrong password.
    pub async fn get_by_email_with_hash(
        &self,
        email: &Email,
    ) -> Result<Option<CustomerWithHash>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerWithHash>(
            r"
            SELECT id, email, first_name, last_name, birth_date,
                   marketing_consent, company_name, vat_number,
                   created_at, updated_at, password_hash
            FROM shop.customers
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Fetch a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such customer exists.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            SELECT id, email, first_name, last_name, birth_date,
                   marketing_consent, company_name, vat_number,
                   created_at, updated_at
            FROM shop.customers
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(customer)
    }
}
