//! Customer account model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use valroux_core::{CustomerId, Email};

/// A customer account.
///
/// The password hash lives in the same table but is only surfaced by the
/// repository methods that need it for verification.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub marketing_consent: bool,
    /// Company name for B2B customers.
    pub company_name: Option<String>,
    /// EU VAT number for B2B customers.
    pub vat_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
