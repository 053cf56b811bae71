//! Shared type definitions.

pub mod country;
pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use country::{CountryCode, CountryError, ShippingZone, validate_postal_code};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Cents, MoneyError, OrderTotals, subtotal_cents};
pub use status::{AdminRole, OrderStatus, PaymentStatus, WineType};
