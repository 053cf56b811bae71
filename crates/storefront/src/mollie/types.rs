//! Payment provider API wire types.

use serde::{Deserialize, Serialize};

use valroux_core::PaymentStatus;

/// A payment as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    pub id: String,
    pub status: PaymentStatus,
    pub amount: PaymentAmount,
    #[serde(default)]
    pub metadata: Option<PaymentMetadata>,
    #[serde(rename = "_links", default)]
    pub links: Option<PaymentLinks>,
}

/// Amount object: decimal string plus ISO currency code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAmount {
    pub currency: String,
    pub value: String,
}

/// Metadata we attach at payment creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMetadata {
    #[serde(default)]
    pub order_number: Option<String>,
}

/// HAL-style `_links` object.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLinks {
    #[serde(default)]
    pub checkout: Option<PaymentLink>,
}

/// A single link.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLink {
    pub href: String,
}
