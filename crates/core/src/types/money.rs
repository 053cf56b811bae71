//! Minor-unit money and order-total arithmetic.
//!
//! Catalog prices are stored as decimal euros (`NUMERIC(10,2)`), but every
//! order computation happens in integer cents to avoid floating-point drift.
//! The conversion from euros to cents happens exactly once per amount; in
//! particular, shipping prices arrive from the rate quote already in cents
//! and must never be converted again.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from money conversions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    /// The decimal amount does not fit in an i64 cent count.
    #[error("amount out of range")]
    OutOfRange,
}

/// An amount of money in integer cents (euro minor units).
///
/// Negative values are representable (refund arithmetic) but never produced
/// by order-total computation on valid inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Create from a raw cent count.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Get the raw cent count.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Convert a decimal euro amount to cents with commercial rounding
    /// (half away from zero): `round(d * 100)`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::OutOfRange`] if the scaled amount does not fit
    /// in an `i64`.
    pub fn from_decimal_euros(euros: Decimal) -> Result<Self, MoneyError> {
        let scaled = euros
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(MoneyError::OutOfRange)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        scaled.to_i64().map(Self).ok_or(MoneyError::OutOfRange)
    }

    /// Convert back to decimal euros (exact, two decimal places).
    #[must_use]
    pub fn to_decimal_euros(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Format as a plain decimal euro string, e.g. `"80.23"`.
    ///
    /// This is the amount format the payment provider expects.
    #[must_use]
    pub fn format_euros(&self) -> String {
        format!("{:.2}", self.to_decimal_euros())
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl std::fmt::Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Cents {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Cents {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Cents {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(v))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Cents {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

/// Compute the order subtotal in cents from decimal unit prices.
///
/// The line amounts are summed in exact decimal arithmetic and converted to
/// cents once at the end: `round(sum(price_i * qty_i) * 100)`.
///
/// # Errors
///
/// Returns [`MoneyError::OutOfRange`] if the total does not fit in an `i64`.
pub fn subtotal_cents<I>(lines: I) -> Result<Cents, MoneyError>
where
    I: IntoIterator<Item = (Decimal, u32)>,
{
    let mut sum = Decimal::ZERO;
    for (unit_price, quantity) in lines {
        let line = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or(MoneyError::OutOfRange)?;
        sum = sum.checked_add(line).ok_or(MoneyError::OutOfRange)?;
    }
    Cents::from_decimal_euros(sum)
}

/// The computed money breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of line item amounts, in cents.
    pub subtotal: Cents,
    /// Shipping cost, in cents, exactly as quoted.
    pub shipping: Cents,
    /// VAT on subtotal + shipping, in cents.
    pub vat: Cents,
    /// Grand total: subtotal + shipping + vat.
    pub total: Cents,
}

impl OrderTotals {
    /// Compute order totals from a subtotal, a shipping cost, and a VAT
    /// percentage (e.g. `21` for 21%).
    ///
    /// VAT applies to the combined base (subtotal + shipping) and rounds up
    /// to the next cent; the merchant rounds in the tax authority's favor.
    /// The shipping amount is already in cents and contributes to the total
    /// exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::OutOfRange`] on arithmetic overflow or a
    /// nonsensical (negative) VAT result.
    pub fn compute(
        subtotal: Cents,
        shipping: Cents,
        vat_rate_percent: Decimal,
    ) -> Result<Self, MoneyError> {
        let base = subtotal
            .checked_add(shipping)
            .ok_or(MoneyError::OutOfRange)?;

        let vat_exact = Decimal::from(base.value())
            .checked_mul(vat_rate_percent)
            .ok_or(MoneyError::OutOfRange)?
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or(MoneyError::OutOfRange)?;
        let vat = vat_exact
            .ceil()
            .to_i64()
            .map(Cents::new)
            .ok_or(MoneyError::OutOfRange)?;

        let total = base.checked_add(vat).ok_or(MoneyError::OutOfRange)?;

        Ok(Self {
            subtotal,
            shipping,
            vat,
            total,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_totals_be_vat_21() {
        let totals = OrderTotals::compute(Cents::new(5250), Cents::new(1380), d("21")).unwrap();
        assert_eq!(totals.vat, Cents::new(1393));
        assert_eq!(totals.total, Cents::new(8023));
    }

    #[test]
    fn test_totals_vat_20() {
        let totals = OrderTotals::compute(Cents::new(5250), Cents::new(1500), d("20")).unwrap();
        assert_eq!(totals.vat, Cents::new(1350));
        assert_eq!(totals.total, Cents::new(8100));
    }

    #[test]
    fn test_totals_pickup_free_shipping() {
        let totals = OrderTotals::compute(Cents::new(5250), Cents::ZERO, d("20")).unwrap();
        assert_eq!(totals.vat, Cents::new(1050));
        assert_eq!(totals.total, Cents::new(6300));
    }

    /// Shipping arrives in cents and must contribute exactly its input value
    /// to the total. A historical bug multiplied it by 100 a second time.
    #[test]
    fn test_shipping_not_double_converted() {
        for shipping in [0i64, 1, 380, 1380, 1500, 9900] {
            let totals =
                OrderTotals::compute(Cents::new(5250), Cents::new(shipping), d("21")).unwrap();
            let shipping_contribution = totals.total - totals.subtotal - totals.vat;
            assert_eq!(shipping_contribution, Cents::new(shipping));
        }
    }

    #[test]
    fn test_vat_rounds_up_within_one_cent() {
        for (subtotal, shipping, rate) in [
            (5250i64, 1380i64, d("21")),
            (1, 0, d("21")),
            (3333, 777, d("19")),
            (10_000, 0, d("25")),
            (999, 499, d("6")),
        ] {
            let totals =
                OrderTotals::compute(Cents::new(subtotal), Cents::new(shipping), rate).unwrap();
            let exact = Decimal::from(subtotal + shipping) * rate / Decimal::ONE_HUNDRED;
            let diff = Decimal::from(totals.vat.value()) - exact;
            assert!(diff >= Decimal::ZERO, "vat must not undercharge");
            assert!(diff < Decimal::ONE, "vat must round up less than one cent");
        }
    }

    #[test]
    fn test_subtotal_single_conversion() {
        // 2 x 17.50 + 1 x 17.50 = 52.50 -> 5250 cents
        let subtotal = subtotal_cents([(d("17.50"), 2), (d("17.50"), 1)]).unwrap();
        assert_eq!(subtotal, Cents::new(5250));
    }

    #[test]
    fn test_subtotal_property_assorted_prices() {
        let lines = [
            (d("12.95"), 3u32),
            (d("8.10"), 1),
            (d("24.999"), 2), // odd precision still converts once, at the end
            (d("0.05"), 7),
        ];
        let expected = lines
            .iter()
            .fold(Decimal::ZERO, |acc, (p, q)| acc + p * Decimal::from(*q));
        let expected_cents = (expected * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap();
        assert_eq!(
            subtotal_cents(lines).unwrap(),
            Cents::new(expected_cents)
        );
    }

    #[test]
    fn test_from_decimal_euros_rounding() {
        assert_eq!(
            Cents::from_decimal_euros(d("17.505")).unwrap(),
            Cents::new(1751)
        );
        assert_eq!(
            Cents::from_decimal_euros(d("17.504")).unwrap(),
            Cents::new(1750)
        );
        assert_eq!(Cents::from_decimal_euros(d("0")).unwrap(), Cents::ZERO);
    }

    #[test]
    fn test_format_euros() {
        assert_eq!(Cents::new(8023).format_euros(), "80.23");
        assert_eq!(Cents::new(500).format_euros(), "5.00");
        assert_eq!(Cents::new(7).format_euros(), "0.07");
    }
}
