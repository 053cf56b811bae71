//! Shipping rate quoting.
//!
//! Quotes come from the aggregator when credentials are configured, reshaped
//! into a flat quote list. When the aggregator is unavailable (no
//! credentials, or the call fails) the static per-zone fallback table
//! answers instead, so checkout never blocks on a shipping outage.
//!
//! Quote responses are deduplicated for ~45 seconds in an in-process cache
//! keyed on (country, postal code, weight bucket), since a customer editing
//! their address form can fire several identical lookups in a row.

use std::time::Duration;

use serde::Serialize;

use valroux_core::{Cents, CountryCode, ShippingZone};

use crate::sendcloud::{ShippingClient, ShippingMethod};

/// Carriers we hand wine bottles to.
const CARRIER_ALLOW_LIST: &[&str] = &[
    "bpost",
    "postnl",
    "dpd",
    "dhl",
    "ups",
    "colissimo",
    "mondial_relay",
];

/// Method-name fragments that mark letter-style services unsuited to
/// bottles.
const DENY_NAME_FRAGMENTS: &[&str] = &["letter", "mailbox", "unstamped"];

/// Quote cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(45);

/// Weight bucket size for the cache key, in grams.
const WEIGHT_BUCKET_GRAMS: i64 = 1000;

/// One quoted shipping rate, as returned to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingQuote {
    /// Aggregator method id, or a stable synthetic id for fallback rates.
    pub id: String,
    pub carrier: String,
    pub name: String,
    pub price_cents: i64,
    /// Delivery to a pickup point rather than the door.
    pub service_point: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_estimate: Option<String>,
    /// True when this rate comes from the static table.
    pub fallback: bool,
}

type QuoteCache = moka::future::Cache<(String, String, i64), Vec<ShippingQuote>>;

/// Shipping rate quoting service.
#[derive(Debug, Clone)]
pub struct ShippingService {
    client: Option<ShippingClient>,
    cache: QuoteCache,
}

impl ShippingService {
    /// Create the service. `client` is `None` when no aggregator
    /// credentials are configured; every quote then uses the fallback table.
    #[must_use]
    pub fn new(client: Option<ShippingClient>) -> Self {
        let cache = moka::future::Cache::builder()
            .time_to_live(CACHE_TTL)
            .max_capacity(4096)
            .build();
        Self { client, cache }
    }

    /// Quote shipping rates for a destination and cart weight.
    ///
    /// Never fails: aggregator errors degrade to the fallback table.
    pub async fn quote(
        &self,
        country: &CountryCode,
        postal_code: &str,
        weight_grams: i64,
    ) -> Vec<ShippingQuote> {
        let key = (
            country.as_str().to_string(),
            postal_code.to_string(),
            weight_grams.div_euclid(WEIGHT_BUCKET_GRAMS),
        );

        self.cache
            .get_with(key, self.fetch_quotes(country, weight_grams))
            .await
    }

    async fn fetch_quotes(&self, country: &CountryCode, weight_grams: i64) -> Vec<ShippingQuote> {
        if let Some(client) = &self.client {
            match client.shipping_methods(country).await {
                Ok(methods) => {
                    let quotes = reshape_methods(&methods, country, weight_grams);
                    if !quotes.is_empty() {
                        return quotes;
                    }
                    tracing::warn!(
                        country = country.as_str(),
                        weight_grams,
                        "No aggregator method fits; using fallback rates"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        country = country.as_str(),
                        "Aggregator quote failed; using fallback rates"
                    );
                }
            }
        }

        fallback_rates(country.zone())
    }
}

/// Reshape aggregator methods into the quote list.
///
/// Filters by destination country, weight window, the carrier allow list,
/// and the deny list of method-name fragments. Prices are converted from
/// decimal euros to cents exactly once.
fn reshape_methods(
    methods: &[ShippingMethod],
    country: &CountryCode,
    weight_grams: i64,
) -> Vec<ShippingQuote> {
    let mut quotes: Vec<ShippingQuote> = methods
        .iter()
        .filter(|m| weight_grams >= m.min_weight && weight_grams <= m.max_weight)
        .filter(|m| CARRIER_ALLOW_LIST.contains(&m.carrier.to_lowercase().as_str()))
        .filter(|m| {
            let name = m.name.to_lowercase();
            !DENY_NAME_FRAGMENTS.iter().any(|frag| name.contains(frag))
        })
        .filter_map(|m| {
            let price = m
                .countries
                .iter()
                .find(|c| c.iso_2.eq_ignore_ascii_case(country.as_str()))
                .map(|c| c.price)?;
            let price_cents = Cents::from_decimal_euros(price).ok()?.value();
            let lowered = m.name.to_lowercase();
            Some(ShippingQuote {
                id: m.id.to_string(),
                carrier: m.carrier.clone(),
                name: m.name.clone(),
                price_cents,
                service_point: lowered.contains("service point") || lowered.contains("pickup"),
                delivery_estimate: None,
                fallback: false,
            })
        })
        .collect();

    quotes.sort_by_key(|q| q.price_cents);
    quotes
}

/// Static fallback rates per shipping zone, prices in cents.
///
/// Ids are stable so a quote selected just before an aggregator recovery
/// still matches at checkout.
#[must_use]
pub fn fallback_rates(zone: ShippingZone) -> Vec<ShippingQuote> {
    let table: &[(&str, &str, &str, i64, bool, &str)] = match zone {
        ShippingZone::Domestic => &[
            (
                "fallback-be-bpost-home",
                "bpost",
                "bpost Home Delivery",
                690,
                false,
                "1-2 business days",
            ),
            (
                "fallback-be-bpost-pickup",
                "bpost",
                "bpost Pickup Point",
                450,
                true,
                "1-2 business days",
            ),
        ],
        ShippingZone::Eu => &[
            (
                "fallback-eu-dpd-home",
                "dpd",
                "DPD Classic Europe",
                1380,
                false,
                "2-4 business days",
            ),
            (
                "fallback-eu-ups-standard",
                "ups",
                "UPS Standard",
                1500,
                false,
                "2-5 business days",
            ),
        ],
        ShippingZone::International => &[(
            "fallback-intl-dhl-express",
            "dhl",
            "DHL Express Worldwide",
            2950,
            false,
            "3-7 business days",
        )],
    };

    table
        .iter()
        .map(
            |&(id, carrier, name, price_cents, service_point, estimate)| ShippingQuote {
                id: id.to_string(),
                carrier: carrier.to_string(),
                name: name.to_string(),
                price_cents,
                service_point,
                delivery_estimate: Some(estimate.to_string()),
                fallback: true,
            },
        )
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use valroux_core::ShippingZone;

    use crate::sendcloud::MethodCountry;

    use super::*;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn be() -> CountryCode {
        CountryCode::parse("BE").unwrap()
    }

    fn method(
        id: i64,
        name: &str,
        carrier: &str,
        min_weight: i64,
        max_weight: i64,
        price: &str,
    ) -> ShippingMethod {
        ShippingMethod {
            id,
            name: name.to_string(),
            carrier: carrier.to_string(),
            min_weight,
            max_weight,
            countries: vec![MethodCountry {
                iso_2: "BE".to_string(),
                price: decimal(price),
            }],
        }
    }

    #[test]
    fn test_reshape_filters_weight_window() {
        let methods = vec![
            method(1, "Standard 0-2kg", "bpost", 1, 2000, "5.90"),
            method(2, "Standard 2-10kg", "bpost", 2001, 10000, "8.90"),
        ];
        let quotes = reshape_methods(&methods, &be(), 4500);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].id, "2");
        assert_eq!(quotes[0].price_cents, 890);
    }

    #[test]
    fn test_reshape_rejects_unknown_carriers() {
        let methods = vec![
            method(1, "Standard", "bpost", 1, 10000, "5.90"),
            method(2, "Budget", "cheapo_express", 1, 10000, "1.00"),
        ];
        let quotes = reshape_methods(&methods, &be(), 3000);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].carrier, "bpost");
    }

    #[test]
    fn test_reshape_rejects_letter_services() {
        let methods = vec![
            method(1, "Unstamped letter", "bpost", 1, 10000, "2.10"),
            method(2, "Mailbox parcel", "postnl", 1, 10000, "3.50"),
            method(3, "Standard", "dpd", 1, 10000, "6.50"),
        ];
        let quotes = reshape_methods(&methods, &be(), 3000);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].carrier, "dpd");
    }

    #[test]
    fn test_reshape_converts_euros_once() {
        let methods = vec![method(1, "Standard", "bpost", 1, 10000, "13.80")];
        let quotes = reshape_methods(&methods, &be(), 3000);
        assert_eq!(quotes[0].price_cents, 1380);
    }

    #[test]
    fn test_reshape_skips_methods_without_country_price() {
        let mut m = method(1, "Standard", "bpost", 1, 10000, "5.90");
        m.countries.clear();
        let quotes = reshape_methods(&[m], &be(), 3000);
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_reshape_sorts_by_price() {
        let methods = vec![
            method(1, "Premium", "dhl", 1, 10000, "12.00"),
            method(2, "Standard", "bpost", 1, 10000, "5.90"),
        ];
        let quotes = reshape_methods(&methods, &be(), 3000);
        assert!(quotes[0].price_cents < quotes[1].price_cents);
    }

    #[test]
    fn test_reshape_flags_service_points() {
        let methods = vec![method(1, "bpost Pickup Point", "bpost", 1, 10000, "4.50")];
        let quotes = reshape_methods(&methods, &be(), 3000);
        assert!(quotes[0].service_point);
    }

    #[test]
    fn test_fallback_rates_per_zone() {
        let domestic = fallback_rates(ShippingZone::Domestic);
        assert!(domestic.iter().all(|q| q.fallback));
        assert!(domestic.iter().any(|q| q.service_point));
        assert!(domestic.iter().all(|q| q.id.starts_with("fallback-be-")));

        let eu = fallback_rates(ShippingZone::Eu);
        assert!(eu.iter().any(|q| q.price_cents == 1380));

        let intl = fallback_rates(ShippingZone::International);
        assert_eq!(intl.len(), 1);
        assert!(intl[0].price_cents > eu[0].price_cents);
    }

    #[tokio::test]
    async fn test_quote_without_client_uses_fallback() {
        let service = ShippingService::new(None);
        let quotes = service.quote(&be(), "1000", 3000).await;
        assert!(!quotes.is_empty());
        assert!(quotes.iter().all(|q| q.fallback));
    }
}
