//! Shipping aggregator wire types.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response envelope for `GET /v2/shipping_methods`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingMethodsResponse {
    pub shipping_methods: Vec<ShippingMethod>,
}

/// One shipping method as the aggregator describes it.
///
/// Weights are grams, prices decimal euros.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingMethod {
    pub id: i64,
    pub name: String,
    pub carrier: String,
    pub min_weight: i64,
    pub max_weight: i64,
    #[serde(default)]
    pub countries: Vec<MethodCountry>,
}

/// Per-country pricing entry on a shipping method.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodCountry {
    pub iso_2: String,
    /// Price in decimal euros.
    pub price: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shipping_methods_response() {
        let json = r#"{
            "shipping_methods": [
                {
                    "id": 8,
                    "name": "Standard 0-10kg",
                    "carrier": "bpost",
                    "min_weight": 1,
                    "max_weight": 10000,
                    "countries": [
                        {"iso_2": "BE", "price": 5.90},
                        {"iso_2": "NL", "price": 7.50}
                    ]
                }
            ]
        }"#;

        let body: ShippingMethodsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.shipping_methods.len(), 1);
        let method = &body.shipping_methods[0];
        assert_eq!(method.carrier, "bpost");
        let be = method.countries.iter().find(|c| c.iso_2 == "BE").unwrap();
        assert_eq!(be.price, Decimal::new(590, 2));
    }
}
