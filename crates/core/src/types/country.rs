//! Destination countries, shipping zones, and postal-code validation.
//!
//! The estate ships from Belgium. Zone membership drives the fallback rate
//! table: domestic (BE), EU, or international.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CountryError {
    /// The input is not a two-letter ISO 3166-1 alpha-2 code.
    #[error("country must be a two-letter ISO code")]
    InvalidFormat,
}

/// EU member states by ISO alpha-2 code (27 as of 2020).
const EU_COUNTRIES: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT", "LV",
    "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
];

/// The home market country code.
pub const DOMESTIC_COUNTRY: &str = "BE";

/// An ISO 3166-1 alpha-2 country code, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a country code from user input.
    ///
    /// # Errors
    ///
    /// Returns [`CountryError::InvalidFormat`] unless the input is exactly
    /// two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryError> {
        let s = s.trim();
        if s.len() != 2 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryError::InvalidFormat);
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice, e.g. `"BE"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the domestic (home market) country.
    #[must_use]
    pub fn is_domestic(&self) -> bool {
        self.0 == DOMESTIC_COUNTRY
    }

    /// The shipping zone this country falls into.
    #[must_use]
    pub fn zone(&self) -> ShippingZone {
        if self.is_domestic() {
            ShippingZone::Domestic
        } else if EU_COUNTRIES.contains(&self.0.as_str()) {
            ShippingZone::Eu
        } else {
            ShippingZone::International
        }
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CountryCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CountryCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CountryCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

/// Shipping price zone, derived from the destination country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingZone {
    /// Belgium.
    Domestic,
    /// EU member states other than Belgium.
    Eu,
    /// Everywhere else.
    International,
}

/// Validate a postal code for a destination country.
///
/// Known formats are checked strictly; for other countries any non-empty
/// value of plausible length is accepted.
#[must_use]
pub fn validate_postal_code(country: &CountryCode, postal_code: &str) -> bool {
    let pc = postal_code.trim();
    if pc.is_empty() {
        return false;
    }

    match country.as_str() {
        // Four digits
        "BE" | "AT" | "CH" | "DK" | "LU" | "HU" => pc.len() == 4 && all_digits(pc),
        // Five digits
        "DE" | "FR" | "ES" | "IT" | "FI" => pc.len() == 5 && all_digits(pc),
        // Dutch: 1234 AB (space optional)
        "NL" => {
            let compact: String = pc.chars().filter(|c| !c.is_whitespace()).collect();
            compact.len() == 6
                && compact.chars().take(4).all(|c| c.is_ascii_digit())
                && compact.chars().skip(4).all(|c| c.is_ascii_alphabetic())
        }
        // US ZIP or ZIP+4
        "US" => match pc.split_once('-') {
            Some((zip, plus4)) => {
                zip.len() == 5 && all_digits(zip) && plus4.len() == 4 && all_digits(plus4)
            }
            None => pc.len() == 5 && all_digits(pc),
        },
        // Generic fallback
        _ => pc.len() <= 12,
    }
}

fn all_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn country(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    #[test]
    fn test_parse_normalizes_case() {
        assert_eq!(country("be").as_str(), "BE");
        assert_eq!(country(" nl ").as_str(), "NL");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(CountryCode::parse("BEL").is_err());
        assert!(CountryCode::parse("B").is_err());
        assert!(CountryCode::parse("1E").is_err());
        assert!(CountryCode::parse("").is_err());
    }

    #[test]
    fn test_zones() {
        assert_eq!(country("BE").zone(), ShippingZone::Domestic);
        assert_eq!(country("NL").zone(), ShippingZone::Eu);
        assert_eq!(country("DE").zone(), ShippingZone::Eu);
        assert_eq!(country("US").zone(), ShippingZone::International);
        assert_eq!(country("GB").zone(), ShippingZone::International);
        assert_eq!(country("CH").zone(), ShippingZone::International);
    }

    #[test]
    fn test_postal_code_be() {
        assert!(validate_postal_code(&country("BE"), "1000"));
        assert!(validate_postal_code(&country("BE"), "9920"));
        assert!(!validate_postal_code(&country("BE"), "100"));
        assert!(!validate_postal_code(&country("BE"), "10000"));
        assert!(!validate_postal_code(&country("BE"), "1O00"));
    }

    #[test]
    fn test_postal_code_nl() {
        assert!(validate_postal_code(&country("NL"), "1234 AB"));
        assert!(validate_postal_code(&country("NL"), "1234AB"));
        assert!(!validate_postal_code(&country("NL"), "12345"));
        assert!(!validate_postal_code(&country("NL"), "AB 1234"));
    }

    #[test]
    fn test_postal_code_de_fr() {
        assert!(validate_postal_code(&country("DE"), "10115"));
        assert!(validate_postal_code(&country("FR"), "75001"));
        assert!(!validate_postal_code(&country("DE"), "1011"));
    }

    #[test]
    fn test_postal_code_us() {
        assert!(validate_postal_code(&country("US"), "90210"));
        assert!(validate_postal_code(&country("US"), "90210-1234"));
        assert!(!validate_postal_code(&country("US"), "90210-12"));
        assert!(!validate_postal_code(&country("US"), "9021"));
    }

    #[test]
    fn test_postal_code_generic() {
        assert!(validate_postal_code(&country("JP"), "100-0001"));
        assert!(!validate_postal_code(&country("JP"), ""));
        assert!(!validate_postal_code(
            &country("JP"),
            "way-too-long-to-be-a-postal-code"
        ));
    }
}
