//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin (default: `http://localhost:3001`)
//! - `SENDCLOUD_PUBLIC_KEY` / `SENDCLOUD_SECRET_KEY` - Shipping aggregator
//!   credentials; label creation fails with 502 when absent
//! - `SENDCLOUD_API_BASE` - Aggregator base URL (default: `https://panel.sendcloud.sc/api`)
//! - `META_CATALOG_ID` / `META_ACCESS_TOKEN` - Ad-catalog sync credentials
//! - `META_GRAPH_BASE` - Graph API base (default: `https://graph.facebook.com/v19.0`)
//! - `SHOP_BASE_URL` - Public storefront URL used for ad-catalog product links
//!   (default: `https://www.valroux.be`)
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - Error tracking

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Shipping aggregator configuration (None: labels unavailable)
    pub sendcloud: Option<SendcloudConfig>,
    /// Ad-catalog sync configuration (None: sync unavailable)
    pub meta: Option<MetaConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Shipping aggregator (Sendcloud) configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct SendcloudConfig {
    /// API base URL
    pub api_base: String,
    /// Public key (basic-auth username)
    pub public_key: String,
    /// Secret key (basic-auth password)
    pub secret_key: SecretString,
}

impl std::fmt::Debug for SendcloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendcloudConfig")
            .field("api_base", &self.api_base)
            .field("public_key", &self.public_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Ad-catalog (Meta graph API) configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct MetaConfig {
    /// Graph API base URL
    pub graph_base: String,
    /// Catalog id to push items into
    pub catalog_id: String,
    /// Bearer access token
    pub access_token: SecretString,
    /// Public storefront URL, used to build product links
    pub shop_base_url: String,
}

impl std::fmt::Debug for MetaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaConfig")
            .field("graph_base", &self.graph_base)
            .field("catalog_id", &self.catalog_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;
        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("ADMIN_BASE_URL", "http://localhost:3001");
        let session_secret = get_validated_secret("ADMIN_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "ADMIN_SESSION_SECRET")?;

        let sendcloud = SendcloudConfig::from_env()?;
        let meta = MetaConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            sendcloud,
            meta,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SendcloudConfig {
    /// Both keys present: aggregator enabled. Both absent: labels
    /// unavailable. One of the two present: configuration error.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let public_key = get_optional_env("SENDCLOUD_PUBLIC_KEY");
        let secret_key = get_optional_env("SENDCLOUD_SECRET_KEY");

        match (public_key, secret_key) {
            (Some(public_key), Some(secret_key)) => {
                validate_secret_strength(&secret_key, "SENDCLOUD_SECRET_KEY")?;
                Ok(Some(Self {
                    api_base: get_env_or_default(
                        "SENDCLOUD_API_BASE",
                        "https://panel.sendcloud.sc/api",
                    ),
                    public_key,
                    secret_key: SecretString::from(secret_key),
                }))
            }
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(
                "SENDCLOUD_SECRET_KEY".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar(
                "SENDCLOUD_PUBLIC_KEY".to_string(),
            )),
        }
    }
}

impl MetaConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let catalog_id = get_optional_env("META_CATALOG_ID");
        let access_token = get_optional_env("META_ACCESS_TOKEN");

        match (catalog_id, access_token) {
            (Some(catalog_id), Some(access_token)) => {
                validate_secret_strength(&access_token, "META_ACCESS_TOKEN")?;
                Ok(Some(Self {
                    graph_base: get_env_or_default(
                        "META_GRAPH_BASE",
                        "https://graph.facebook.com/v19.0",
                    ),
                    catalog_id,
                    access_token: SecretString::from(access_token),
                    shop_base_url: get_env_or_default("SHOP_BASE_URL", "https://www.valroux.be"),
                }))
            }
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar("META_ACCESS_TOKEN".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar("META_CATALOG_ID".to_string())),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_config_debug_redacts_token() {
        let config = MetaConfig {
            graph_base: "https://graph.facebook.com/v19.0".to_string(),
            catalog_id: "1234567890".to_string(),
            access_token: SecretString::from("EAAGm7Zq2xN6vB4dW8qZ1t"),
            shop_base_url: "https://www.valroux.be".to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("1234567890"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("EAAGm7Zq2xN6vB4dW8qZ1t"));
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }
}
