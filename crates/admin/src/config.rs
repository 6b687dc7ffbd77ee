//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROSTER_STORE_URL` - URL of the remote `/users` collection
//!   (e.g. `https://example.mockapi.io/users`)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ROSTER_PAGE_SIZE` - Rows per list page (default: 10)
//! - `ROSTER_LOCALE` - Display/collation locale (default: ru)
//! - `ROSTER_CACHE_CAPACITY` - Max cached query entries (default: 1000)
//! - `ROSTER_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (TLS)
//! - `ADMIN_TLS_CERT` - PEM-encoded certificate chain
//! - `ADMIN_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};

use roster_core::listing::DEFAULT_PAGE_SIZE;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_LOCALE: &str = "ru";
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Remote user store
    pub store: StoreConfig,
    /// Rows per list page
    pub page_size: usize,
    /// BCP-47 locale used for collation and display
    pub locale: String,
    /// Maximum number of cached query entries
    pub cache_capacity: u64,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Remote user store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// URL of the users collection; records live at `{base_url}/{id}`.
    pub base_url: Url,
}

impl StoreConfig {
    /// Parse and validate a store collection URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEnvVar` if the URL does not parse or is not http(s).
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid =
            |reason: String| ConfigError::InvalidEnvVar("ROSTER_STORE_URL".to_string(), reason);

        let base_url = Url::parse(raw.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "scheme must be http or https (got {})",
                base_url.scheme()
            )));
        }
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }

        Ok(Self { base_url })
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_lookup(env: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        match (env("ADMIN_TLS_CERT"), env("ADMIN_TLS_KEY")) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ADMIN_TLS_*".to_string(),
                "Both ADMIN_TLS_CERT and ADMIN_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(&env, "ADMIN_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&env, "ADMIN_PORT", 3001_u16)?;
        let store = StoreConfig::parse(
            &env("ROSTER_STORE_URL")
                .ok_or_else(|| ConfigError::MissingEnvVar("ROSTER_STORE_URL".to_string()))?,
        )?;

        let page_size = parse_or_default(&env, "ROSTER_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ROSTER_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let locale = env("ROSTER_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        let cache_capacity =
            parse_or_default(&env, "ROSTER_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;

        let log_json = env("ROSTER_LOG_JSON").is_some();
        let sentry_dsn = env("SENTRY_DSN");
        let sentry_environment = env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_lookup(&env)?;

        Ok(Self {
            host,
            port,
            store,
            page_size,
            locale,
            cache_capacity,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Configuration for tests and embedding: defaults everywhere except the
    /// store URL.
    #[must_use]
    pub fn for_store(store: StoreConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            store,
            page_size: DEFAULT_PAGE_SIZE,
            locale: DEFAULT_LOCALE.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            tls: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, using `default` when it is unset.
fn parse_or_default<T>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            AdminConfig::from_lookup(lookup(&[("ROSTER_STORE_URL", "https://store.test/users/")]))
                .unwrap();

        assert_eq!(config.store.base_url.as_str(), "https://store.test/users");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.locale, "ru");
        assert_eq!(config.cache_capacity, 1000);
        assert!(!config.log_json);
        assert!(config.tls.is_none());

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_missing_store_url() {
        let err = AdminConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "ROSTER_STORE_URL"));
    }

    #[test]
    fn test_invalid_values() {
        let err = AdminConfig::from_lookup(lookup(&[
            ("ROSTER_STORE_URL", "https://store.test/users"),
            ("ADMIN_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ADMIN_PORT"));

        let err = AdminConfig::from_lookup(lookup(&[
            ("ROSTER_STORE_URL", "https://store.test/users"),
            ("ROSTER_PAGE_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ROSTER_PAGE_SIZE"));
    }

    #[test]
    fn test_store_url_must_be_http() {
        assert!(StoreConfig::parse("ftp://store.test/users").is_err());
        assert!(StoreConfig::parse("not a url").is_err());
        assert!(StoreConfig::parse("http://localhost:8080/users").is_ok());
    }

    #[test]
    fn test_tls_requires_both_parts() {
        let err = AdminConfig::from_lookup(lookup(&[
            ("ROSTER_STORE_URL", "https://store.test/users"),
            ("ADMIN_TLS_CERT", "-----BEGIN CERTIFICATE-----"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ADMIN_TLS_*"));
    }

    #[test]
    fn test_tls_config_debug_redacts_key() {
        let config = TlsConfig {
            cert_pem: "-----BEGIN CERTIFICATE-----".to_string(),
            key_pem: SecretString::from("super_secret_private_key"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_private_key"));
    }
}
