//! Application configuration loaded from environment variables.

use std::time::Duration;

use saga::DEFAULT_CALL_TIMEOUT;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `8084`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — PostgreSQL connection string; orders are kept in memory when unset
/// - `PAYMENT_URL` — payment authorisation endpoint (default: `"http://payment/paymentauth"`)
/// - `CALL_TIMEOUT_MS` — deadline for each outbound call (default: `5000`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub payment_url: String,
    pub call_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            payment_url: std::env::var("PAYMENT_URL").unwrap_or(defaults.payment_url),
            call_timeout: std::env::var("CALL_TIMEOUT_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.call_timeout),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8084,
            log_level: "info".to_string(),
            database_url: None,
            payment_url: "http://payment/paymentauth".to_string(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}
