//! Payment service configuration loaded from environment variables.

use domain::Money;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `8080`)
/// - `DECLINE_AMOUNT` — decline payments over this amount (default: `105`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub decline_amount: Money,
    pub log_level: String,
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
            decline_amount: std::env::var("DECLINE_AMOUNT")
                .ok()
                .and_then(|a| a.parse::<f64>().ok())
                .and_then(Money::from_decimal)
                .unwrap_or(defaults.decline_amount),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
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
            port: 8080,
            decline_amount: Money::from_cents(10_500),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.decline_amount.cents(), 10_500);
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }
}
