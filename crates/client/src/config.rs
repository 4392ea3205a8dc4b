//! Client configuration from the environment.

use std::time::Duration;

use crate::stock_query::StockQueryOptions;

pub const API_URL_VAR: &str = "PRODTRACK_API_URL";
pub const API_TOKEN_VAR: &str = "PRODTRACK_API_TOKEN";
pub const HTTP_TIMEOUT_VAR: &str = "PRODTRACK_HTTP_TIMEOUT_SECS";
pub const STOCK_REFRESH_VAR: &str = "PRODTRACK_STOCK_REFRESH_SECS";
pub const STOCK_STALE_VAR: &str = "PRODTRACK_STOCK_STALE_SECS";
pub const STOCK_IDLE_VAR: &str = "PRODTRACK_STOCK_IDLE_SECS";
pub const STOCK_CAPACITY_VAR: &str = "PRODTRACK_STOCK_CACHE_CAPACITY";

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the ProdTrack API, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request, if set.
    pub api_token: Option<String>,
    pub http_timeout: Duration,
    pub stock: StockQueryOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            stock: StockQueryOptions::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or blank
    /// variables take their defaults; malformed ones are rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = StockQueryOptions::default();

        let api_url = get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: API_URL_VAR,
                value: api_url,
                reason: "expected an http:// or https:// URL".to_string(),
            });
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token: get(API_TOKEN_VAR),
            http_timeout: seconds(HTTP_TIMEOUT_VAR, get(HTTP_TIMEOUT_VAR), DEFAULT_HTTP_TIMEOUT)?,
            stock: StockQueryOptions {
                refresh_interval: seconds(STOCK_REFRESH_VAR, get(STOCK_REFRESH_VAR), defaults.refresh_interval)?,
                stale_after: seconds(STOCK_STALE_VAR, get(STOCK_STALE_VAR), defaults.stale_after)?,
                idle_timeout: seconds(STOCK_IDLE_VAR, get(STOCK_IDLE_VAR), defaults.idle_timeout)?,
                max_capacity: match get(STOCK_CAPACITY_VAR) {
                    Some(raw) => parse_positive(STOCK_CAPACITY_VAR, raw)?,
                    None => defaults.max_capacity,
                },
            },
        })
    }
}

fn seconds(var: &'static str, raw: Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    match raw {
        Some(raw) => Ok(Duration::from_secs(parse_positive(var, raw)?)),
        None => Ok(default),
    }
}

fn parse_positive(var: &'static str, raw: String) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(v) => Ok(v),
        Err(e) => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.stock.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.stock.stale_after, Duration::from_secs(10));
        assert_eq!(config.stock.idle_timeout, Duration::from_secs(300));
        assert_eq!(config.stock.max_capacity, 10_000);
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://stock.example.com/ "),
            (API_TOKEN_VAR, "secret"),
            (STOCK_REFRESH_VAR, "5"),
            (STOCK_CAPACITY_VAR, "250"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://stock.example.com");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.stock.refresh_interval, Duration::from_secs(5));
        assert_eq!(config.stock.max_capacity, 250);
    }

    #[test]
    fn blank_token_is_treated_as_unset() {
        let config = ClientConfig::from_lookup(lookup(&[(API_TOKEN_VAR, "  ")])).unwrap();
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[(STOCK_STALE_VAR, "ten")])).unwrap_err();
        match err {
            ConfigError::Invalid { var, .. } => assert_eq!(var, STOCK_STALE_VAR),
        }

        assert!(ClientConfig::from_lookup(lookup(&[(HTTP_TIMEOUT_VAR, "0")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "localhost:8080")])).is_err());
    }
}
