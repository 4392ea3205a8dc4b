//! Server configuration from the environment.

use std::net::SocketAddr;

pub const BIND_ADDR_VAR: &str = "PRODTRACK_BIND_ADDR";
pub const API_TOKEN_VAR: &str = "PRODTRACK_API_TOKEN";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

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
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// When set, every `/api` request must carry this bearer token.
    pub api_token: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let raw = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: BIND_ADDR_VAR,
            value: raw.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            bind_addr,
            api_token: get(API_TOKEN_VAR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_port_8080_without_auth() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn reads_bind_addr_and_token() {
        let config = ApiConfig::from_lookup(|var| match var {
            BIND_ADDR_VAR => Some("127.0.0.1:9000".to_string()),
            API_TOKEN_VAR => Some("s3cret".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.api_token.as_deref(), Some("s3cret"));
    }

    #[test]
    fn rejects_malformed_bind_addr() {
        let err = ApiConfig::from_lookup(|var| (var == BIND_ADDR_VAR).then(|| "not-an-addr".to_string()))
            .unwrap_err();
        match err {
            ConfigError::Invalid { var, .. } => assert_eq!(var, BIND_ADDR_VAR),
        }
    }
}
