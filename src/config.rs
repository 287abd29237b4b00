use std::net::SocketAddr;
use thiserror::Error;

const BIND_VAR: &str = "SCHEDULER_BIND";
const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },
}

/// Settings for the HTTP driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl ServerConfig {
    /// Reads `SCHEDULER_BIND`, falling back to `127.0.0.1:8080`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_bind(std::env::var(BIND_VAR).ok().as_deref())
    }

    fn from_bind(value: Option<&str>) -> Result<Self, ConfigError> {
        let raw = value.unwrap_or(DEFAULT_BIND);
        let bind_addr = raw.parse().map_err(|_| ConfigError::InvalidBindAddr {
            var: BIND_VAR,
            value: raw.to_string(),
        })?;
        Ok(Self { bind_addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind() {
        assert_eq!(ServerConfig::from_bind(None).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_custom_bind() {
        let config = ServerConfig::from_bind(Some("0.0.0.0:9000")).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn test_invalid_bind() {
        assert_eq!(
            ServerConfig::from_bind(Some("localhost")).unwrap_err(),
            ConfigError::InvalidBindAddr {
                var: BIND_VAR,
                value: "localhost".to_string(),
            }
        );
    }
}
