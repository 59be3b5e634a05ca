//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;

/// Allowed CORS origins
#[derive(Clone, Debug, PartialEq)]
pub enum AllowedOrigins {
    /// Any origin (`*`)
    Any,
    /// Explicit list of origins
    List(Vec<HeaderValue>),
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Allowed client origins for CORS
    pub client_origins: AllowedOrigins,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Some(port) = lookup("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string())
        };

        let client_origins = parse_origins(&lookup("CLIENT_ORIGIN").unwrap_or_else(|| "*".to_string()))?;

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            client_origins,
        })
    }
}

/// Parse a comma-separated origin list, `*` meaning any origin
fn parse_origins(raw: &str) -> Result<AllowedOrigins, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "*" {
        return Ok(AllowedOrigins::Any);
    }

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>()
                .map_err(|_| ConfigError::InvalidOrigin(s.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AllowedOrigins::List)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server address format")]
    InvalidAddress,

    #[error("Invalid client origin: {0}")]
    InvalidOrigin(String),
}
