use std::{net::SocketAddr, time::Duration};

use reqwest::Url;
use thiserror::Error;

use crate::infrastructure::clash_tag_validator::DEFAULT_CLASH_API_BASE_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CLASH_API_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Process settings, read once at startup and handed to constructors
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub clash_api_key: String,
    pub clash_api_base_url: Url,
    pub clash_api_timeout: Duration,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Load `.env` when present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let clash_api_base_url = parse_or(
            &lookup,
            "CLASH_API_BASE_URL",
            DEFAULT_CLASH_API_BASE_URL,
            |value| Url::parse(value).ok(),
        )?;
        let timeout_secs = parse_or(
            &lookup,
            "CLASH_API_TIMEOUT_SECS",
            &DEFAULT_CLASH_API_TIMEOUT_SECS.to_string(),
            |value| value.parse::<u64>().ok().filter(|secs| *secs > 0),
        )?;
        let session_ttl_hours = parse_or(
            &lookup,
            "SESSION_TTL_HOURS",
            &DEFAULT_SESSION_TTL_HOURS.to_string(),
            |value| value.parse::<i64>().ok().filter(|hours| *hours > 0),
        )?;
        let bind_addr = parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR, |value| {
            value.parse::<SocketAddr>().ok()
        })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            clash_api_key: required("CLASH_API_KEY")?,
            clash_api_base_url,
            clash_api_timeout: Duration::from_secs(timeout_secs),
            jwt_secret: required("JWT_SECRET")?,
            session_ttl_hours,
            bind_addr,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    parse(&value).ok_or(ConfigError::Invalid { key, value })
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("clash_api_base_url", &self.clash_api_base_url.as_str())
            .field("clash_api_timeout", &self.clash_api_timeout)
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}
