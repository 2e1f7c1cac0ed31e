//! Application configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Development-only sign-in that skips the OAuth flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevAuth {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub stagecraft_host: String,
    pub api_timeouts: ApiTimeouts,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub dev_auth: Option<DevAuth>,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `STAGECRAFT_HOST`: base URL of the backing dashboard API
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `API_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SESSION_TTL_SECS`: idle session lifetime, default 8 hours
    /// - `COOKIE_SECURE`: defaults to true when `STAGECRAFT_HOST` is https
    /// - `DEV_AUTH_BYPASS` + `DEV_ACCESS_TOKEN`: enable `POST /dev/session`
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let stagecraft_host = lookup("STAGECRAFT_HOST")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("STAGECRAFT_HOST"))?
            .trim()
            .trim_end_matches('/')
            .to_owned();

        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let api_timeouts = ApiTimeouts {
            request_secs: parse_or(&lookup, "API_REQUEST_TIMEOUT_SECS", DEFAULT_API_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_or(&lookup, "API_CONNECT_TIMEOUT_SECS", DEFAULT_API_CONNECT_TIMEOUT_SECS)?,
        };
        let session_ttl = Duration::from_secs(parse_or(&lookup, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?);

        let cookie_secure =
            bool_or(&lookup, "COOKIE_SECURE")?.unwrap_or_else(|| stagecraft_host.starts_with("https://"));

        let dev_auth = if bool_or(&lookup, "DEV_AUTH_BYPASS")?.unwrap_or(false) {
            let access_token = lookup("DEV_ACCESS_TOKEN")
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("DEV_ACCESS_TOKEN"))?;
            Some(DevAuth { access_token })
        } else {
            None
        };

        Ok(Self { port, stagecraft_host, api_timeouts, session_ttl, cookie_secure, dev_auth })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn bool_or(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<bool>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => parse_bool(&raw)
            .map(Some)
            .ok_or(ConfigError::Invalid { key, value: raw }),
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
