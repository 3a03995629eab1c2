//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use news_digest_core::RefreshPolicy;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub digest_path: PathBuf,
    pub status_path: PathBuf,
    pub users_path: PathBuf,
    /// `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
    pub static_dir: Option<PathBuf>,
    pub refresh_policy: RefreshPolicy,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5001".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>().map_err(|e| {
                    ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);

        // --- Load Data File Locations ---
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let data_file = |var: &str, default: &str| {
            std::env::var(var)
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join(default))
        };
        let digest_path = data_file("DIGEST_FILE", "latest_digest.json");
        let status_path = data_file("STATUS_FILE", "service_status.json");
        let users_path = data_file("USERS_FILE", "users.json");

        // --- Load Client Refresh Settings ---
        let defaults = RefreshPolicy::default();
        let refresh_policy = RefreshPolicy {
            interval: parse_var("REFRESH_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.interval),
            suppress_while_scrolling: parse_var("SUPPRESS_REFRESH_WHILE_SCROLLING")?
                .unwrap_or(defaults.suppress_while_scrolling),
            scroll_idle: parse_var("SCROLL_IDLE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.scroll_idle),
        };
        if refresh_policy.interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "REFRESH_INTERVAL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            log_level,
            digest_path,
            status_path,
            users_path,
            cors_origin,
            static_dir,
            refresh_policy,
        })
    }
}

/// Reads an optional variable and parses it, rejecting unparsable values.
fn parse_var<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(None),
    }
}
