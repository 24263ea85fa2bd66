use anyhow::{anyhow, Context, Result};

use crate::lifecycle::StatusAuthorization;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub status_authorization: StatusAuthorization,
    pub notification_webhook_url: Option<String>,
    pub notification_webhook_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            status_authorization: match std::env::var("STATUS_AUTHORIZATION") {
                Ok(value) => value
                    .parse::<StatusAuthorization>()
                    .map_err(|e: String| anyhow!(e))?,
                Err(_) => StatusAuthorization::default(),
            },
            notification_webhook_url: std::env::var("NOTIFICATION_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            notification_webhook_timeout_secs: parse_env("NOTIFICATION_WEBHOOK_TIMEOUT_SECS", 10)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
