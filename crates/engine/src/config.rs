//! Runtime configuration read from the environment.
//!
//! Parsing goes through a key lookup function so it can be tested without
//! mutating the process environment.

use std::fmt;
use std::time::Duration;

use event_recorder_domain::RetentionInterval;

use crate::api::auth::ApiKey;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is undefined.")]
    Missing(&'static str),

    #[error("{key} is invalid: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            key,
            message: message.to_string(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub retention: RetentionConfig,
    /// Shared API key guarding ingestion. `None` disables authorization.
    pub api_key: Option<ApiKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Postgres connection parameters.
#[derive(Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetentionConfig {
    /// Events older than this (counted from the start of the current day) are deleted.
    pub interval: RetentionInterval,
    /// Whether the daily deletion task runs in this process.
    pub enabled: bool,
}

impl RecorderConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// Required: `DB_HOST`, `DB_PORT`, `DB_USERNAME`, `DB_PASSWORD`, `DB_NAME`.
    /// Everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let server = ServerConfig {
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: match get("SERVER_PORT").or_else(|| get("PORT")) {
                Some(port) => parse(&port, "SERVER_PORT")?,
                None => 3000,
            },
        };

        let database = DatabaseConfig {
            host: require("DB_HOST")?,
            port: parse(&require("DB_PORT")?, "DB_PORT")?,
            username: require("DB_USERNAME")?,
            password: require("DB_PASSWORD")?,
            name: require("DB_NAME")?,
            max_connections: match get("DB_MAX_CONNECTIONS") {
                Some(n) => parse(&n, "DB_MAX_CONNECTIONS")?,
                None => 5,
            },
            acquire_timeout: match get("DB_ACQUIRE_TIMEOUT_SECS") {
                Some(secs) => Duration::from_secs(parse(&secs, "DB_ACQUIRE_TIMEOUT_SECS")?),
                None => Duration::from_secs(10),
            },
        };

        let interval = match get("RETENTION_INTERVAL").or_else(|| get("INTERVAL")) {
            Some(raw) => RetentionInterval::new(raw)
                .map_err(|e| ConfigError::invalid("RETENTION_INTERVAL", e))?,
            None => RetentionInterval::default(),
        };
        let retention = RetentionConfig {
            interval,
            enabled: match get("RETENTION_JOB_ENABLED") {
                Some(flag) => parse_bool(&flag, "RETENTION_JOB_ENABLED")?,
                None => true,
            },
        };

        let api_key = get("API_KEY").map(ApiKey::new);

        Ok(Self {
            server,
            database,
            retention,
            api_key,
        })
    }
}

fn parse<T>(value: &str, key: &'static str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|e| ConfigError::invalid(key, e))
}

fn parse_bool(value: &str, key: &'static str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid(key, format!("expected a boolean, got {other:?}"))),
    }
}
