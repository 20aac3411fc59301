//! Process configuration, read once at startup from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use novelfinder_observability::LogFormat;

pub const BIND_ADDR_VAR: &str = "NOVELFINDER_BIND_ADDR";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DB_MAX_CONNECTIONS_VAR: &str = "NOVELFINDER_DB_MAX_CONNECTIONS";
pub const FIXTURE_VAR: &str = "NOVELFINDER_FIXTURE";
pub const LOG_FORMAT_VAR: &str = "NOVELFINDER_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid value: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            reason: reason.to_string(),
        }
    }
}

/// Postgres connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

// The URL usually carries credentials.
impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Which catalog backend the process serves from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// In-memory catalog, optionally seeded from a JSON fixture.
    InMemory { fixture: Option<PathBuf> },
    Postgres(DatabaseConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(BIND_ADDR_VAR, e))?;

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid(LOG_FORMAT_VAR, e))?,
            None => LogFormat::default(),
        };

        let store = match get(DATABASE_URL_VAR) {
            Some(url) => {
                let max_connections = match get(DB_MAX_CONNECTIONS_VAR) {
                    Some(raw) => raw
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ConfigError::invalid(DB_MAX_CONNECTIONS_VAR, "expected a positive integer"))?,
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                StoreConfig::Postgres(DatabaseConfig {
                    url,
                    max_connections,
                })
            }
            None => StoreConfig::InMemory {
                fixture: get(FIXTURE_VAR).map(PathBuf::from),
            },
        };

        Ok(Self {
            bind_addr,
            store,
            log_format,
        })
    }

    /// Log the effective settings. Must run after tracing is installed.
    pub fn log_summary(&self) {
        match &self.store {
            StoreConfig::Postgres(db) => tracing::info!(
                bind_addr = %self.bind_addr,
                backend = "postgres",
                max_connections = db.max_connections,
                "configuration loaded"
            ),
            StoreConfig::InMemory {
                fixture: Some(path),
            } => tracing::info!(
                bind_addr = %self.bind_addr,
                backend = "in_memory",
                fixture = %path.display(),
                "configuration loaded"
            ),
            StoreConfig::InMemory { fixture: None } => tracing::warn!(
                bind_addr = %self.bind_addr,
                backend = "in_memory",
                "{DATABASE_URL_VAR} and {FIXTURE_VAR} not set; serving an empty catalog"
            ),
        }
    }
}
