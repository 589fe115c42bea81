//! Application settings loaded via OrthoConfig.
//!
//! Every field can come from a `PROFILE_*` environment variable, a CLI flag
//! or a config file. Unset optional fields fall back to the constants below.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use profile_backend::domain::{ReadPolicy, ReadPolicyParseError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CACHE_MAX_ACTIVE: u32 = 12_000;
const DEFAULT_CACHE_IDLE_TIMEOUT_SECS: u64 = 240;
const DEFAULT_CACHE_CONNECTION_TIMEOUT_MS: u64 = 1_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error(transparent)]
    ReadPolicy(#[from] ReadPolicyParseError),
}

/// Runtime configuration for the profile service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROFILE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one, users live in process memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Redis URL. Without one, caching is disabled.
    pub redis_url: Option<String>,
    /// Upper bound on pooled Redis connections.
    pub cache_max_active: Option<u32>,
    /// Redis connections kept warm.
    pub cache_min_idle: Option<u32>,
    /// Seconds before an idle Redis connection is closed.
    pub cache_idle_timeout_secs: Option<u64>,
    /// Milliseconds to wait for a Redis connection.
    pub cache_connection_timeout_ms: Option<u64>,
    /// HS256 signing secret for bearer tokens.
    pub token_secret: Option<String>,
    /// Permit a random per-process secret when none is configured.
    #[ortho_config(default = false)]
    pub allow_ephemeral_token_secret: bool,
    /// `read-through` (default) or `cache-aside`.
    pub read_policy: Option<String>,
    /// Per-request deadline for service calls.
    pub request_timeout_ms: Option<u64>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn cache_max_active(&self) -> u32 {
        self.cache_max_active.unwrap_or(DEFAULT_CACHE_MAX_ACTIVE)
    }

    pub fn cache_idle_timeout(&self) -> Duration {
        Duration::from_secs(
            self.cache_idle_timeout_secs
                .unwrap_or(DEFAULT_CACHE_IDLE_TIMEOUT_SECS),
        )
    }

    pub fn cache_connection_timeout(&self) -> Duration {
        Duration::from_millis(
            self.cache_connection_timeout_ms
                .unwrap_or(DEFAULT_CACHE_CONNECTION_TIMEOUT_MS),
        )
    }

    pub fn read_policy(&self) -> Result<ReadPolicy, SettingsError> {
        match self.read_policy.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(ReadPolicy::default()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS))
    }
}
