//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Store backend kind.
pub const STORE_BACKENDS: [&str; 2] = ["sqlite", "memory"];

/// Job record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `sqlite` or `memory`.
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// SQLite database file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Name of the durable job index set.
    #[serde(default = "default_job_set_name")]
    pub job_set_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
            job_set_name: default_job_set_name(),
        }
    }
}

fn default_store_backend() -> String {
    "sqlite".to_string()
}

fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pingd")
        .join("pingd.db")
}

fn default_job_set_name() -> String {
    "jobs_set".to_string()
}

/// Reconciliation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_reconcile_interval_secs")]
    pub reconcile_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            reconcile_interval_secs: default_reconcile_interval_secs(),
        }
    }
}

impl SchedulerConfig {
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_secs)
    }
}

fn default_reconcile_interval_secs() -> u64 {
    10
}

/// HTTP probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Used for tasks that carry no timeout.
    #[serde(default = "default_probe_timeout_secs")]
    pub default_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: default_probe_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

fn default_probe_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("pingd/{}", env!("CARGO_PKG_VERSION"))
}

/// Secrets.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Record encryption key: 32 raw characters or 64 hex digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Log output format.
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for daily-rolled log files. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
