//! Configuration loading and typed config structures for the portal.
//!
//! The configuration lives in `gridportal.yaml` in the working directory.
//! Every field has a default, so a missing file or a partial file is
//! valid. [`PortalConfig::validate`] checks the constraints that serde
//! cannot express.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but violates a constraint.
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        /// Dotted field path (e.g. `session.refresh_interval_secs`).
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level portal configuration.
///
/// Mirrors the structure of `gridportal.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PortalConfig {
    /// Aggregation session timing.
    #[serde(default)]
    pub session: SessionConfig,

    /// Notification queue settings.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// HTTP bind address.
    #[serde(default)]
    pub server: ServerSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PortalConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override the server bind address:
    /// - `GRIDPORTAL_HOST` overrides `server.host`
    /// - `GRIDPORTAL_PORT` overrides `server.port` (ignored unless a valid port)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.server.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Check constraints on parsed values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "session.refresh_interval_secs",
                message: String::from("must be > 0"),
            });
        }
        if self.notifications.lifetime_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "notifications.lifetime_ms",
                message: String::from("must be > 0"),
            });
        }
        if self.logging.format != "pretty" && self.logging.format != "json" {
            return Err(ConfigError::Invalid {
                field: "logging.format",
                message: format!(
                    "must be \"pretty\" or \"json\", got \"{}\"",
                    self.logging.format
                ),
            });
        }
        Ok(())
    }
}

/// Aggregation session timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Seconds between automatic refreshes.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Artificial latency applied to every simulated request.
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
}

impl SessionConfig {
    /// The refresh period as a [`Duration`].
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// The simulated latency as a [`Duration`].
    pub const fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            simulated_latency_ms: default_simulated_latency_ms(),
        }
    }
}

/// Notification queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationConfig {
    /// Milliseconds a notification stays in the queue.
    #[serde(default = "default_notification_lifetime_ms")]
    pub lifetime_ms: u64,
}

impl NotificationConfig {
    /// The lifetime as a [`Duration`].
    pub const fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            lifetime_ms: default_notification_lifetime_ms(),
        }
    }
}

/// HTTP bind address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    /// Override the bind address with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("GRIDPORTAL_HOST") {
            self.host = val;
        }
        if let Some(port) = std::env::var("GRIDPORTAL_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
        {
            self.port = port;
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

const fn default_refresh_interval_secs() -> u64 {
    300
}

const fn default_simulated_latency_ms() -> u64 {
    500
}

const fn default_notification_lifetime_ms() -> u64 {
    5000
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}
