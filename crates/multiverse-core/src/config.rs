//! Configuration loading and typed config structures for the multiverse
//! engine.
//!
//! The canonical configuration lives in `multiverse-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every key is optional; a missing key takes the documented default.
//!
//! Generation never reads this module. The epoch duration is handed to the
//! clock and generator by the engine.

use std::path::Path;

use serde::Deserialize;

use crate::generator::DEFAULT_EPOCH_DURATION_MS;

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

    /// A value parsed but is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `multiverse-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MultiverseConfig {
    /// Epoch timing.
    #[serde(default)]
    pub epoch: EpochConfig,

    /// Enrichment behavior.
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Archive persistence.
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Display surface server.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Share link settings.
    #[serde(default)]
    pub share: ShareConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MultiverseConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `EPOCH_DURATION_MS` overrides `epoch.duration_ms`
    /// - `POLL_INTERVAL_MS` overrides `epoch.poll_interval_ms`
    /// - `DRAGONFLY_URL` overrides `archive.dragonfly_url`
    /// - `OBSERVER_PORT` overrides `observer.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the
    /// environment. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override values with environment variables when set and parseable.
    pub fn apply_env_overrides(&mut self) {
        if let Some(val) = env_u64("EPOCH_DURATION_MS") {
            self.epoch.duration_ms = val;
        }
        if let Some(val) = env_u64("POLL_INTERVAL_MS") {
            self.epoch.poll_interval_ms = val;
        }
        if let Ok(val) = std::env::var("DRAGONFLY_URL") {
            self.archive.dragonfly_url = val;
        }
        if let Some(port) = std::env::var("OBSERVER_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
        {
            self.observer.port = port;
        }
    }

    /// Reject out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero epoch duration, a zero
    /// poll interval, or an empty archive storage key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epoch.duration_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "epoch.duration_ms must be at least 1".to_owned(),
            });
        }
        if self.epoch.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "epoch.poll_interval_ms must be at least 1".to_owned(),
            });
        }
        if self.archive.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "archive.storage_key must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Epoch timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpochConfig {
    /// Epoch length in milliseconds.
    #[serde(default = "default_epoch_duration_ms")]
    pub duration_ms: u64,

    /// How often the clock is polled for a boundary crossing.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_epoch_duration_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Enrichment behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnrichmentConfig {
    /// Whether enrichment is requested at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Image reference used when image generation yields nothing.
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Upper bound on one enrichment round trip.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            placeholder_image: default_placeholder_image(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Which archive store to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveBackendKind {
    /// One JSON file per key under `archive.path`.
    #[default]
    File,
    /// Process memory only; lost on restart.
    Memory,
    /// Dragonfly (Redis-compatible) at `archive.dragonfly_url`.
    Dragonfly,
}

/// Archive persistence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArchiveConfig {
    /// Store backend.
    #[serde(default)]
    pub backend: ArchiveBackendKind,

    /// Directory for the file backend.
    #[serde(default = "default_archive_path")]
    pub path: String,

    /// Key the serialized archive is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Dragonfly (Redis-compatible) URL.
    #[serde(default = "default_dragonfly_url")]
    pub dragonfly_url: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            backend: ArchiveBackendKind::default(),
            path: default_archive_path(),
            storage_key: default_storage_key(),
            dragonfly_url: default_dragonfly_url(),
        }
    }
}

/// Display surface server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Bind address.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Share link settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShareConfig {
    /// Public URL of the display surface, included in share payloads.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_epoch_duration_ms() -> u64 {
    DEFAULT_EPOCH_DURATION_MS
}

const fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_placeholder_image() -> String {
    "https://picsum.photos/seed/multiverse/1024/768".to_owned()
}

const fn default_request_timeout_ms() -> u64 {
    60_000
}

fn default_archive_path() -> String {
    "data".to_owned()
}

fn default_storage_key() -> String {
    "saved_universes".to_owned()
}

fn default_dragonfly_url() -> String {
    "redis://localhost:6379".to_owned()
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MultiverseConfig::default();
        assert_eq!(config.epoch.duration_ms, 1_800_000);
        assert_eq!(config.epoch.poll_interval_ms, 1_000);
        assert!(config.enrichment.enabled);
        assert_eq!(config.enrichment.request_timeout_ms, 60_000);
        assert_eq!(config.archive.backend, ArchiveBackendKind::File);
        assert_eq!(config.archive.storage_key, "saved_universes");
        assert_eq!(config.observer.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
epoch:
  duration_ms: 60000
  poll_interval_ms: 250

enrichment:
  enabled: false
  placeholder_image: "https://example.test/blank.png"
  request_timeout_ms: 5000

archive:
  backend: dragonfly
  path: "/var/lib/multiverse"
  storage_key: "archive_v2"
  dragonfly_url: "redis://testhost:6379"

observer:
  host: "127.0.0.1"
  port: 9090

share:
  base_url: "https://multiverse.example.test"

logging:
  level: "debug"
  format: json
"#;

        let config = MultiverseConfig::parse_without_env(yaml).unwrap();
        assert_eq!(config.epoch.duration_ms, 60_000);
        assert_eq!(config.epoch.poll_interval_ms, 250);
        assert!(!config.enrichment.enabled);
        assert_eq!(config.archive.backend, ArchiveBackendKind::Dragonfly);
        assert_eq!(config.archive.storage_key, "archive_v2");
        assert_eq!(config.observer.host, "127.0.0.1");
        assert_eq!(config.observer.port, 9090);
        assert_eq!(
            config.share.base_url.as_deref(),
            Some("https://multiverse.example.test")
        );
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = MultiverseConfig::parse_without_env("epoch:\n  duration_ms: 5000\n").unwrap();
        assert_eq!(config.epoch.duration_ms, 5_000);
        // Everything else uses defaults
        assert_eq!(config.epoch.poll_interval_ms, 1_000);
        assert_eq!(config.archive.path, "data");
    }

    #[test]
    fn parse_empty_yaml() {
        let config = MultiverseConfig::parse_without_env("").unwrap();
        assert_eq!(config, MultiverseConfig::default());
    }

    #[test]
    fn zero_durations_are_rejected() {
        let config = MultiverseConfig::parse_without_env("epoch:\n  duration_ms: 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));

        let config =
            MultiverseConfig::parse_without_env("epoch:\n  poll_interval_ms: 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_backend_is_a_yaml_error() {
        let result = MultiverseConfig::parse_without_env("archive:\n  backend: tape\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("multiverse-config.yaml");
        if path.exists() {
            let config = MultiverseConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
