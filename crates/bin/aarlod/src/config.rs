//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `aarlo.toml` in the working directory unless another path is
//! given on the command line. Every field has a sensible default so the file
//! is optional. Environment variables take precedence over file values.

use std::path::PathBuf;

use aarlo_app::config::{AarloConfig, Password};
use aarlo_domain::error::ValidationError;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Account and refresh settings.
    pub aarlo: AarloConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "aarlod=info,aarlo_app=info,aarlo_adapter_storage_json=info,aarlo_adapter_virtual=info"
                .to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("AARLO_USERNAME") {
            self.aarlo.username = val;
        }
        if let Some(val) = var("AARLO_PASSWORD") {
            self.aarlo.password = Password::new(val);
        }
        if let Some(val) = var("AARLO_NAME") {
            self.aarlo.name = val;
        }
        if let Some(val) = var("AARLO_STORAGE_DIR") {
            self.aarlo.storage_dir = PathBuf::from(val);
        }
        if let Some(hours) = var("AARLO_REFRESH_DEVICES_EVERY").and_then(|val| val.parse().ok()) {
            self.aarlo.refresh_devices_every_hours = hours;
        }
        if let Some(val) = var("AARLO_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.aarlo.validate()?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.aarlo.name, "aarlo");
        assert_eq!(config.aarlo.storage_dir, PathBuf::from("/config/.aarlo"));
        assert!(config.logging.filter.contains("aarlod=info"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.aarlo.fast_refresh_interval_secs, 60);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [aarlo]
            username = 'me@example.com'
            password = 'secret'
            name = 'home'
            storage_dir = '/tmp/aarlo'
            refresh_devices_every_hours = 3
            mode_api = 'v2'
            fast_refresh_interval_secs = 30

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.aarlo.username, "me@example.com");
        assert_eq!(config.aarlo.password.expose(), "secret");
        assert_eq!(config.aarlo.name, "home");
        assert_eq!(config.aarlo.storage_dir, PathBuf::from("/tmp/aarlo"));
        assert_eq!(
            config.aarlo.refresh_devices_every(),
            Some(Duration::from_secs(3 * 3600))
        );
        assert_eq!(config.aarlo.mode_api, aarlo_app::config::ModeApi::V2);
        assert_eq!(config.aarlo.fast_refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.aarlo.name, "aarlo");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_environment_overrides() {
        let mut config = Config::default();

        config.apply_overrides(env(&[
            ("AARLO_USERNAME", "env@example.com"),
            ("AARLO_STORAGE_DIR", "/var/lib/aarlo"),
            ("AARLO_REFRESH_DEVICES_EVERY", "6"),
            ("AARLO_LOG", "aarlod=debug"),
        ]));

        assert_eq!(config.aarlo.username, "env@example.com");
        assert_eq!(config.aarlo.storage_dir, PathBuf::from("/var/lib/aarlo"));
        assert_eq!(config.aarlo.refresh_devices_every_hours, 6);
        assert_eq!(config.logging.filter, "aarlod=debug");
    }

    #[test]
    fn should_prefer_rust_log_over_aarlo_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("AARLO_LOG", "warn"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_reload_interval() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("AARLO_REFRESH_DEVICES_EVERY", "often")]));
        assert_eq!(config.aarlo.refresh_devices_every_hours, 0);
    }

    #[test]
    fn should_reject_zero_fast_refresh() {
        let mut config = Config::default();
        config.aarlo.fast_refresh_interval_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(ValidationError::ZeroInterval { .. }))
        ));
    }
}
