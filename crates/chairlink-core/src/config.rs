//! Controller configuration
//!
//! The device address is process-wide configuration, resolved once at
//! startup and never re-resolved per request: set it in code, in a TOML
//! settings file, or through the environment.

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Environment variable naming the device base URL.
pub const DEVICE_URL_ENV: &str = "CHAIRLINK_DEVICE_URL";

fn default_request_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_warning_duration() -> Duration {
    Duration::from_secs(10)
}

fn default_true() -> bool {
    true
}

/// Configuration for the dispatch controller and its transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Base URL of the device, e.g. "http://192.168.4.1".
    pub device_url: String,
    /// Per-request deadline.
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,
    /// Connection establishment deadline.
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub connect_timeout: Duration,
    /// How long an armed warning stays visible without dismissal.
    #[serde(with = "humantime_serde", default = "default_warning_duration")]
    pub warning_duration: Duration,
    /// Whether gesture mode owns the motors at session start.
    #[serde(default = "default_true")]
    pub gesture_enabled_at_start: bool,
    /// Whether the warning is shown for a grace period at session start.
    #[serde(default)]
    pub warning_visible_at_start: bool,
}

impl ControllerConfig {
    /// Configuration for `device_url` with every other field at its default.
    pub fn new(device_url: impl Into<String>) -> Self {
        Self {
            device_url: device_url.into(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            warning_duration: default_warning_duration(),
            gesture_enabled_at_start: true,
            warning_visible_at_start: false,
        }
    }

    /// Load configuration from a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), device_url = %config.device_url, "loaded controller config");
        Ok(config)
    }

    /// Build configuration from the environment: the device URL comes from
    /// [`DEVICE_URL_ENV`], everything else stays at its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let device_url =
            env::var(DEVICE_URL_ENV).map_err(|_| ConfigError::MissingEnv(DEVICE_URL_ENV))?;
        let config = Self::new(device_url);
        config.validate()?;
        Ok(config)
    }

    /// The validated device URL.
    pub fn device_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.device_url).map_err(|source| ConfigError::InvalidDeviceUrl {
            url: self.device_url.clone(),
            source,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.device_url().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let config = ControllerConfig::new("http://192.168.4.1");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.warning_duration, Duration::from_secs(10));
        assert!(config.gesture_enabled_at_start);
        assert!(!config.warning_visible_at_start);
    }

    #[test]
    fn parses_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
device_url = "http://10.0.0.7"
warning_duration = "15s"
gesture_enabled_at_start = false
warning_visible_at_start = true
"#
        )
        .unwrap();

        let config = ControllerConfig::load(file.path()).unwrap();
        assert_eq!(config.device_url, "http://10.0.0.7");
        assert_eq!(config.warning_duration, Duration::from_secs(15));
        // Unset fields fall back to defaults.
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(!config.gesture_enabled_at_start);
        assert!(config.warning_visible_at_start);
    }

    #[test]
    fn load_rejects_bad_device_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"device_url = "not a url""#).unwrap();
        let err = ControllerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDeviceUrl { .. }));
    }

    #[test]
    fn from_env_reads_device_url() {
        env::set_var(DEVICE_URL_ENV, "http://172.16.0.9");
        let config = ControllerConfig::from_env().unwrap();
        env::remove_var(DEVICE_URL_ENV);
        assert_eq!(config.device_url, "http://172.16.0.9");
        assert_eq!(config.warning_duration, Duration::from_secs(10));
    }
}
