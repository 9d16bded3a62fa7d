//! Endpoint configuration.
//!
//! Defaults are embedded from `config/default.toml`. A TOML file can replace
//! them, and the `MAP_DRAWER_BASE_URL` environment variable overrides the
//! base URL last.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides [`SubmissionConfig::base_url`].
pub const BASE_URL_ENV: &str = "MAP_DRAWER_BASE_URL";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors from loading the endpoint configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`SubmissionConfig`].
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The base URL is not an `http(s)` URL.
    #[error("Invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),
}

/// Where and how to reach the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionConfig {
    /// Scheme, host and port, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    #[serde(default = "default_send_path")]
    pub send_path: String,
    #[serde(default = "default_proxy_path")]
    pub proxy_path: String,
    /// Per-request timeout. Requests never time out when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_send_path() -> String {
    "/send_multiple_rectangles".to_string()
}

fn default_proxy_path() -> String {
    "/proxy_realtor_request".to_string()
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        toml::de::from_str(DEFAULT_CONFIG)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
    }
}

impl SubmissionConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or the base URL is
    /// not an `http(s)` URL.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(input)?;
        config.validate()
    }

    /// Loads the config from `path`, or the embedded defaults when `None`,
    /// then applies the [`BASE_URL_ENV`] override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or the
    /// resulting base URL is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::debug!("Loading endpoint config from {}", path.display());
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        config.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    /// Replaces the base URL when `base_url` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the resulting base URL is
    /// not an `http(s)` URL.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(base_url) = base_url.filter(|u| !u.trim().is_empty()) {
            log::debug!("Overriding endpoint base URL with {base_url}");
            self.base_url = base_url.trim().to_string();
        }
        self.validate()
    }

    /// Full URL of the rectangle submission endpoint.
    #[must_use]
    pub fn send_url(&self) -> String {
        self.join(&self.send_path)
    }

    /// Full URL of the proxy endpoint.
    #[must_use]
    pub fn proxy_url(&self) -> String {
        self.join(&self.proxy_path)
    }

    fn join(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
            Ok(self)
        } else {
            Err(ConfigError::InvalidBaseUrl(self.base_url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let config = SubmissionConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(
            config.send_url(),
            "http://127.0.0.1:5000/send_multiple_rectangles"
        );
        assert_eq!(
            config.proxy_url(),
            "http://127.0.0.1:5000/proxy_realtor_request"
        );
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn paths_default_when_omitted() {
        let config = SubmissionConfig::from_toml(
            "base_url = \"https://drawer.example.com/api/\"\ntimeout_secs = 30\n",
        )
        .unwrap();
        assert_eq!(
            config.send_url(),
            "https://drawer.example.com/api/send_multiple_rectangles"
        );
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn override_replaces_base_url() {
        let config = SubmissionConfig::default()
            .with_base_url_override(Some("http://10.0.0.2:8080".to_string()))
            .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8080");

        let unchanged = SubmissionConfig::default()
            .with_base_url_override(Some("  ".to_string()))
            .unwrap();
        assert_eq!(unchanged.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn loads_config_file() {
        let path = std::env::temp_dir().join("map_drawer_submission_config.toml");
        std::fs::write(
            &path,
            "base_url = \"http://drawer.internal:9000\"\nsend_path = \"rects\"\n",
        )
        .unwrap();

        let config = SubmissionConfig::load(Some(&path)).unwrap();
        assert_eq!(config.send_path, "rects");
        assert_eq!(config.proxy_path, "/proxy_realtor_request");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn environment_overrides_embedded_base_url() {
        // SAFETY: no other test in this crate reads or writes this variable
        // while expecting a particular value.
        unsafe { std::env::set_var(BASE_URL_ENV, "http://10.1.2.3:7000/") };
        let config = SubmissionConfig::load(None);
        unsafe { std::env::remove_var(BASE_URL_ENV) };

        let config = config.unwrap();
        assert_eq!(config.base_url, "http://10.1.2.3:7000/");
        assert_eq!(
            config.send_url(),
            "http://10.1.2.3:7000/send_multiple_rectangles"
        );
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let path = std::env::temp_dir().join("map_drawer_submission_missing.toml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            SubmissionConfig::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            SubmissionConfig::from_toml("base_url = \"ftp://example.com\""),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            SubmissionConfig::from_toml("base_url = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
