//! Client configuration: defaults, an optional file, then environment overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[cfg(not(target_arch = "wasm32"))]
use std::{env, fs, path::PathBuf};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api/";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_POST_LOGIN_PATH: &str = "/dashboard";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_COURSE_CATEGORIES: &[&str] = &[
    "programming",
    "web-development",
    "data-science",
    "design",
    "business",
    "marketing",
];

/// Errors raised while loading a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML/JSON for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The file extension is neither yaml nor json.
    #[error("unsupported configuration format '{0}'; use 'yaml' or 'json'")]
    UnsupportedFormat(String),

    /// An override variable holds a value of the wrong type.
    #[error("invalid {name} value: {reason}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The resolved configuration failed validation.
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Runtime settings for the CourseHub web client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL the API paths (`auth/login`, `courses`, ...) are appended to.
    pub api_base_url: String,

    /// Upper bound for a single API request, in milliseconds.
    pub request_timeout_ms: u64,

    /// Where a successful sign-in navigates to.
    pub post_login_path: String,

    /// Logging level for native hosts.
    pub log_level: String,

    /// Tags a course may be filed under.
    pub course_categories: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    ///
    /// The API base URL can be baked in at build time with
    /// `COURSEHUB_API_BASE_URL`, which is how wasm builds pick it up.
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: option_env!("COURSEHUB_API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            post_login_path: DEFAULT_POST_LOGIN_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            course_categories: DEFAULT_COURSE_CATEGORIES
                .iter()
                .map(|category| (*category).to_string())
                .collect(),
        }
    }

    /// Request timeout as a [`std::time::Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a `.yaml`/`.yml` or `.json` file.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the file cannot be read or parsed, an
    /// override variable is malformed, or the result fails [`Self::validate`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                let content = fs::read_to_string(&path)?;
                let extension = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                match extension.as_str() {
                    "yaml" | "yml" => serde_yml::from_str(&content)
                        .map_err(|err| ConfigError::Parse(err.to_string()))?,
                    "json" => serde_json::from_str(&content)
                        .map_err(|err| ConfigError::Parse(err.to_string()))?,
                    other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
                }
            }
            None => Self::with_defaults(),
        };

        config.apply_env_overrides()?;
        config.validate().map_err(ConfigError::Invalid)?;

        tracing::debug!(
            api_base_url = %config.api_base_url,
            request_timeout_ms = config.request_timeout_ms,
            "client configuration loaded"
        );
        Ok(config)
    }

    /// Use environment variables only where values are still at their defaults.
    #[cfg(not(target_arch = "wasm32"))]
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let defaults = Self::with_defaults();

        if self.api_base_url == defaults.api_base_url {
            if let Ok(url) = env::var("COURSEHUB_API_BASE_URL") {
                self.api_base_url = url;
            }
        }
        if self.request_timeout_ms == defaults.request_timeout_ms {
            if let Ok(raw) = env::var("COURSEHUB_REQUEST_TIMEOUT_MS") {
                self.request_timeout_ms =
                    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                        name: "COURSEHUB_REQUEST_TIMEOUT_MS",
                        reason: "must be a whole number of milliseconds".to_string(),
                    })?;
            }
        }
        if self.post_login_path == defaults.post_login_path {
            if let Ok(path) = env::var("COURSEHUB_POST_LOGIN_PATH") {
                self.post_login_path = path;
            }
        }
        if self.log_level == defaults.log_level {
            if let Ok(level) = env::var("COURSEHUB_LOG_LEVEL") {
                self.log_level = level;
            }
        }
        Ok(())
    }

    /// Validate the configuration, collecting every problem found.
    ///
    /// # Errors
    /// Returns the list of problems when any field is unusable.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.api_base_url.trim().is_empty() {
            errors.push("API base URL must not be empty.".to_string());
        } else if let Err(err) = Url::parse(&self.api_base_url) {
            errors.push(format!(
                "API base URL '{}' is not a valid URL: {err}",
                self.api_base_url
            ));
        }

        if self.request_timeout_ms == 0 {
            errors.push("Request timeout must be greater than 0.".to_string());
        }

        if !self.post_login_path.starts_with('/') {
            errors.push(format!(
                "Post-login path '{}' must start with '/'.",
                self.post_login_path
            ));
        }

        if self.course_categories.is_empty() {
            errors.push("At least one course category must be configured.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn cleanup_env_vars() {
        unsafe {
            std::env::remove_var("COURSEHUB_API_BASE_URL");
            std::env::remove_var("COURSEHUB_REQUEST_TIMEOUT_MS");
            std::env::remove_var("COURSEHUB_POST_LOGIN_PATH");
            std::env::remove_var("COURSEHUB_LOG_LEVEL");
        }
    }

    #[test]
    #[serial]
    fn test_config_with_defaults() {
        cleanup_env_vars();
        let config = ClientConfig::with_defaults();

        assert_eq!(config.request_timeout_ms, 15_000);
        assert_eq!(config.post_login_path, "/dashboard");
        assert_eq!(config.log_level, "info");
        assert!(config.course_categories.contains(&"programming".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_config_without_file_uses_defaults() {
        cleanup_env_vars();
        let config = ClientConfig::load_config(None).unwrap();
        assert_eq!(config, ClientConfig::with_defaults());
    }

    #[test]
    #[serial]
    fn test_load_yaml_config() {
        cleanup_env_vars();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.yaml");
        fs::write(
            &path,
            "api_base_url: https://api.example.com/v1/\nrequest_timeout_ms: 5000\npost_login_path: /\n",
        )
        .unwrap();

        let config = ClientConfig::load_config(Some(path)).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/v1/");
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.post_login_path, "/");
        // Fields missing from the file keep their defaults.
        assert_eq!(config.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_load_json_config() {
        cleanup_env_vars();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.json");
        fs::write(&path, r#"{"course_categories": ["math"]}"#).unwrap();

        let config = ClientConfig::load_config(Some(path)).unwrap();
        assert_eq!(config.course_categories, vec!["math".to_string()]);
    }

    #[test]
    #[serial]
    fn test_unsupported_format() {
        cleanup_env_vars();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.toml");
        fs::write(&path, "api_base_url = \"x\"").unwrap();

        let err = ClientConfig::load_config(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "toml"));
    }

    #[test]
    #[serial]
    fn test_missing_file_is_io_error() {
        cleanup_env_vars();
        let err = ClientConfig::load_config(Some("/definitely/not/here.yaml".into())).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    #[serial]
    fn test_env_overrides_defaults() {
        cleanup_env_vars();
        unsafe {
            std::env::set_var("COURSEHUB_API_BASE_URL", "https://lms.example.org/api/");
            std::env::set_var("COURSEHUB_REQUEST_TIMEOUT_MS", "2500");
            std::env::set_var("COURSEHUB_LOG_LEVEL", "debug");
        }

        let config = ClientConfig::load_config(None).unwrap();
        assert_eq!(config.api_base_url, "https://lms.example.org/api/");
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.log_level, "debug");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_env() {
        cleanup_env_vars();
        unsafe {
            std::env::set_var("COURSEHUB_REQUEST_TIMEOUT_MS", "soon");
        }

        let err = ClientConfig::load_config(None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: "COURSEHUB_REQUEST_TIMEOUT_MS",
                ..
            }
        ));

        cleanup_env_vars();
    }

    #[test]
    fn test_validate_collects_all_problems() {
        let config = ClientConfig {
            api_base_url: String::new(),
            request_timeout_ms: 0,
            post_login_path: "dashboard".to_string(),
            log_level: "info".to_string(),
            course_categories: Vec::new(),
        };

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_validate_rejects_unparseable_url() {
        let config = ClientConfig {
            api_base_url: "not a url".to_string(),
            ..ClientConfig::with_defaults()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors[0].contains("not a valid URL"));
    }
}
