//! Client configuration: environment over `~/.config/plantcare/config.toml`
//! over built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use plantcare_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, validate_base_url};
use serde::{Deserialize, Serialize};

use crate::AppError;

/// Environment override for [`Config::api_base_url`].
pub const ENV_API_URL: &str = "PLANTCARE_API_URL";
/// Environment override for [`Config::session_path`].
pub const ENV_SESSION_FILE: &str = "PLANTCARE_SESSION_FILE";
/// Environment override for [`Config::request_timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "PLANTCARE_TIMEOUT_SECS";
/// Environment override for [`Config::log_level`].
pub const ENV_LOG: &str = "PLANTCARE_LOG";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Effective client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// API origin, `http` or `https`.
    pub api_base_url: String,
    /// JSON file holding the session token.
    pub session_path: PathBuf,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Optional values read from the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// See [`Config::api_base_url`].
    pub api_base_url: Option<String>,
    /// See [`Config::session_path`].
    pub session_path: Option<PathBuf>,
    /// See [`Config::request_timeout_secs`].
    pub request_timeout_secs: Option<u64>,
    /// See [`Config::log_level`].
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            session_path: default_session_path(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Config file location: `~/.config/plantcare/config.toml`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("plantcare").join("config.toml"))
    }

    /// Loads the effective configuration from the process environment and the
    /// config file.
    ///
    /// # Errors
    /// See [`Config::resolve`] and [`read_file_config`].
    pub fn load() -> Result<Self, AppError> {
        let file = match Self::config_path() {
            Some(path) => read_file_config(&path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merges `file` and environment lookups over the defaults.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] for an invalid base URL, a non-numeric or
    /// zero timeout, or a blank log level.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let defaults = Self::default();
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let api_base_url = env(ENV_API_URL)
            .or(file.api_base_url)
            .unwrap_or(defaults.api_base_url);
        validate_base_url(&api_base_url).map_err(|error| AppError::Config(error.to_string()))?;

        let session_path = env(ENV_SESSION_FILE)
            .map(PathBuf::from)
            .or(file.session_path)
            .unwrap_or(defaults.session_path);

        let request_timeout_secs = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|error| {
                AppError::Config(format!("{ENV_TIMEOUT_SECS}={raw:?}: {error}"))
            })?,
            None => file
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
        };
        if request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        let log_level = env(ENV_LOG)
            .or(file.log_level)
            .unwrap_or(defaults.log_level);
        if log_level.trim().is_empty() {
            return Err(AppError::Config("log_level must not be blank".to_string()));
        }

        Ok(Self {
            api_base_url: api_base_url.trim().to_string(),
            session_path,
            request_timeout_secs,
            log_level: log_level.trim().to_string(),
        })
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Renders the effective configuration as TOML.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when serialization fails.
    pub fn to_toml(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|error| AppError::Config(error.to_string()))
    }
}

/// Reads the TOML config file. A missing file yields empty values; a file that
/// exists but cannot be read or parsed is an error.
///
/// # Errors
/// Returns [`AppError::ConfigRead`] or [`AppError::ConfigParse`].
pub fn read_file_config(path: &Path) -> Result<FileConfig, AppError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        }),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(source) => Err(AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn default_session_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("plantcare"))
        .unwrap_or_default()
        .join("session.json")
}
