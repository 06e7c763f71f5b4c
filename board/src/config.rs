//! Client configuration: where the API lives, how long to wait, and
//! where durable state goes.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chirp_api::{ApiSettings, DEFAULT_BASE_URL};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CHIRP_CONFIG";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// TOML-backed settings. Every field has a default, so an empty file and
/// a missing file mean the same thing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the remote thought-board API.
    pub base_url: Url,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connection-establishment timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Directory holding the token and liked-thoughts files.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL parses"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load from `$CHIRP_CONFIG` when set, else from
    /// `<platform config dir>/chirp/config.toml`. A missing file yields
    /// the defaults; an unreadable or malformed file is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Connection settings for the API client.
    #[must_use]
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("chirp").join("config.toml"))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chirp")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_point_at_the_hosted_api() {
        let config = Config::default();
        assert_eq!(config.base_url.as_str(), format!("{DEFAULT_BASE_URL}/"));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(config.data_dir.ends_with("chirp"));
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://localhost:8080\"").unwrap();
        writeln!(file, "timeout_secs = 5").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.timeout_secs, Config::default().timeout_secs);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = not quoted").unwrap();

        match Config::load_from(file.path()) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        match Config::load_from(&dir.path().join("nope.toml")) {
            Err(ConfigError::Read { .. }) => {}
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn durations_convert_into_api_settings() {
        let config = Config {
            timeout_secs: 7,
            connect_timeout_secs: 3,
            ..Config::default()
        };
        let settings = config.api_settings();
        assert_eq!(settings.timeout, Duration::from_secs(7));
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
    }
}
