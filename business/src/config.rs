use std::env::vars;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use thiserror::Error;

/// Where the json-server mock listens when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration from environment: {0}")]
    Env(#[from] serde_env::Error),
    #[error("could not determine a data directory; set LENDSQR_DATA_DIR")]
    NoDataDir,
    #[error("LENDSQR_API_URL must be an http(s) URL, got `{0}`")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    api_base_url: String,
    data_dir: PathBuf,
}

// Intermediate shape for environment variables, all optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    lendsqr_api_url: Option<String>,
    lendsqr_data_dir: Option<PathBuf>,
}

impl BusinessConfig {
    pub fn new(api_base_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: normalize_base_url(api_base_url.into()),
            data_dir: data_dir.into(),
        }
    }

    /// Reads `LENDSQR_API_URL` and `LENDSQR_DATA_DIR`, applying defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            lendsqr_api_url,
            lendsqr_data_dir,
        } = raw;

        let api_base_url = match lendsqr_api_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                let url = url.trim().to_owned();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidApiUrl(url));
                }
                info!("Using LENDSQR_API_URL: {url}");
                url
            }
            None => {
                info!("LENDSQR_API_URL not set, defaulting to {DEFAULT_API_BASE_URL}");
                DEFAULT_API_BASE_URL.to_owned()
            }
        };

        let data_dir = match lendsqr_data_dir {
            Some(dir) => dir,
            None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self::new(api_base_url, data_dir))
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Directory holding the persisted key-value slots.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = normalize_base_url(api_base_url.into());
        self
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

/// Platform data directory for persisted state, e.g. `~/.local/share/lendsqr`.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("lendsqr"))
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_env::from_iter;

    #[test]
    fn test_defaults_when_env_is_empty() {
        let raw: RawConfig = from_iter(vec![("LENDSQR_DATA_DIR", "/tmp/lendsqr-test")])
            .expect("RawConfig should deserialize");

        let config = BusinessConfig::from_raw(raw).unwrap();
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.data_dir(), Path::new("/tmp/lendsqr-test"));
    }

    #[test]
    fn test_api_url_from_env_drops_trailing_slash() {
        let raw: RawConfig = from_iter(vec![
            ("LENDSQR_API_URL", "http://127.0.0.1:4000/"),
            ("LENDSQR_DATA_DIR", "/tmp/lendsqr-test"),
        ])
        .expect("RawConfig should deserialize");

        let config = BusinessConfig::from_raw(raw).unwrap();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:4000");
    }

    #[test]
    fn test_api_url_must_be_http() {
        let raw: RawConfig = from_iter(vec![
            ("LENDSQR_API_URL", "localhost:3000"),
            ("LENDSQR_DATA_DIR", "/tmp/lendsqr-test"),
        ])
        .expect("RawConfig should deserialize");

        let err = BusinessConfig::from_raw(raw).unwrap_err();
        assert!(err.to_string().contains("LENDSQR_API_URL"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = BusinessConfig::new("http://a", "/a")
            .with_api_base_url("http://b/")
            .with_data_dir("/b");

        assert_eq!(config.api_base_url(), "http://b");
        assert_eq!(config.data_dir(), Path::new("/b"));
    }
}
