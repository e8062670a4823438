//! Client configuration.
//!
//! Values are layered, lowest priority first:
//! 1. built-in defaults
//! 2. `<config dir>/tella/config.toml` (or an explicit path)
//! 3. environment variables (`TELLA_API_URL`, `TELLA_LOCALE`, `TELLA_REQUEST_TIMEOUT_SECS`)
//!
//! Command-line flags are applied on top by the binary.

use crate::error::{Result, TellaError};
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const ENV_API_URL: &str = "TELLA_API_URL";
pub const ENV_LOCALE: &str = "TELLA_LOCALE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TELLA_REQUEST_TIMEOUT_SECS";

/// Settings of the chat client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root URL, without the `/api` prefix.
    pub api_url: String,
    pub locale: Locale,
    /// Whole-request timeout. `None` leaves it to the transport.
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            locale: Locale::default(),
            request_timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Returns the default config file path, e.g. ~/.config/tella/config.toml
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TellaError::config("Could not determine config directory"))?;
        Ok(config_dir.join("tella").join("config.toml"))
    }

    /// Reads a config file. A missing file is `Ok(None)`, not an error.
    pub fn load_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(target: "tella::config", "Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// Loads defaults, then the file at `path` (or the default path), then
    /// the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_config = match path {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_path() {
                Ok(default_path) => Self::load_file(&default_path)?,
                Err(err) => {
                    tracing::debug!(target: "tella::config", "No default config path: {}", err);
                    None
                }
            },
        };

        let mut config = file_config.unwrap_or_default();
        config.apply_vars(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides fields from variables looked up through `lookup`.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }

        if let Some(locale) = lookup(ENV_LOCALE).filter(|v| !v.trim().is_empty()) {
            self.locale = locale.parse().map_err(TellaError::Config)?;
        }

        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                TellaError::config(format!("{ENV_REQUEST_TIMEOUT_SECS} must be a number: {e}"))
            })?;
            self.request_timeout_secs = Some(secs);
        }

        Ok(())
    }

    /// Checks the URL scheme and strips trailing slashes.
    pub fn validate(&mut self) -> Result<()> {
        let url = self.api_url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(TellaError::config(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        self.api_url = url.to_string();
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        assert_eq!(ClientConfig::load_file(&path).unwrap(), None);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "api_url = \"https://tella.example.com/\"\nlocale = \"en\"\nrequest_timeout_secs = 30\n",
        )
        .unwrap();

        let mut config = ClientConfig::load_file(&path).unwrap().unwrap();
        config.validate().unwrap();
        assert_eq!(config.api_url, "https://tella.example.com");
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout(), None);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "api_url = [").unwrap();

        let err = ClientConfig::load_file(&path).unwrap_err();
        assert!(matches!(err, TellaError::Serialization { ref format, .. } if format == "TOML"));
    }

    #[test]
    fn test_vars_override_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://10.0.0.5:8000"),
            (ENV_LOCALE, "tr"),
            (ENV_REQUEST_TIMEOUT_SECS, "15"),
        ]);
        let mut config = ClientConfig {
            api_url: "https://tella.example.com".to_string(),
            locale: Locale::English,
            ..ClientConfig::default()
        };

        config
            .apply_vars(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_url, "http://10.0.0.5:8000");
        assert_eq!(config.locale, Locale::Turkish);
        assert_eq!(config.request_timeout_secs, Some(15));
    }

    #[test]
    fn test_bad_timeout_var() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_vars(|name| (name == ENV_REQUEST_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_validate_rejects_missing_scheme() {
        let mut config = ClientConfig {
            api_url: "localhost:8000".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config());
    }
}
