//! Console configuration loading
//!
//! Each setting is taken from (in order of priority):
//! 1. `warden.json` in the Warden config directory
//! 2. Environment variables (`WARDEN_BASE_URL`, `WARDEN_TIMEOUT_SECS`)
//! 3. Built-in defaults (the backend's default port on localhost, 30 s)

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{FileTokenStore, SessionClient, UreqTransport};

/// Config filename in the Warden config directory
const CONFIG_FILE: &str = "warden.json";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:1989";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const BASE_URL_VAR: &str = "WARDEN_BASE_URL";
const TIMEOUT_VAR: &str = "WARDEN_TIMEOUT_SECS";

/// Resolved console settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// On-disk format; every field optional
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConsoleFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ConsoleConfig {
    /// Load from the config directory and process environment
    pub fn load() -> Result<Self> {
        let file = if config::config_exists(CONFIG_FILE) {
            Some(config::load_json(CONFIG_FILE)?)
        } else {
            None
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Load from a specific JSON file, still falling back to the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        let file: ConsoleFile = config::load_json_file(path)?;
        Self::resolve(Some(file), |key| std::env::var(key).ok())
    }

    fn resolve(file: Option<ConsoleFile>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let base_url = file
            .base_url
            .or_else(|| env(BASE_URL_VAR))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match file.timeout_secs {
            Some(secs) => secs,
            None => match env(TIMEOUT_VAR) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} is not a number: {}", TIMEOUT_VAR, raw))?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        let config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid backend URL: {}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Backend URL must be http or https: {}", self.base_url);
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("Request timeout must be at least one second");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the session client: ureq transport plus the on-disk token store
    pub fn connect(&self) -> Result<SessionClient> {
        let store = FileTokenStore::default_location()?;
        let transport = UreqTransport::new(&self.base_url, self.timeout());
        Ok(SessionClient::new(Box::new(transport), Box::new(store)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::resolve(None, no_env).unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_env_fallback() {
        let env = |key: &str| match key {
            "WARDEN_BASE_URL" => Some("https://admin.example.com/".to_string()),
            "WARDEN_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        };
        let config = ConsoleConfig::resolve(None, env).unwrap();
        assert_eq!(config.base_url, "https://admin.example.com");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_file_wins_over_env() {
        let file = ConsoleFile {
            base_url: Some("http://10.0.0.2:1989".to_string()),
            timeout_secs: None,
        };
        let env = |key: &str| match key {
            "WARDEN_BASE_URL" => Some("http://ignored".to_string()),
            _ => None,
        };
        let config = ConsoleConfig::resolve(Some(file), env).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:1989");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_rejects_bad_values() {
        let file = ConsoleFile {
            base_url: Some("not a url".to_string()),
            timeout_secs: None,
        };
        assert!(ConsoleConfig::resolve(Some(file), no_env).is_err());

        let file = ConsoleFile {
            base_url: Some("ftp://host".to_string()),
            timeout_secs: None,
        };
        assert!(ConsoleConfig::resolve(Some(file), no_env).is_err());

        let env = |key: &str| (key == "WARDEN_TIMEOUT_SECS").then(|| "soon".to_string());
        assert!(ConsoleConfig::resolve(None, env).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden.json");
        std::fs::write(&path, r#"{"base_url": "http://localhost:8080", "timeout_secs": 10}"#).unwrap();

        let config = ConsoleConfig::from_file(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 10);
    }
}
