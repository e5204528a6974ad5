//! # Configuration
//!
//! Application settings stored as a JSON file, with environment overrides
//! applied on top.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`AppConfig::api_base`].
pub const ENV_API_BASE: &str = "RESP_API_BASE";
/// Environment variable overriding [`AppConfig::request_timeout_secs`].
pub const ENV_REQUEST_TIMEOUT: &str = "RESP_REQUEST_TIMEOUT_SECS";

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "resp_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the inference service, e.g. `http://localhost:8000`.
    pub api_base: String,
    /// Upper bound on one inference request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Loads settings from a JSON file. A missing file yields the defaults;
    /// fields absent from the file keep their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&data)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        tracing::info!(path = %path.display(), api_base = %config.api_base, "loaded config");
        Ok(config)
    }

    /// Writes the settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(())
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup. Unparsable values are ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(api_base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.api_base = api_base.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_REQUEST_TIMEOUT),
            }
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base": "http://analysis:9000"}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.api_base, "http://analysis:9000");
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            api_base: "http://10.0.0.5:8000".to_string(),
            request_timeout_secs: 15,
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "api_base = 1").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn overrides_replace_and_ignore_garbage() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_BASE, " http://override:1234 "),
            (ENV_REQUEST_TIMEOUT, "soon"),
        ]);
        let config = AppConfig::default()
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.api_base, "http://override:1234");
        assert_eq!(config.request_timeout_secs, 60);

        let config = AppConfig::default()
            .apply_overrides(|key| (key == ENV_REQUEST_TIMEOUT).then(|| "5".to_string()));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }
}
