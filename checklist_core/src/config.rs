//! Configuration loader and validator for the checklist client.
//!
//! Layers, lowest priority first: built-in defaults, an optional YAML file,
//! then `CHECKLIST_API_URL` / `CHECKLIST_DEMO` environment variables.
//!
//! ```yaml
//! api:
//!   base_url: "http://localhost:5000/api/"
//! demo: false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::ChecklistError;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "CHECKLIST_CONFIG";
/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "CHECKLIST_API_URL";
/// Environment variable overriding `demo`
pub const DEMO_ENV: &str = "CHECKLIST_DEMO";
/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "checklist.yaml";
/// API location used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for ChecklistError {
    fn from(err: ConfigError) -> Self {
        ChecklistError::config(err.to_string())
    }
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    /// Run against the built-in in-memory backend instead of a server
    #[serde(default)]
    pub demo: bool,
}

/// Backend location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig::default(),
            demo: false,
        }
    }
}

impl Config {
    /// Config with a specific API base and defaults elsewhere
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Config {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            demo: false,
        }
    }

    /// The validated API base, always ending in `/` so endpoint paths join under it
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.api.base_url)
    }

    /// Apply `CHECKLIST_API_URL` / `CHECKLIST_DEMO` overrides from a lookup function.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(flag) = lookup(DEMO_ENV) {
            self.demo = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
    }
}

/// Load configuration from a YAML file and validate it.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Resolve the effective configuration from the process environment.
///
/// `default_base` replaces [`DEFAULT_API_BASE`] when given (the browser build
/// passes the page origin).
pub fn from_environment(default_base: Option<String>) -> Result<Config, ConfigError> {
    let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
    let mut cfg = match explicit {
        Some(path) => load(&path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load(Path::new(DEFAULT_CONFIG_FILE))?,
        None => {
            let mut cfg = Config::default();
            if let Some(base) = default_base {
                cfg.api.base_url = base;
            }
            cfg
        }
    };
    cfg.apply_env(|key| std::env::var(key).ok());
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.demo {
        return Ok(());
    }
    parse_base_url(&cfg.api.base_url).map(|_| ())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::Invalid("api.base_url must be non-empty".to_string()));
    }
    let mut url = Url::parse(raw)
        .map_err(|e| ConfigError::Invalid(format!("api.base_url '{raw}' is not a URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "api.base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_base_is_valid() {
        let cfg = Config::default();
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.api_base().unwrap().as_str(), DEFAULT_API_BASE);
    }

    #[test]
    fn test_base_gets_trailing_slash() {
        let cfg = Config::with_base_url("https://tracker.example.org/api");
        assert_eq!(cfg.api_base().unwrap().as_str(), "https://tracker.example.org/api/");
    }

    #[test]
    fn test_rejects_bad_urls() {
        for bad in ["", "not a url", "ftp://example.org/api/"] {
            let cfg = Config::with_base_url(bad);
            assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))), "{bad:?}");
        }
    }

    #[test]
    fn test_demo_skips_url_validation() {
        let mut cfg = Config::with_base_url("");
        cfg.demo = true;
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_yaml_schema() {
        let cfg: Config = serde_yaml::from_str("api:\n  base_url: http://10.0.0.2:5000/api\ndemo: true\n").unwrap();
        assert_eq!(cfg.api.base_url, "http://10.0.0.2:5000/api");
        assert!(cfg.demo);

        let empty: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [(API_URL_ENV, " http://backend:8080/api/ "), (DEMO_ENV, "yes")].into();
        let mut cfg = Config::default();
        cfg.apply_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.api.base_url, "http://backend:8080/api/");
        assert!(cfg.demo);

        let mut cfg = Config::default();
        cfg.apply_env(|k| (k == API_URL_ENV).then(|| "  ".to_string()));
        assert_eq!(cfg.api.base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
