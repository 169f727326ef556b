//! Provider configuration
//!
//! Loaded from `~/.config/catalogsync/config.toml`, then overridden by
//! `CATALOGSYNC_*` environment variables. A missing file means defaults.

use anyhow::{Context, Result};
use declarative::ExecuteOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://app.opslevel.com/graphql";

pub const ENV_API_URL: &str = "CATALOGSYNC_API_URL";
pub const ENV_API_TOKEN: &str = "CATALOGSYNC_API_TOKEN";
pub const ENV_JOBS: &str = "CATALOGSYNC_JOBS";

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("catalogsync"))
}

/// Get the default config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    /// GraphQL endpoint of the catalog API
    pub api_url: String,
    pub api_token: Option<String>,
    /// Executor parallelism
    pub jobs: usize,
    pub dry_run: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            jobs: 4,
            dry_run: false,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("jobs", &self.jobs)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl ProviderConfig {
    /// Load from the default path with environment overrides applied
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a specific file, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config format in {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Could not write {}", path.display()))?;
        Ok(())
    }

    /// Apply `CATALOGSYNC_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }
        if let Some(jobs) = lookup(ENV_JOBS) {
            self.jobs = jobs
                .trim()
                .parse()
                .with_context(|| format!("{ENV_JOBS} must be a positive integer, got {jobs:?}"))?;
        }
        Ok(())
    }

    /// Check the configuration is usable against a remote API
    pub fn validate(&self) -> catalog::Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(catalog::Error::configuration("api_url must not be empty"));
        }
        if self.api_token.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err(catalog::Error::configuration(format!(
                "an API token is required, set api_token or {ENV_API_TOKEN}"
            )));
        }
        if self.jobs == 0 {
            return Err(catalog::Error::configuration("jobs must be at least 1"));
        }
        Ok(())
    }

    pub fn execute_options(&self) -> ExecuteOptions {
        ExecuteOptions {
            dry_run: self.dry_run,
            jobs: self.jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::ErrorCategory;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn with_token() -> ProviderConfig {
        ProviderConfig {
            api_token: Some("secret".into()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.jobs, 4);
        assert!(!config.dry_run);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ProviderConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ProviderConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config = ProviderConfig::from_toml_str("jobs = 8\ndry_run = true\n").unwrap();
        assert_eq!(config.jobs, 8);
        assert!(config.dry_run);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "jobs = \"many\"").unwrap();

        let err = ProviderConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config format"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ProviderConfig {
            jobs: 2,
            ..with_token()
        };

        config.save_to(&path).unwrap();
        assert_eq!(ProviderConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "http://localhost:8080/graphql"),
            (ENV_API_TOKEN, "tok"),
            (ENV_JOBS, "1"),
        ]
        .into_iter()
        .collect();

        let mut config = ProviderConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.api_url, "http://localhost:8080/graphql");
        assert_eq!(config.api_token.as_deref(), Some("tok"));
        assert_eq!(config.jobs, 1);
    }

    #[test]
    fn test_bad_jobs_override() {
        let mut config = ProviderConfig::default();
        let err = config
            .apply_overrides(|k| (k == ENV_JOBS).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_JOBS));
    }

    #[test]
    fn test_validate() {
        assert!(with_token().validate().is_ok());

        let err = ProviderConfig::default().validate().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let blank = ProviderConfig {
            api_token: Some("  ".into()),
            ..ProviderConfig::default()
        };
        assert!(blank.validate().is_err());

        let zero = ProviderConfig {
            jobs: 0,
            ..with_token()
        };
        assert!(zero.validate().unwrap_err().to_string().contains("jobs"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", with_token());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_execute_options() {
        let config = ProviderConfig {
            jobs: 3,
            dry_run: true,
            ..ProviderConfig::default()
        };
        let opts = config.execute_options();
        assert_eq!(opts.jobs, 3);
        assert!(opts.dry_run);
    }
}
