use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::organize::{AttachFailurePolicy, OrganizeOptions};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub organize: OrganizeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the REST API, including the `/api` prefix.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Sent as `x-api-key`. `ALBUMSORT_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:2283/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrganizeConfig {
    /// What to do with a destination album that ends up with no assets.
    #[serde(default)]
    pub attach_failure: AttachFailurePolicy,
}

impl Config {
    /// Load from `ALBUMSORT_CONFIG` if set, else the default location.
    /// A missing default file is created with default values.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os("ALBUMSORT_CONFIG").map(PathBuf::from);
        let mut config = Self::load_or_create(explicit.as_deref(), &Self::config_path())?;
        config.apply_api_key(std::env::var("ALBUMSORT_API_KEY").ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_api_key(std::env::var("ALBUMSORT_API_KEY").ok());
        Ok(config)
    }

    /// An explicit path must exist. The default path is created on first use.
    fn load_or_create(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        if default_path.exists() {
            Self::read(default_path)
        } else {
            let config = Config::default();
            config.save_to(default_path)?;
            Ok(config)
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Override the file's API key. An empty value is ignored.
    fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.server.api_key = Some(key);
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("albumsort")
            .join("config.toml")
    }

    pub fn organize_options(&self, dry_run: bool) -> OrganizeOptions {
        OrganizeOptions {
            attach_failure: self.organize.attach_failure,
            dry_run,
        }
    }
}
