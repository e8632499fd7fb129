use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Items fetched on the compact (home page) view
pub const COMPACT_FETCH_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// JSON document read by the file backend
    pub data_file: String,
    /// Base URL used to build record and list-view links
    pub instance_url: String,
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    #[serde(default)]
    pub fetch_offset: usize,
    /// Show only a handful of items, like the home page component
    #[serde(default)]
    pub compact: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_fetch_limit() -> usize {
    200
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: Self::config_dir()
                .map(|dir| dir.join("approvals.json").to_string_lossy().to_string())
                .unwrap_or_else(|| "approvals.json".to_string()),
            instance_url: "https://login.salesforce.com".to_string(),
            fetch_limit: default_fetch_limit(),
            fetch_offset: 0,
            compact: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".approvals-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn storage_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("storage.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("approvals-tui.log"))
    }

    pub fn load() -> Option<Config> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Load the config, writing the defaults on first run
    pub fn load_or_init() -> Config {
        if let Some(config) = Self::load() {
            return config;
        }

        let config = Config::default();
        if let Err(e) = config.save() {
            tracing::warn!(error = %e, "could not save default config");
        }
        config
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Page size actually requested from the backend
    pub fn effective_fetch_limit(&self) -> usize {
        if self.compact {
            COMPACT_FETCH_LIMIT
        } else {
            self.fetch_limit
        }
    }
}
