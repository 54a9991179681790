use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the station backend lives and how much to ask it for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `n` sent with every catalog search.
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: u32,
    #[serde(default = "default_flowsheet_page_size")]
    pub flowsheet_page_size: u32,
}

/// Debounce delays and search guards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_flowsheet_debounce_ms")]
    pub flowsheet_debounce_ms: u64,
    #[serde(default = "default_catalog_debounce_ms")]
    pub catalog_debounce_ms: u64,
    #[serde(default = "default_rotation_debounce_ms")]
    pub rotation_debounce_ms: u64,
    /// Local (bin/rotation) matching only runs once the combined query is at
    /// least this many characters long.
    #[serde(default = "default_min_local_query_len")]
    pub min_local_query_len: usize,
    /// Remote catalog search only runs once this many fields have text.
    #[serde(default = "default_min_remote_fields")]
    pub min_remote_fields: usize,
}

/// Identity of the DJ at the console.  Issuing it is somebody else's job;
/// we only carry it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub dj_id: Option<i64>,
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            catalog_page_size: default_catalog_page_size(),
            flowsheet_page_size: default_flowsheet_page_size(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            flowsheet_debounce_ms: default_flowsheet_debounce_ms(),
            catalog_debounce_ms: default_catalog_debounce_ms(),
            rotation_debounce_ms: default_rotation_debounce_ms(),
            min_local_query_len: default_min_local_query_len(),
            min_remote_fields: default_min_remote_fields(),
        }
    }
}

impl SearchConfig {
    pub fn flowsheet_debounce(&self) -> Duration {
        Duration::from_millis(self.flowsheet_debounce_ms)
    }

    pub fn catalog_debounce(&self) -> Duration {
        Duration::from_millis(self.catalog_debounce_ms)
    }

    pub fn rotation_debounce(&self) -> Duration {
        Duration::from_millis(self.rotation_debounce_ms)
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_catalog_page_size() -> u32 {
    25
}

fn default_flowsheet_page_size() -> u32 {
    50
}

fn default_flowsheet_debounce_ms() -> u64 {
    1000
}

fn default_catalog_debounce_ms() -> u64 {
    500
}

fn default_rotation_debounce_ms() -> u64 {
    500
}

fn default_min_local_query_len() -> usize {
    4
}

fn default_min_remote_fields() -> usize {
    2
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
