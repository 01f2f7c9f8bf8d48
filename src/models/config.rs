//! Application configuration loaded from config.yaml.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Path of the persisted catalog JSON file.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    #[serde(default)]
    pub price_feed: PriceFeedConfig,

    #[serde(default)]
    pub seed: SeedConfig,
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.json")
}

/// Price feed refresh settings.
#[derive(Debug, Deserialize, Clone)]
pub struct PriceFeedConfig {
    /// URL of the raw `[{name, price}]` price list.
    #[serde(default = "default_price_url")]
    pub url: String,

    /// Seconds between refresh attempts.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_price_url() -> String {
    "https://loot.farm/fullprice.json".to_string()
}

fn default_refresh_secs() -> u64 {
    3600 // hourly
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            url: default_price_url(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

/// Catalog seeding settings.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// URL of the raw skin descriptor JSON.
    #[serde(default = "default_seed_url")]
    pub source_url: String,

    /// Concurrent image downloads during seeding.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_seed_url() -> String {
    "https://raw.githubusercontent.com/ByMykel/CSGO-API/main/public/api/en/skins.json".to_string()
}

fn default_concurrency() -> usize {
    10
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            source_url: default_seed_url(),
            concurrency: default_concurrency(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults
    /// when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            catalog_path: default_catalog_path(),
            price_feed: PriceFeedConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}
