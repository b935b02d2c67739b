//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with AULA_)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! Secrets like the database connection string and the session signing key
//! stay in environment variables, not in the config file.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Global application configuration
pub static APP_CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    })
});

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub base_url: String,
    /// Insert the demo users/post/event on startup.
    pub seed_on_start: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Aula".to_string(),
            base_url: "http://localhost:8080".to_string(),
            seed_on_start: false,
        }
    }
}

/// Media store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory uploaded files are written into.
    pub upload_dir: String,
    /// URL prefix recorded in media rows and served by the static handler.
    pub public_path: String,
    /// Directory holding the editable static legal pages.
    pub static_pages_dir: String,
    /// Upload size cap in bytes.
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            public_path: "/uploads".to_string(),
            static_pages_dir: "static_pages".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Posts shown per dashboard page.
    pub posts_per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { posts_per_page: 10 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub storage: StorageConfig,
    pub pagination: PaginationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("AULA").separator("__"))
            .build()?
            .try_deserialize()
    }
}

pub fn get() -> &'static AppConfig {
    &APP_CONFIG
}

/// Forces the lazy load so config problems surface at boot, not first use.
pub fn init() {
    let config = get();
    log::info!(
        "Configuration loaded: site '{}', uploads in '{}'",
        config.site.name,
        config.storage.upload_dir
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.pagination.posts_per_page, 10);
        assert_eq!(config.storage.public_path, "/uploads");
        assert!(!config.site.seed_on_start);
    }
}
