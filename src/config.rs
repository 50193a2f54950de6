//! User configuration management
//!
//! Configuration is stored in TOML format at `~/.mcsmp/config.toml`, or in
//! `$MCSMP_CONFIG_DIR/config.toml` when that variable is set.
//!
//! # Examples
//!
//! ```no_run
//! use mcsmp::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::load()?;
//! println!("Catalog URL: {}", config.catalog.url);
//!
//! config.catalog.catalog_type = "file".to_string();
//! config.catalog.path = Some("/srv/modrinth-mirror".into());
//! config.save()?;
//! # Ok(())
//! # }
//! ```

use crate::cache::LookupCache;
use crate::loader::LoaderTable;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Lookup cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Extra loader aliases and dependency substitutions
    #[serde(default)]
    pub loaders: LoadersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog type: "http" or "file"
    #[serde(default = "default_catalog_type")]
    pub catalog_type: String,

    /// Base URL of the HTTP catalog
    #[serde(default = "default_catalog_url")]
    pub url: String,

    /// Root of an offline mirror (for the "file" catalog)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_catalog_type() -> String {
    "http".to_string()
}

fn default_catalog_url() -> String {
    "https://api.modrinth.com/v2".to_string()
}

fn default_user_agent() -> String {
    format!("mcsmp/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_type: default_catalog_type(),
            url: default_catalog_url(),
            path: None,
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache folder (defaults to `mcsmp-cache/` next to the executable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadersConfig {
    /// loader -> fallback loaders tried after it
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,

    /// loader -> (dependency slug -> replacement slug)
    #[serde(default)]
    pub substitutions: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Get the default config file path
    ///
    /// Uses MCSMP_CONFIG_DIR if set, otherwise ~/.mcsmp/config.toml
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(config_dir) = std::env::var("MCSMP_CONFIG_DIR") {
            return Ok(PathBuf::from(config_dir).join("config.toml"));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("Could not find home directory".to_string()))?;

        Ok(home.join(".mcsmp").join("config.toml"))
    }

    /// Load config from file, or defaults if it doesn't exist
    ///
    /// Environment variable overrides:
    /// - `MCSMP_CATALOG_URL`: overrides `catalog.url`
    /// - `MCSMP_CACHE_DIR`: overrides `cache.dir`
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;

        let mut config = if !path.exists() {
            Self::default()
        } else {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        };

        if let Ok(url) = std::env::var("MCSMP_CATALOG_URL") {
            if !url.is_empty() {
                config.catalog.url = url;
            }
        }
        if let Ok(dir) = std::env::var("MCSMP_CACHE_DIR") {
            if !dir.is_empty() {
                config.cache.dir = Some(PathBuf::from(dir));
            }
        }

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Set a value by dotted key, e.g. `catalog.url`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "catalog.catalog_type" | "catalog.type" => match value {
                "http" | "file" => self.catalog.catalog_type = value.to_string(),
                _ => {
                    return Err(Error::Other(format!(
                        "Invalid catalog type '{}' (expected \"http\" or \"file\")",
                        value
                    )))
                }
            },
            "catalog.url" => self.catalog.url = value.to_string(),
            "catalog.path" => self.catalog.path = Some(PathBuf::from(value)),
            "catalog.user_agent" => self.catalog.user_agent = value.to_string(),
            "cache.dir" => self.cache.dir = Some(PathBuf::from(value)),
            _ => return Err(Error::Other(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache.dir {
            Some(dir) => Ok(dir.clone()),
            None => LookupCache::default_dir(),
        }
    }

    /// Built-in loader tables with the configured additions applied
    pub fn loader_table(&self) -> LoaderTable {
        LoaderTable::default().with_overrides(&self.loaders.aliases, &self.loaders.substitutions)
    }
}
