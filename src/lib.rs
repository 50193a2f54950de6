//! mcsmp - Manage add-ons for multiple Minecraft installations
//!
//! mcsmp keeps the mods, resource packs, shaders and per-world datapacks of
//! several independently configured game installations in sync with the
//! Modrinth catalog:
//!
//! - Named installations, each with its own game version and loaders
//! - Version selection with loader fallbacks (Quilt accepts Fabric builds)
//! - Idempotent installs checked by filename and SHA-512
//! - Enable/disable by renaming, preserved across updates
//! - Recursive installation of required dependencies
//!
//! # Examples
//!
//! ```no_run
//! use mcsmp::{Catalog, Config, Installer, LookupCache, Registry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let catalog = Catalog::from_config(&config)?;
//! let mut cache = LookupCache::open(config.cache_dir()?)?;
//!
//! let registry = Registry::load()?;
//! let mut ledger = registry.open("fabric")?;
//!
//! let mut installer = Installer::new(&catalog, &mut cache, config.loader_table());
//! let report = installer.update(&mut ledger, None)?;
//! println!("{} updated, {} failed", report.installed.len(), report.errors.len());
//! ledger.save()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`registry`] - Installation names and their root directories
//! - [`ledger`] - Per-installation configuration and installed packages
//! - [`cache`] - Persistent memo of catalog identity lookups
//! - [`artifact`] - Enabled/disabled state and hashing of installed files
//! - [`installer`] - Version selection, installation and dependencies
//! - [`catalog`] - Catalog client (HTTP or offline mirror)
//! - [`category`] - Content categories and their folders and requirements
//! - [`loader`] - Loader aliases and dependency substitutions
//! - [`config`] - User configuration
//! - [`error`] - Error types and result handling

pub mod artifact;
pub mod cache;
pub mod catalog;
pub mod catalog_http;
pub mod category;
pub mod config;
pub mod error;
pub mod installer;
mod jsonfile;
pub mod ledger;
pub mod loader;
pub mod registry;

pub use artifact::{ArtifactState, DISABLED_SUFFIX};
pub use cache::{LookupCache, SlugMetadata};
pub use catalog::{Catalog, Dependency, DependencyType, FileCatalog, Project, Version, VersionFile};
pub use category::Category;
pub use config::Config;
pub use error::{Error, Result};
pub use installer::{
    select_version, set_package_enabled, uninstall, InstallOutcome, Installer, ProgressCallback,
    UpdateReport,
};
pub use ledger::{Ledger, LEDGER_FILE_NAME};
pub use loader::LoaderTable;
pub use registry::{AddOutcome, Registry, REGISTRY_FILE_NAME};
