//! Per-installation ledger of configuration and installed packages
//!
//! Each installation keeps a sidecar file ([`LEDGER_FILE_NAME`]) in its root
//! directory recording the game version, the loaders, and which file every
//! installed package was saved as. Global categories map `slug -> filename`;
//! datapacks map `world -> slug -> filename`.
//!
//! Mutations are in-memory until [`Ledger::save`] is called.
//!
//! # Examples
//!
//! ```no_run
//! use mcsmp::{Category, Ledger};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ledger = Ledger::load("fabric", "/games/fabric-1.20")?;
//! ledger.game_version = Some("1.20.1".to_string());
//! ledger.record(Category::Mod, None, "sodium", "sodium-0.5.3.jar");
//! ledger.save()?;
//! # Ok(())
//! # }
//! ```

use crate::category::{Category, Requirement};
use crate::{jsonfile, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The ledger sidecar filename inside an installation root
pub const LEDGER_FILE_NAME: &str = ".mcsmp.json";

pub type PackageMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Registered installation name, injected at load time
    #[serde(skip)]
    name: String,

    /// Installation root, injected at load time
    #[serde(skip)]
    root: PathBuf,

    #[serde(default)]
    pub game_version: Option<String>,

    /// Mod loader (required for mods)
    #[serde(default)]
    pub loader: Option<String>,

    /// Shader loader (required for shaders)
    #[serde(default)]
    pub loader_shader: Option<String>,

    #[serde(rename = "mod", default, serialize_with = "jsonfile::sorted_map")]
    mods: PackageMap,

    #[serde(default, serialize_with = "jsonfile::sorted_map")]
    resourcepack: PackageMap,

    #[serde(default, serialize_with = "jsonfile::sorted_map")]
    shader: PackageMap,

    #[serde(default, serialize_with = "jsonfile::sorted_nested_map")]
    datapack: BTreeMap<String, PackageMap>,
}

impl Ledger {
    /// Load the ledger of an installation, creating an empty one if none exists
    pub fn load<P: AsRef<Path>>(name: &str, root: P) -> Result<Self> {
        let root = root.as_ref();
        let mut ledger: Ledger = jsonfile::read(&Self::path_in(root))
            .map_err(|e| Error::Other(format!("Failed to parse ledger of \"{}\": {}", name, e)))?
            .unwrap_or_default();

        ledger.name = name.to_string();
        ledger.root = root.to_path_buf();
        ledger.normalize();
        Ok(ledger)
    }

    /// Write the ledger back to its sidecar file
    pub fn save(&self) -> Result<()> {
        jsonfile::write(&self.path(), self)
    }

    pub fn path_in(root: &Path) -> PathBuf {
        root.join(LEDGER_FILE_NAME)
    }

    pub fn path(&self) -> PathBuf {
        Self::path_in(&self.root)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn normalize(&mut self) {
        self.datapack.retain(|_, packages| !packages.is_empty());
        if let Some(loader) = self.loader.as_mut() {
            *loader = loader.to_lowercase();
        }
        if let Some(loader) = self.loader_shader.as_mut() {
            *loader = loader.to_lowercase();
        }
    }

    /// Packages of a category in the given scope
    ///
    /// World-scoped categories without a world (and global categories with
    /// one) have no package map.
    pub fn packages(&self, category: Category, world: Option<&str>) -> Option<&PackageMap> {
        match (category, world) {
            (Category::Mod, None) => Some(&self.mods),
            (Category::ResourcePack, None) => Some(&self.resourcepack),
            (Category::Shader, None) => Some(&self.shader),
            (Category::Datapack, Some(world)) => self.datapack.get(world),
            _ => None,
        }
    }

    fn packages_mut(&mut self, category: Category, world: Option<&str>) -> Option<&mut PackageMap> {
        match (category, world) {
            (Category::Mod, None) => Some(&mut self.mods),
            (Category::ResourcePack, None) => Some(&mut self.resourcepack),
            (Category::Shader, None) => Some(&mut self.shader),
            (Category::Datapack, Some(world)) => {
                Some(self.datapack.entry(world.to_string()).or_default())
            }
            _ => None,
        }
    }

    /// Worlds that have at least one datapack recorded
    pub fn worlds(&self) -> impl Iterator<Item = &str> {
        self.datapack.keys().map(String::as_str)
    }

    /// Slugs installed for a category in the given scope, in ledger order
    pub fn slugs(&self, category: Category, world: Option<&str>) -> Vec<String> {
        self.packages(category, world)
            .map(|packages| packages.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Recorded filename for a slug
    pub fn filename(&self, category: Category, world: Option<&str>, slug: &str) -> Option<&str> {
        self.packages(category, world)
            .and_then(|packages| packages.get(slug))
            .map(String::as_str)
    }

    /// Record the file a package was installed as
    pub fn record(&mut self, category: Category, world: Option<&str>, slug: &str, filename: &str) {
        if let Some(packages) = self.packages_mut(category, world) {
            packages.insert(slug.to_string(), filename.to_string());
        }
    }

    /// Forget a package, returning its recorded filename
    pub fn remove(&mut self, category: Category, world: Option<&str>, slug: &str) -> Option<String> {
        match (category, world) {
            (Category::Datapack, Some(world)) => {
                let packages = self.datapack.get_mut(world)?;
                let removed = packages.remove(slug);
                if packages.is_empty() {
                    self.datapack.remove(world);
                }
                removed
            }
            _ => self.packages_mut(category, world)?.remove(slug),
        }
    }

    /// Category holding `slug` in the given scope
    pub fn find(&self, slug: &str, world: Option<&str>) -> Option<Category> {
        Category::for_scope(world).iter().copied().find(|category| {
            self.packages(*category, world)
                .is_some_and(|packages| packages.contains_key(slug))
        })
    }

    /// Whether `slug` is installed in any global category
    pub fn has_global(&self, slug: &str) -> bool {
        self.find(slug, None).is_some()
    }

    pub fn world_exists(&self, world: &str) -> bool {
        self.root.join("saves").join(world).is_dir()
    }

    /// Check the ledger fields a category needs before installing
    pub fn require(&self, category: Category, world: Option<&str>) -> Result<()> {
        if self.game_version.is_none() {
            return Err(Error::MissingGameVersion(self.name.clone()));
        }

        match category.info().requirement {
            Requirement::GameVersion => Ok(()),
            Requirement::GameVersionAndLoader if self.loader.is_none() => {
                Err(Error::MissingLoader(self.name.clone()))
            }
            Requirement::GameVersionAndShaderLoader if self.loader_shader.is_none() => {
                Err(Error::MissingShaderLoader(self.name.clone()))
            }
            Requirement::GameVersionAndWorld => match world {
                Some(world) if self.world_exists(world) => Ok(()),
                Some(world) => Err(Error::WorldNotFound {
                    world: world.to_string(),
                    path: self.root.join("saves"),
                }),
                None => Err(Error::Other(format!(
                    "A world is required to install {} packages",
                    category
                ))),
            },
            _ => Ok(()),
        }
    }

    /// Probe variant of [`Ledger::require`] for batch and listing operations
    pub fn satisfies(&self, category: Category, world: Option<&str>) -> bool {
        self.require(category, world).is_ok()
    }
}
