//! Content categories and their per-category behavior
//!
//! Every kind of add-on the tool manages is one [`Category`]. Each variant has
//! a single [`CategoryInfo`] record describing where its artifacts live, which
//! ledger fields must be set before installing, and which loader is used when
//! querying the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Pseudo-loader the catalog uses for resource packs
pub const RESOURCEPACK_LOADER: &str = "minecraft";

/// Pseudo-loader the catalog uses for datapacks
pub const DATAPACK_LOADER: &str = "datapack";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mod,
    #[serde(rename = "resourcepack")]
    ResourcePack,
    Shader,
    Datapack,
}

/// Whether a category is installed once per installation or once per world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    World,
}

/// Ledger fields that must be present before a category can be installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    GameVersion,
    GameVersionAndLoader,
    GameVersionAndShaderLoader,
    GameVersionAndWorld,
}

/// Where the catalog loader for a category comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderSource {
    /// A fixed pseudo-loader
    Fixed(&'static str),
    /// The installation's mod loader
    Ledger,
    /// The installation's shader loader
    LedgerShader,
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub folder: &'static str,
    pub scope: Scope,
    pub requirement: Requirement,
    pub loader: LoaderSource,
}

const MOD: CategoryInfo = CategoryInfo {
    name: "mod",
    folder: "mods",
    scope: Scope::Global,
    requirement: Requirement::GameVersionAndLoader,
    loader: LoaderSource::Ledger,
};

const RESOURCEPACK: CategoryInfo = CategoryInfo {
    name: "resourcepack",
    folder: "resourcepacks",
    scope: Scope::Global,
    requirement: Requirement::GameVersion,
    loader: LoaderSource::Fixed(RESOURCEPACK_LOADER),
};

const SHADER: CategoryInfo = CategoryInfo {
    name: "shader",
    folder: "shaderpacks",
    scope: Scope::Global,
    requirement: Requirement::GameVersionAndShaderLoader,
    loader: LoaderSource::LedgerShader,
};

const DATAPACK: CategoryInfo = CategoryInfo {
    name: "datapack",
    folder: "datapacks",
    scope: Scope::World,
    requirement: Requirement::GameVersionAndWorld,
    loader: LoaderSource::Fixed(DATAPACK_LOADER),
};

impl Category {
    pub const ALL: [Category; 4] = [
        Category::ResourcePack,
        Category::Mod,
        Category::Shader,
        Category::Datapack,
    ];

    pub const GLOBAL: [Category; 3] = [Category::ResourcePack, Category::Mod, Category::Shader];

    pub fn info(self) -> &'static CategoryInfo {
        match self {
            Category::Mod => &MOD,
            Category::ResourcePack => &RESOURCEPACK,
            Category::Shader => &SHADER,
            Category::Datapack => &DATAPACK,
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn scope(self) -> Scope {
        self.info().scope
    }

    /// Parse the catalog's `project_type` field
    pub fn from_project_type(project_type: &str) -> Option<Self> {
        match project_type {
            "mod" => Some(Category::Mod),
            "resourcepack" => Some(Category::ResourcePack),
            "shader" => Some(Category::Shader),
            "datapack" => Some(Category::Datapack),
            _ => None,
        }
    }

    /// Categories that can hold packages for the given scope
    pub fn for_scope(world: Option<&str>) -> &'static [Category] {
        if world.is_some() {
            &[Category::Datapack]
        } else {
            &Category::GLOBAL
        }
    }

    /// Folder holding this category's artifacts inside an installation root
    pub fn folder(self, root: &Path, world: Option<&str>) -> PathBuf {
        match (self.scope(), world) {
            (Scope::World, Some(world)) => root.join("saves").join(world).join(self.info().folder),
            _ => root.join(self.info().folder),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
