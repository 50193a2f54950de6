//! Registry of game installations
//!
//! Maps a user-chosen name to the absolute root directory of a game
//! installation. The registry lives in [`REGISTRY_FILE_NAME`] in the working
//! directory. A path can only be registered under one name.
//!
//! # Examples
//!
//! ```no_run
//! use mcsmp::Registry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = Registry::load()?;
//! registry.add("fabric", "/games/fabric-1.20")?;
//! registry.save()?;
//!
//! let root = registry.resolve("fabric")?;
//! println!("fabric => {}", root.display());
//! # Ok(())
//! # }
//! ```

use crate::ledger::Ledger;
use crate::{artifact, jsonfile, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// The registry filename in the working directory
pub const REGISTRY_FILE_NAME: &str = "mcsmp.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    #[serde(serialize_with = "jsonfile::sorted_map")]
    entries: BTreeMap<String, PathBuf>,

    #[serde(skip)]
    file: PathBuf,
}

/// Outcome of [`Registry::add`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Unchanged,
    /// The name moved from the contained path to the new one
    Moved(PathBuf),
}

impl Registry {
    /// Load the registry from the current directory
    pub fn load() -> Result<Self> {
        Self::load_from(REGISTRY_FILE_NAME)
    }

    /// Load the registry from a specific file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut registry: Registry = jsonfile::read(path)
            .map_err(|e| Error::Other(format!("Failed to parse {}: {}", path.display(), e)))?
            .unwrap_or_default();
        registry.file = path.to_path_buf();
        Ok(registry)
    }

    pub fn save(&self) -> Result<()> {
        jsonfile::write(&self.file, self)
    }

    /// Register `name` at `path`.
    ///
    /// Re-adding an existing name under a new path moves its ledger along.
    pub fn add<P: AsRef<Path>>(&mut self, name: &str, path: P) -> Result<AddOutcome> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(Error::NotADirectory(path.to_path_buf()));
        }
        let path = absolute_path(path)?;

        if let Some((existing, _)) = self.entries.iter().find(|(n, p)| **p == path && *n != name) {
            return Err(Error::DuplicatePath {
                path,
                existing: existing.clone(),
            });
        }

        let outcome = match self.entries.get(name) {
            Some(old) if *old == path => AddOutcome::Unchanged,
            Some(old) => {
                migrate_ledger(old, &path)?;
                AddOutcome::Moved(old.clone())
            }
            None => AddOutcome::Added,
        };

        self.entries.insert(name.to_string(), path);
        Ok(outcome)
    }

    /// Unregister `name`, returning whether it was defined
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Root path of a registered installation
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let path = self
            .entries
            .get(name)
            .ok_or_else(|| Error::UnknownDirectory(name.to_string()))?;

        if !path.exists() {
            return Err(Error::PathMissing {
                name: name.to_string(),
                path: path.clone(),
            });
        }
        Ok(path.clone())
    }

    /// Resolve an installation and load its ledger
    pub fn open(&self, name: &str) -> Result<Ledger> {
        let root = self.resolve(name)?;
        Ledger::load(name, root)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Registered names in case-insensitive order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }
}

/// Absolute form of `path` with `.` and `..` folded away lexically.
///
/// Symlinks are kept as given, so the registry shows the path the user typed.
fn absolute_path(path: &Path) -> Result<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn migrate_ledger(old_root: &Path, new_root: &Path) -> Result<()> {
    let old = Ledger::path_in(old_root);
    let new = Ledger::path_in(new_root);
    if !old.is_file() {
        return Ok(());
    }

    debug!("moving ledger {} -> {}", old.display(), new.display());
    fs::copy(&old, &new)?;
    artifact::remove_if_exists(&old)?;
    Ok(())
}
