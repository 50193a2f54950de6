//! Persistent memo tables for catalog identity lookups
//!
//! Three independent tables avoid repeated remote lookups:
//!
//! - package id -> slug
//! - version id -> slug
//! - slug -> package id and category
//!
//! Each table is read from disk the first time it is used and written back
//! whenever a new key is added. Entries are never overwritten; a stale entry
//! can only be dropped with [`LookupCache::clear`]. A version marker in the
//! cache folder invalidates every table when the on-disk format changes.
//! Only the table files and the marker are ever deleted, so the cache may
//! share a folder with other files.

use crate::artifact;
use crate::category::Category;
use crate::{jsonfile, Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Bump when the layout of any table changes
pub const CACHE_FORMAT_VERSION: &str = "2";

const VERSION_MARKER: &str = ".version";

pub const PROJECT_SLUGS: &str = "project_slugs.json";
pub const VERSION_SLUGS: &str = "version_slugs.json";
pub const SLUG_METADATA: &str = "slug_metadata.json";

pub const TABLES: [&str; 3] = [PROJECT_SLUGS, VERSION_SLUGS, SLUG_METADATA];

/// Cached identity of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugMetadata {
    pub id: String,
    pub category: Category,
}

struct Table<V> {
    file: PathBuf,
    entries: Option<BTreeMap<String, V>>,
}

impl<V: Serialize + DeserializeOwned + Clone> Table<V> {
    fn new(file: PathBuf) -> Self {
        Self {
            file,
            entries: None,
        }
    }

    fn entries(&mut self) -> &mut BTreeMap<String, V> {
        let file = &self.file;
        self.entries.get_or_insert_with(|| match jsonfile::read(file) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!("ignoring unreadable cache table {}: {}", file.display(), e);
                BTreeMap::new()
            }
        })
    }

    fn get(&mut self, key: &str) -> Option<V> {
        self.entries().get(key).cloned()
    }

    fn put(&mut self, key: &str, value: V) -> Result<bool> {
        let entries = self.entries();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value);
        let file = self.file.clone();
        jsonfile::write(&file, self.entries())?;
        Ok(true)
    }

    fn forget(&mut self) {
        self.entries = None;
    }
}

pub struct LookupCache {
    dir: PathBuf,
    project_slugs: Table<String>,
    version_slugs: Table<String>,
    slug_metadata: Table<SlugMetadata>,
}

impl LookupCache {
    /// Open the cache folder, dropping its tables if the format marker is
    /// missing or stale
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        let current = fs::read_to_string(dir.join(VERSION_MARKER)).ok();
        if current.as_deref().map(str::trim) != Some(CACHE_FORMAT_VERSION) {
            debug!("invalidating cache tables in {}", dir.display());
            reset(&dir)?;
        }

        Ok(Self {
            project_slugs: Table::new(dir.join(PROJECT_SLUGS)),
            version_slugs: Table::new(dir.join(VERSION_SLUGS)),
            slug_metadata: Table::new(dir.join(SLUG_METADATA)),
            dir,
        })
    }

    /// Default cache folder, next to the running executable
    pub fn default_dir() -> Result<PathBuf> {
        let exe = std::env::current_exe()?;
        let parent = exe
            .parent()
            .ok_or_else(|| Error::Other("Could not locate the executable directory".to_string()))?;
        Ok(parent.join("mcsmp-cache"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slug_by_project_id(&mut self, id: &str) -> Option<String> {
        self.project_slugs.get(id)
    }

    pub fn slug_by_version_id(&mut self, id: &str) -> Option<String> {
        self.version_slugs.get(id)
    }

    pub fn metadata_by_slug(&mut self, slug: &str) -> Option<SlugMetadata> {
        self.slug_metadata.get(slug)
    }

    pub fn put_project_slug(&mut self, id: &str, slug: &str) -> Result<bool> {
        self.project_slugs.put(id, slug.to_string())
    }

    pub fn put_version_slug(&mut self, id: &str, slug: &str) -> Result<bool> {
        self.version_slugs.put(id, slug.to_string())
    }

    pub fn put_metadata(&mut self, slug: &str, metadata: SlugMetadata) -> Result<bool> {
        self.slug_metadata.put(slug, metadata)
    }

    /// Delete specific tables, or all of them when `tables` is empty.
    ///
    /// Returns the names of the tables that were removed.
    pub fn clear(&mut self, tables: &[&str]) -> Result<Vec<String>> {
        let removed = if tables.is_empty() {
            reset(&self.dir)?
        } else {
            let mut removed = Vec::new();
            for table in tables {
                if !TABLES.contains(table) {
                    return Err(Error::Other(format!(
                        "Unknown cache table '{}' (expected one of: {})",
                        table,
                        TABLES.join(", ")
                    )));
                }
                if artifact::remove_if_exists(&self.dir.join(table))? {
                    removed.push(table.to_string());
                }
            }
            removed
        };

        self.project_slugs.forget();
        self.version_slugs.forget();
        self.slug_metadata.forget();
        Ok(removed)
    }
}

/// Remove every table and rewrite the marker, leaving other files alone.
///
/// Returns the tables that existed.
fn reset(dir: &Path) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for table in TABLES {
        if artifact::remove_if_exists(&dir.join(table))? {
            removed.push(table.to_string());
        }
    }
    fs::create_dir_all(dir)?;
    fs::write(dir.join(VERSION_MARKER), CACHE_FORMAT_VERSION)?;
    Ok(removed)
}
