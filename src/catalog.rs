//! Remote catalog client and metadata types
//!
//! The catalog is either the Modrinth HTTP API or an offline mirror laid out
//! on disk. Both expose the same lookups: a project by id or slug, the
//! versions of a project filtered by game version and loaders, a single
//! version by id, and artifact downloads.
//!
//! Offline mirror layout:
//!
//! ```text
//! <root>/projects/<slug>.json       project record
//! <root>/versions/<project_id>.json list of version records, newest first
//! <root>/<file url>                 artifacts, addressed relative to <root>
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use mcsmp::{Catalog, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::from_config(&Config::load()?)?;
//! let project = catalog.get_project("sodium")?;
//! let versions = catalog.get_versions(&project.id, Some("1.20.1"), &["fabric".to_string()])?;
//! println!("{} has {} matching versions", project.slug, versions.len());
//! # Ok(())
//! # }
//! ```

use crate::catalog_http::HttpCatalog;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub project_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub donation_urls: Vec<DonationUrl>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub client_side: Option<String>,
    #[serde(default)]
    pub server_side: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub discord_url: Option<String>,
    #[serde(default)]
    pub wiki_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationUrl {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub version_number: String,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    pub date_published: DateTime<Utc>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub files: Vec<VersionFile>,
}

impl Version {
    /// The artifact to install
    pub fn primary_file(&self) -> Option<&VersionFile> {
        self.files.first()
    }

    /// A secondary resource pack shipped alongside a datapack
    pub fn companion_file(&self) -> Option<&VersionFile> {
        self.files.get(1)
    }

    pub fn supports(&self, loader: &str) -> bool {
        self.loaders.iter().any(|l| l == loader)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionFile {
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub hashes: HashMap<String, String>,
    #[serde(default)]
    pub primary: bool,
}

impl VersionFile {
    /// Declared SHA-512 of the file
    pub fn sha512(&self) -> Option<&str> {
        self.hashes.get("sha512").map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Required,
    Optional,
    Incompatible,
    Embedded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    pub dependency_type: DependencyType,
}

impl Dependency {
    /// Whether the dependency must be installed alongside its dependent
    pub fn is_needed(&self) -> bool {
        matches!(
            self.dependency_type,
            DependencyType::Required | DependencyType::Embedded
        )
    }
}

pub enum Catalog {
    File(FileCatalog),
    Http(HttpCatalog),
}

impl Catalog {
    /// Create a catalog client using configuration
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        match config.catalog.catalog_type.as_str() {
            "file" => {
                let path = config.catalog.path.clone().ok_or_else(|| {
                    Error::Other(
                        "catalog.path must be set when catalog.catalog_type = \"file\"".to_string(),
                    )
                })?;
                Ok(Catalog::File(FileCatalog::new(path)))
            }
            _ => Ok(Catalog::Http(HttpCatalog::new(
                config.catalog.url.clone(),
                &config.catalog.user_agent,
            )?)),
        }
    }

    /// Get a project by id or slug
    pub fn get_project(&self, id_or_slug: &str) -> Result<Project> {
        match self {
            Catalog::File(client) => client.get_project(id_or_slug),
            Catalog::Http(client) => client.get_project(id_or_slug),
        }
    }

    /// Versions of a project, newest first.
    ///
    /// An empty `loaders` slice disables loader filtering.
    pub fn get_versions(
        &self,
        project_id: &str,
        game_version: Option<&str>,
        loaders: &[String],
    ) -> Result<Vec<Version>> {
        match self {
            Catalog::File(client) => client.get_versions(project_id, game_version, loaders),
            Catalog::Http(client) => client.get_versions(project_id, game_version, loaders),
        }
    }

    pub fn get_version(&self, version_id: &str) -> Result<Version> {
        match self {
            Catalog::File(client) => client.get_version(version_id),
            Catalog::Http(client) => client.get_version(version_id),
        }
    }

    /// Fetch an artifact
    pub fn download(&self, url: &str) -> Result<Vec<u8>> {
        match self {
            Catalog::File(client) => client.download(url),
            Catalog::Http(client) => client.download(url),
        }
    }
}

pub struct FileCatalog {
    root: PathBuf,
}

impl FileCatalog {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    fn read_projects(&self) -> Result<Vec<Project>> {
        let mut projects = Vec::new();
        let dir = self.projects_dir();
        if !dir.exists() {
            return Ok(projects);
        }
        for entry in fs::read_dir(dir)?.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                projects.push(serde_json::from_str(&content)?);
            }
        }
        Ok(projects)
    }

    fn read_versions(&self, project_id: &str) -> Result<Vec<Version>> {
        let path = self.versions_dir().join(format!("{}.json", project_id));
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn get_project(&self, id_or_slug: &str) -> Result<Project> {
        let by_slug = self.projects_dir().join(format!("{}.json", id_or_slug));
        if by_slug.exists() {
            let content = fs::read_to_string(&by_slug)?;
            return Ok(serde_json::from_str(&content)?);
        }

        self.read_projects()?
            .into_iter()
            .find(|p| p.id == id_or_slug)
            .ok_or_else(|| {
                Error::PackageNotFound(format!("Project '{}' not found in catalog", id_or_slug))
            })
    }

    pub fn get_versions(
        &self,
        project_id: &str,
        game_version: Option<&str>,
        loaders: &[String],
    ) -> Result<Vec<Version>> {
        Ok(self
            .read_versions(project_id)?
            .into_iter()
            .filter(|v| game_version.map_or(true, |gv| v.game_versions.iter().any(|g| g == gv)))
            .filter(|v| loaders.is_empty() || loaders.iter().any(|l| v.supports(l)))
            .collect())
    }

    pub fn get_version(&self, version_id: &str) -> Result<Version> {
        let dir = self.versions_dir();
        if dir.exists() {
            for entry in fs::read_dir(dir)?.flatten() {
                let content = fs::read_to_string(entry.path())?;
                let versions: Vec<Version> = serde_json::from_str(&content)?;
                if let Some(version) = versions.into_iter().find(|v| v.id == version_id) {
                    return Ok(version);
                }
            }
        }
        Err(Error::PackageNotFound(format!(
            "Version '{}' not found in catalog",
            version_id
        )))
    }

    pub fn download(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.root.join(url.trim_start_matches("file://"));
        fs::read(&path).map_err(|e| {
            Error::Other(format!("Download failed for {}: {}", path.display(), e))
        })
    }
}
