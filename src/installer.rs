//! Package resolution and installation
//!
//! [`Installer::install`] takes a slug and brings the installation to the
//! newest catalog version that fits the ledger's game version and loader:
//!
//! 1. resolve the slug to a project id and category (lookup cache first)
//! 2. route the category (mods installed into a world become datapacks)
//! 3. check the ledger has what the category needs
//! 4. query the catalog with the loader and its aliases, pick a version
//! 5. compare the recorded filename and on-disk hash with the version's file,
//!    download only when they differ, and record the new filename
//! 6. resolve required dependencies and install the missing ones
//!
//! Disabled artifacts stay disabled across updates. Ledger changes are not
//! written to disk; callers commit with [`Ledger::save`].
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
//! let mut ledger = Registry::load()?.open("fabric")?;
//!
//! let mut installer = Installer::new(&catalog, &mut cache, config.loader_table());
//! let outcome = installer.install(&mut ledger, "sodium", None)?;
//! println!("sodium: {:?}", outcome);
//! ledger.save()?;
//! # Ok(())
//! # }
//! ```

use crate::artifact::{self, ArtifactState};
use crate::cache::{LookupCache, SlugMetadata};
use crate::catalog::{Catalog, Version, VersionFile};
use crate::category::{Category, LoaderSource, Scope};
use crate::ledger::Ledger;
use crate::loader::{self, LoaderTable};
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Progress callback for downloads
///
/// Called with:
/// - `message`: Description of current operation (e.g., "Downloading sodium.jar...")
/// - `current`: Current progress (0-100)
/// - `total`: Total work (100)
pub type ProgressCallback = Arc<dyn Fn(&str, u64, u64) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// A file was written or the ledger gained an entry
    Installed,
    /// The recorded file already matches the newest applicable version
    AlreadyCurrent,
    /// Nothing applicable (no version, unsupported category)
    Skipped,
    /// A catalog lookup or download failed
    Error,
}

/// Result of [`Installer::update`]
#[derive(Debug, Default, Clone)]
pub struct UpdateReport {
    pub installed: Vec<String>,
    pub up_to_date: Vec<String>,
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

impl UpdateReport {
    fn push(&mut self, slug: &str, outcome: InstallOutcome) {
        let list = match outcome {
            InstallOutcome::Installed => &mut self.installed,
            InstallOutcome::AlreadyCurrent => &mut self.up_to_date,
            InstallOutcome::Skipped => &mut self.skipped,
            InstallOutcome::Error => &mut self.errors,
        };
        list.push(slug.to_string());
    }
}

pub struct Installer<'a> {
    catalog: &'a Catalog,
    cache: &'a mut LookupCache,
    loaders: LoaderTable,
    progress: Option<ProgressCallback>,
}

impl<'a> Installer<'a> {
    pub fn new(catalog: &'a Catalog, cache: &'a mut LookupCache, loaders: LoaderTable) -> Self {
        Self {
            catalog,
            cache,
            loaders,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    fn report(&self, message: &str, current: u64, total: u64) {
        if let Some(ref cb) = self.progress {
            cb(message, current, total);
        }
    }

    /// Install or update `slug`, globally or into `world`.
    ///
    /// Unmet ledger requirements are returned as errors; catalog failures are
    /// reported and yield [`InstallOutcome::Error`].
    pub fn install(
        &mut self,
        ledger: &mut Ledger,
        slug: &str,
        world: Option<&str>,
    ) -> Result<InstallOutcome> {
        let slug = slug.to_lowercase();

        let metadata = match self.identify(&slug) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => return Ok(InstallOutcome::Skipped),
            Err(e) => {
                println!("  ✗ Could not look up {}: {}", slug, e);
                return Ok(InstallOutcome::Error);
            }
        };

        let category = match route(metadata.category, world) {
            Some(category) => category,
            None => {
                match world {
                    Some(world) => println!(
                        "  ⚠ {} is a {} and can't be installed into the world \"{}\"",
                        slug, metadata.category, world
                    ),
                    None => println!(
                        "  ⚠ {} is a {} and needs a world to be installed",
                        slug, metadata.category
                    ),
                }
                return Ok(InstallOutcome::Skipped);
            }
        };

        ledger.require(category, world)?;

        let active_loader = match category.info().loader {
            LoaderSource::Fixed(loader) => Some(loader.to_string()),
            LoaderSource::Ledger => ledger.loader.clone(),
            LoaderSource::LedgerShader => ledger.loader_shader.clone(),
        };
        let aliases = active_loader
            .as_deref()
            .map(|l| self.loaders.aliases(l))
            .unwrap_or_default();
        let game_version = ledger.game_version.clone();

        debug!(
            "fetching versions of {} ({}) for {:?} with loaders {:?}",
            slug, metadata.id, game_version, aliases
        );
        let versions = match self
            .catalog
            .get_versions(&metadata.id, game_version.as_deref(), &aliases)
        {
            Ok(versions) => versions,
            Err(e) => {
                println!("  ✗ Could not fetch versions of {}: {}", slug, e);
                return Ok(InstallOutcome::Error);
            }
        };

        let Some(version) = select_version(&versions, &aliases) else {
            println!(
                "  ⚠ No version of {} available for Minecraft {} and the loader {}",
                slug,
                game_version.as_deref().unwrap_or("?"),
                active_loader.as_deref().unwrap_or("(none)")
            );
            return Ok(InstallOutcome::Skipped);
        };
        let Some(file) = version.primary_file() else {
            println!("  ⚠ Version {} of {} has no files", version.version_number, slug);
            return Ok(InstallOutcome::Skipped);
        };

        let folder_category = if category == Category::Shader
            && version.loaders.first().is_some_and(|l| loader::is_no_loader(l))
        {
            Category::ResourcePack
        } else {
            category
        };
        let folder = folder_category.folder(ledger.root(), world);
        fs::create_dir_all(&folder)?;
        let canonical = folder.join(&file.filename);

        let previous = ledger.filename(category, world, &slug).map(str::to_string);
        let previous_path = previous
            .as_deref()
            .filter(|name| *name != file.filename)
            .map(|name| locate(ledger.root(), category, world, name));

        // Work on canonical paths; the disabled state is restored at the end
        let mut disabled = artifact::set_enabled(&canonical, true)? == ArtifactState::Disabled;
        if let Some(ref path) = previous_path {
            disabled |= artifact::set_enabled(path, true)? == ArtifactState::Disabled;
        }

        let mut outcome = if previous.as_deref() == Some(file.filename.as_str())
            && is_current(&canonical, file)?
        {
            println!("  ✓ {} is already up to date", slug);
            InstallOutcome::AlreadyCurrent
        } else {
            if !is_current(&canonical, file)? {
                if let Err(e) = self.fetch(file, &canonical) {
                    println!("  ✗ Download of {} failed: {}", slug, e);
                    if disabled {
                        artifact::set_enabled(&canonical, false)?;
                        if let Some(ref path) = previous_path {
                            artifact::set_enabled(path, false)?;
                        }
                    }
                    return Ok(InstallOutcome::Error);
                }
            }

            if let Some(ref path) = previous_path {
                if let Err(e) = artifact::remove_if_exists(path) {
                    println!("  ⚠ Could not remove {}: {}", path.display(), e);
                }
            }

            ledger.record(category, world, &slug, &file.filename);
            println!(
                "  ✓ Installed {} ({}) in \"{}\"",
                slug,
                file.filename,
                ledger.name()
            );
            InstallOutcome::Installed
        };

        if world.is_some() {
            if let Some(companion) = version.companion_file() {
                self.install_companion(ledger.root(), &slug, companion);
            }
        }

        if disabled {
            artifact::set_enabled(&canonical, false)?;
        }

        let dependencies = self.resolve_dependencies(version, ledger.loader.as_deref());
        if dependencies.is_empty() {
            return Ok(outcome);
        }

        if let Some(world) = world {
            println!("  ⚠ {} requires the following, install them manually:", slug);
            for dependency in &dependencies {
                println!(
                    "      mcsmp install {} {} --world {}",
                    ledger.name(),
                    dependency,
                    world
                );
            }
            return Ok(outcome);
        }

        for dependency in dependencies {
            if ledger.has_global(&dependency) {
                debug!("dependency {} already installed", dependency);
                continue;
            }
            println!("  Installing {} (required by {})", dependency, slug);
            match self.install(ledger, &dependency, None) {
                Ok(InstallOutcome::Installed) => outcome = InstallOutcome::Installed,
                Ok(_) => {}
                Err(e) => println!("  ✗ Could not install dependency {}: {}", dependency, e),
            }
        }

        Ok(outcome)
    }

    /// Re-install every package recorded in the given scope.
    ///
    /// The ledger is saved after each package that changed. Categories whose
    /// requirements are unmet are skipped with a warning.
    pub fn update(&mut self, ledger: &mut Ledger, world: Option<&str>) -> Result<UpdateReport> {
        let mut report = UpdateReport::default();

        for &category in Category::for_scope(world) {
            let slugs = ledger.slugs(category, world);
            if slugs.is_empty() {
                continue;
            }
            if let Err(e) = ledger.require(category, world) {
                println!("⚠ Skipping {} packages: {}", category, e);
                report.skipped.extend(slugs);
                continue;
            }

            for slug in slugs {
                println!("Updating {}", slug);
                match self.install(ledger, &slug, world) {
                    Ok(outcome) => {
                        if outcome == InstallOutcome::Installed {
                            ledger.save()?;
                        }
                        report.push(&slug, outcome);
                    }
                    Err(e) if e.is_precondition() => {
                        println!("  ⚠ {}", e);
                        report.push(&slug, InstallOutcome::Skipped);
                    }
                    Err(e) => {
                        println!("  ✗ {}", e);
                        report.push(&slug, InstallOutcome::Error);
                    }
                }
            }
        }

        Ok(report)
    }

    /// Resolve a slug to its project id and native category.
    ///
    /// Returns `None` when the catalog reports a project type this tool
    /// doesn't manage.
    fn identify(&mut self, slug: &str) -> Result<Option<SlugMetadata>> {
        if let Some(metadata) = self.cache.metadata_by_slug(slug) {
            debug!("cache hit for {}", slug);
            return Ok(Some(metadata));
        }

        let project = self.catalog.get_project(slug)?;
        self.cache.put_project_slug(&project.id, slug)?;

        let Some(category) = Category::from_project_type(&project.project_type) else {
            println!(
                "  ⚠ The project type of {} is unknown: {}",
                slug, project.project_type
            );
            return Ok(None);
        };

        let metadata = SlugMetadata {
            id: project.id,
            category,
        };
        self.cache.put_metadata(slug, metadata.clone())?;
        Ok(Some(metadata))
    }

    fn slug_for_project(&mut self, project_id: &str) -> Result<String> {
        if let Some(slug) = self.cache.slug_by_project_id(project_id) {
            return Ok(slug);
        }

        let project = self.catalog.get_project(project_id)?;
        let slug = project.slug.to_lowercase();
        self.cache.put_project_slug(project_id, &slug)?;
        if let Some(category) = Category::from_project_type(&project.project_type) {
            self.cache.put_metadata(
                &slug,
                SlugMetadata {
                    id: project.id,
                    category,
                },
            )?;
        }
        Ok(slug)
    }

    fn slug_for_version(&mut self, version_id: &str) -> Result<String> {
        if let Some(slug) = self.cache.slug_by_version_id(version_id) {
            return Ok(slug);
        }

        let version = self.catalog.get_version(version_id)?;
        let slug = self.slug_for_project(&version.project_id)?;
        self.cache.put_version_slug(version_id, &slug)?;
        Ok(slug)
    }

    /// Slugs of the required and embedded dependencies of a version, sorted
    fn resolve_dependencies(&mut self, version: &Version, mod_loader: Option<&str>) -> BTreeSet<String> {
        let mut slugs = BTreeSet::new();

        for dependency in version.dependencies.iter().filter(|d| d.is_needed()) {
            let resolved = match (&dependency.version_id, &dependency.project_id) {
                (Some(version_id), _) => self.slug_for_version(version_id),
                (None, Some(project_id)) => self.slug_for_project(project_id),
                (None, None) => continue,
            };

            match resolved {
                Ok(slug) => {
                    let slug = self.loaders.substitute(mod_loader, &slug).to_string();
                    slugs.insert(slug);
                }
                Err(e) => {
                    warn!("failed to resolve dependency {:?}: {}", dependency, e);
                    println!("  ⚠ Could not resolve a dependency: {}", e);
                }
            }
        }

        slugs
    }

    fn install_companion(&self, root: &Path, slug: &str, file: &VersionFile) {
        let folder = Category::ResourcePack.folder(root, None);
        let path = folder.join(&file.filename);

        let result = fs::create_dir_all(&folder)
            .map_err(Error::from)
            .and_then(|_| is_current(&path, file))
            .and_then(|current| {
                if current {
                    Ok(false)
                } else {
                    self.fetch(file, &path).map(|_| true)
                }
            });

        match result {
            Ok(true) => println!("  ✓ Installed resource pack {} for {}", file.filename, slug),
            Ok(false) => debug!("companion {} already current", file.filename),
            Err(e) => println!(
                "  ⚠ Could not install the resource pack {} for {}: {}",
                file.filename, slug, e
            ),
        }
    }

    /// Download a version file to `dest`, checking its declared hash first.
    ///
    /// The progress callback always receives a final `current == total`
    /// call, whether or not the download succeeded.
    fn fetch(&self, file: &VersionFile, dest: &Path) -> Result<()> {
        self.report(&format!("Downloading {}...", file.filename), 0, 100);
        let result = self.download_verified(file).and_then(|bytes| {
            fs::write(dest, &bytes)?;
            Ok(())
        });
        let message = match result {
            Ok(()) => format!("Downloaded {}", file.filename),
            Err(_) => format!("Failed to download {}", file.filename),
        };
        self.report(&message, 100, 100);
        result
    }

    fn download_verified(&self, file: &VersionFile) -> Result<Vec<u8>> {
        let bytes = self.catalog.download(&file.url)?;

        match file.sha512() {
            Some(expected) => {
                let computed = artifact::bytes_hash(&bytes);
                if !computed.eq_ignore_ascii_case(expected) {
                    return Err(Error::ChecksumMismatch {
                        file: file.filename.clone(),
                        expected: expected.to_string(),
                        computed,
                    });
                }
            }
            None => warn!("{} declares no sha512, skipping verification", file.filename),
        }
        Ok(bytes)
    }
}

/// Category a package is installed under for the given scope
pub fn route(native: Category, world: Option<&str>) -> Option<Category> {
    match (world, native) {
        (Some(_), Category::Mod | Category::Datapack) => Some(Category::Datapack),
        (Some(_), _) => None,
        (None, category) if category.scope() == Scope::Global => Some(category),
        (None, _) => None,
    }
}

/// Pick the version to install.
///
/// For each alias in order, the first version supporting it is a candidate;
/// the newest candidate wins and ties go to the earlier alias. Without
/// aliases the first version is taken as is.
pub fn select_version<'v>(versions: &'v [Version], aliases: &[String]) -> Option<&'v Version> {
    let candidates: Vec<&Version> = if aliases.is_empty() {
        versions.first().into_iter().collect()
    } else {
        aliases
            .iter()
            .filter_map(|alias| versions.iter().find(|v| v.supports(alias)))
            .collect()
    };

    let mut best: Option<&Version> = None;
    for candidate in candidates {
        if best.map_or(true, |current| candidate.date_published > current.date_published) {
            best = Some(candidate);
        }
    }
    best
}

/// Where a recorded artifact lives.
///
/// Shader packs built for no loader are kept with the resource packs, so
/// shaders are looked up in both folders.
pub fn locate(root: &Path, category: Category, world: Option<&str>, filename: &str) -> PathBuf {
    let canonical = category.folder(root, world).join(filename);
    if category == Category::Shader && !artifact::inspect(&canonical).is_present() {
        let fallback = Category::ResourcePack.folder(root, None).join(filename);
        if artifact::inspect(&fallback).is_present() {
            return fallback;
        }
    }
    canonical
}

fn is_current(path: &Path, file: &VersionFile) -> Result<bool> {
    Ok(match (artifact::file_hash(path)?, file.sha512()) {
        (Some(computed), Some(expected)) => computed.eq_ignore_ascii_case(expected),
        _ => false,
    })
}

/// Enable or disable an installed package.
///
/// Returns the category holding it, or `None` if it isn't installed.
pub fn set_package_enabled(
    ledger: &Ledger,
    slug: &str,
    world: Option<&str>,
    enabled: bool,
) -> Result<Option<Category>> {
    let slug = slug.to_lowercase();
    let Some(category) = ledger.find(&slug, world) else {
        return Ok(None);
    };
    if let Some(filename) = ledger.filename(category, world, &slug) {
        let path = locate(ledger.root(), category, world, filename);
        artifact::set_enabled(&path, enabled)?;
    }
    Ok(Some(category))
}

/// Delete an installed package's artifact and forget it.
///
/// Returns the category it was removed from, or `None` if it isn't installed.
pub fn uninstall(ledger: &mut Ledger, slug: &str, world: Option<&str>) -> Result<Option<Category>> {
    let slug = slug.to_lowercase();
    let Some(category) = ledger.find(&slug, world) else {
        return Ok(None);
    };
    if let Some(filename) = ledger.remove(category, world, &slug) {
        let path = locate(ledger.root(), category, world, &filename);
        artifact::set_enabled(&path, true)?;
        artifact::remove_if_exists(&path)?;
    }
    Ok(Some(category))
}
