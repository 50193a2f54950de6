//! Loader alias and dependency substitution tables
//!
//! A loader may accept versions built for other loaders (Quilt runs most
//! Fabric mods, Iris loads OptiFine shader packs). The alias list for a loader
//! is the ordered list of catalog loaders tried when selecting a version; the
//! first entry is always the loader itself.

use std::collections::BTreeMap;

/// Loaders that mark a shader version as a plain resource pack
pub const NO_LOADER: [&str; 2] = ["vanilla", "minecraft"];

#[derive(Debug, Clone)]
pub struct LoaderTable {
    aliases: BTreeMap<String, Vec<String>>,
    substitutions: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for LoaderTable {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        for (loader, fallbacks) in [
            ("quilt", &["fabric"][..]),
            ("iris", &["optifine", "vanilla"][..]),
            ("optifine", &["vanilla"][..]),
            ("canvas", &["vanilla"][..]),
        ] {
            aliases.insert(
                loader.to_string(),
                fallbacks.iter().map(|s| s.to_string()).collect(),
            );
        }

        let mut substitutions = BTreeMap::new();
        substitutions.insert(
            "quilt".to_string(),
            BTreeMap::from([("fabric-api".to_string(), "qsl".to_string())]),
        );

        Self {
            aliases,
            substitutions,
        }
    }
}

impl LoaderTable {
    /// Merge user-configured tables on top of the built-in ones
    pub fn with_overrides(
        mut self,
        aliases: &BTreeMap<String, Vec<String>>,
        substitutions: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> Self {
        for (loader, fallbacks) in aliases {
            self.aliases.insert(loader.to_lowercase(), fallbacks.clone());
        }
        for (loader, table) in substitutions {
            self.substitutions
                .entry(loader.to_lowercase())
                .or_default()
                .extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self
    }

    /// Ordered list of catalog loaders accepted for `loader`
    pub fn aliases(&self, loader: &str) -> Vec<String> {
        let mut list = vec![loader.to_string()];
        if let Some(fallbacks) = self.aliases.get(loader) {
            for fallback in fallbacks {
                if !list.contains(fallback) {
                    list.push(fallback.clone());
                }
            }
        }
        list
    }

    /// Replace a dependency slug by its equivalent under `loader`
    pub fn substitute<'a>(&'a self, loader: Option<&str>, slug: &'a str) -> &'a str {
        loader
            .and_then(|l| self.substitutions.get(l))
            .and_then(|table| table.get(slug))
            .map(String::as_str)
            .unwrap_or(slug)
    }
}

pub fn is_no_loader(loader: &str) -> bool {
    NO_LOADER.contains(&loader)
}
