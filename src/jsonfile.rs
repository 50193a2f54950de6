//! Pretty-printed JSON files with case-insensitive key order

use crate::Result;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Read a JSON file, returning `None` if it doesn't exist
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Write a value as pretty JSON terminated by a newline
pub fn write<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

fn sorted_entries<V>(map: &BTreeMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    entries
}

struct Sorted<'a, V>(&'a BTreeMap<String, V>);

impl<V: Serialize> Serialize for Sorted<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(sorted_entries(self.0))
    }
}

/// `serialize_with` helper emitting map keys in case-insensitive order
pub fn sorted_map<V, S>(
    map: &BTreeMap<String, V>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    Sorted(map).serialize(serializer)
}

/// Same as [`sorted_map`] for one level of nesting
pub fn sorted_nested_map<V, S>(
    map: &BTreeMap<String, BTreeMap<String, V>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    serializer.collect_map(
        sorted_entries(map)
            .into_iter()
            .map(|(key, inner)| (key, Sorted(inner))),
    )
}
