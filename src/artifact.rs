//! Installed artifact state on disk
//!
//! An artifact is either enabled (at its canonical path), disabled (canonical
//! path plus [`DISABLED_SUFFIX`]), or absent. Toggling is a rename, never a copy.

use crate::Result;
use sha2::{Digest, Sha512};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DISABLED_SUFFIX: &str = ".disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Enabled,
    Disabled,
    Absent,
}

impl ArtifactState {
    pub fn is_enabled(self) -> bool {
        self == ArtifactState::Enabled
    }

    pub fn is_present(self) -> bool {
        self != ArtifactState::Absent
    }
}

pub fn disabled_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(DISABLED_SUFFIX);
    PathBuf::from(name)
}

pub fn inspect(path: &Path) -> ArtifactState {
    if path.is_file() {
        ArtifactState::Enabled
    } else if disabled_path(path).is_file() {
        ArtifactState::Disabled
    } else {
        ArtifactState::Absent
    }
}

/// Move the artifact at `path` into the wanted state.
///
/// Returns the state the artifact was in before the call. Absent artifacts
/// are left alone.
pub fn set_enabled(path: &Path, enabled: bool) -> Result<ArtifactState> {
    let state = inspect(path);
    match (state, enabled) {
        (ArtifactState::Disabled, true) => {
            debug!("enabling {}", path.display());
            fs::rename(disabled_path(path), path)?;
        }
        (ArtifactState::Enabled, false) => {
            debug!("disabling {}", path.display());
            fs::rename(path, disabled_path(path))?;
        }
        _ => {}
    }
    Ok(state)
}

/// Delete a file, treating "already gone" as success.
///
/// Returns whether a file was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// SHA-512 of a file as lowercase hex, or `None` if it doesn't exist
pub fn file_hash(path: &Path) -> Result<Option<String>> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut hasher = Sha512::new();
    let mut buffer = vec![0; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Some(hex::encode(hasher.finalize())))
}

/// SHA-512 of an in-memory buffer as lowercase hex
pub fn bytes_hash(bytes: &[u8]) -> String {
    hex::encode(Sha512::digest(bytes))
}
