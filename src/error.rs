use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("The path {} is already used by the directory \"{existing}\"", .path.display())]
    DuplicatePath { path: PathBuf, existing: String },

    #[error("The directory \"{0}\" is not defined\n\n\
             Hint: Register the installation first:\n\
             mcsmp add {0} /path/to/.minecraft")]
    UnknownDirectory(String),

    #[error("The path of the directory \"{name}\" doesn't exist: {}", .path.display())]
    PathMissing { name: String, path: PathBuf },

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("The directory \"{0}\" has no defined game version\n\n\
             Hint: mcsmp version {0} <game_version>")]
    MissingGameVersion(String),

    #[error("The directory \"{0}\" has no defined loader\n\n\
             Hint: mcsmp loader {0} <loader>")]
    MissingLoader(String),

    #[error("The directory \"{0}\" has no defined shader loader\n\n\
             Hint: mcsmp shader-loader {0} <loader>")]
    MissingShaderLoader(String),

    #[error("The world \"{world}\" doesn't exist in {}", .path.display())]
    WorldNotFound { world: String, path: PathBuf },

    #[error("Checksum mismatch for {file}!\nExpected: {expected}\nComputed: {computed}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        computed: String,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is an unmet installation precondition
    /// (game version, loader, shader loader or world).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::MissingGameVersion(_)
                | Error::MissingLoader(_)
                | Error::MissingShaderLoader(_)
                | Error::WorldNotFound { .. }
        )
    }
}
