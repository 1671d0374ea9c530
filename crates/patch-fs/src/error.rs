//! Error types for patch-fs

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A recipe file that exists but does not deserialize.
    #[error("Invalid {format} in {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Recipe files must be .toml, .json, .yaml or .yml (got '{extension}')")]
    UnsupportedFormat { extension: String },

    #[error("Could not lock {path} for writing")]
    LockFailed { path: PathBuf },

    /// The file on disk no longer matches the checksum taken at load time.
    #[error("{path} changed on disk since it was loaded (expected {expected}, found {actual})")]
    SourceChanged {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the source was edited underneath a pending commit.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::SourceChanged { .. })
    }
}
