//! Error types for patch-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] patch_fs::Error),

    #[error("Invalid recipe '{name}': {message}")]
    InvalidRecipe { name: String, message: String },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}
