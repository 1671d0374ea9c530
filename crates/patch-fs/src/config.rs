//! Format-agnostic loading of recipe files

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::{Error, Result, io};

/// Loads serde types from TOML, JSON or YAML files.
///
/// The format is picked from the file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a value from a file.
    ///
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let format = Format::from_extension(&extension).ok_or_else(|| Error::UnsupportedFormat {
            extension: extension.clone(),
        })?;

        let content = io::read_text(path)?;
        self.parse(&content, format)
            .map_err(|message| Error::ConfigParse {
                path: path.to_path_buf(),
                format: format.label().into(),
                message,
            })
    }

    /// Parse a value from text already in memory.
    pub fn parse<T: DeserializeOwned>(
        &self,
        content: &str,
        format: Format,
    ) -> std::result::Result<T, String> {
        match format {
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Supported config encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}
