//! Built-in recipes.

use patch_fs::ConfigStore;
use patch_fs::config::Format;

use crate::error::{Error, Result};
use crate::recipe::Recipe;

/// A recipe shipped with the crate.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub id: &'static str,
    pub summary: &'static str,
    source: &'static str,
}

impl Preset {
    /// Parse and validate the embedded recipe.
    pub fn recipe(&self) -> Result<Recipe> {
        let recipe: Recipe = ConfigStore::new()
            .parse(self.source, Format::Toml)
            .map_err(|message| Error::InvalidRecipe {
                name: self.id.to_string(),
                message,
            })?;
        recipe.validate()?;
        Ok(recipe)
    }
}

const PRESETS: &[Preset] = &[
    Preset {
        id: "audit-checklist",
        summary: "Card-wrap the Audit Checklist tab, hoisting its header buttons",
        source: include_str!("../presets/audit-checklist.toml"),
    },
    Preset {
        id: "certificates",
        summary: "Card-wrap the Certificates and CTE tab with an edit/save title action",
        source: include_str!("../presets/certificates.toml"),
    },
];

pub fn all() -> &'static [Preset] {
    PRESETS
}

/// Look a preset up by id.
pub fn find(id: &str) -> Result<Recipe> {
    PRESETS
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| Error::UnknownPreset(id.to_string()))?
        .recipe()
}
