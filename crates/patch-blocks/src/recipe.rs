//! Transform recipes.
//!
//! A [`Recipe`] describes one structural transform: which anchor to look
//! for, how to rewrite the container that follows it, and which interior
//! regions to drop or unwrap. Recipes are plain serde data so they can be
//! loaded from TOML, JSON or YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use patch_fs::ConfigStore;

/// How block and region boundaries are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestingMode {
    /// Close lines are recognised by exact indentation; regions end at the
    /// next line containing the close token.
    Indentation,
    /// Open and close delimiters are counted; boundaries are where depth
    /// returns to its starting value.
    #[default]
    Balanced,
}

impl std::fmt::Display for NestingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indentation => write!(f, "indentation"),
            Self::Balanced => write!(f, "balanced"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    /// Label used in status lines (`Updated <name>`).
    pub name: String,
    /// Substring that marks the line right before the container.
    pub anchor: String,
    #[serde(default)]
    pub nesting: NestingMode,
    /// Treat nesting ambiguities as failures.
    #[serde(default = "default_strict")]
    pub strict: bool,
    pub open: OpenRule,
    pub close: CloseRule,
    #[serde(default)]
    pub regions: Vec<RegionRule>,
}

fn default_strict() -> bool {
    true
}

/// The container-open line and what replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRule {
    pub token: String,
    pub replacement: String,
    /// Fixed fragment emitted right after the rewritten open line.
    #[serde(default)]
    pub inject: Option<String>,
}

/// The container-close line and what replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloseRule {
    pub token: String,
    pub replacement: String,
    /// Exact leading whitespace required of the close line in
    /// [`NestingMode::Indentation`]. Defaults to the open line's indent.
    #[serde(default)]
    pub indent: Option<String>,
}

/// A marked sub-region inside the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionRule {
    pub name: String,
    pub trigger: String,
    #[serde(default)]
    pub extent: Extent,
    #[serde(default)]
    pub action: RegionAction,
    #[serde(default)]
    pub title: Option<TitleRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extent {
    /// Only the trigger line.
    Line,
    /// The trigger line through the line that closes it.
    #[default]
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionAction {
    /// Every line of the region is removed.
    #[default]
    Drop,
    /// Trigger and title lines are removed, interior lines are kept and the
    /// region's close token is replaced.
    Unwrap { close_replacement: String },
}

/// A title line expected right after the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TitleRule {
    pub marker: String,
    /// When set, the region only fires if the title line is present.
    #[serde(default)]
    pub required: bool,
}

impl Recipe {
    /// Load and validate a recipe file.
    pub fn load(path: &Path) -> Result<Self> {
        let recipe: Recipe = ConfigStore::new().load(path)?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Reject recipes the engine cannot run meaningfully.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Error::InvalidRecipe {
            name: self.name.clone(),
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name is empty".into()));
        }
        for (field, value) in [
            ("anchor", &self.anchor),
            ("open.token", &self.open.token),
            ("close.token", &self.close.token),
        ] {
            if value.is_empty() {
                return Err(invalid(format!("{field} is empty")));
            }
        }
        if let Some(indent) = &self.close.indent {
            if !indent.chars().all(char::is_whitespace) {
                return Err(invalid("close.indent must be whitespace only".into()));
            }
        }

        for region in &self.regions {
            if region.trigger.is_empty() {
                return Err(invalid(format!("region '{}' has an empty trigger", region.name)));
            }
            if region.extent == Extent::Line {
                if region.action != RegionAction::Drop {
                    return Err(invalid(format!(
                        "region '{}': single-line regions can only be dropped",
                        region.name
                    )));
                }
                if region.title.is_some() {
                    return Err(invalid(format!(
                        "region '{}': single-line regions cannot have a title",
                        region.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Copy of this recipe with a different nesting mode.
    pub fn with_nesting(mut self, nesting: NestingMode) -> Self {
        self.nesting = nesting;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patch_fs::config::Format;

    const MINIMAL: &str = r#"
name = "Audit Checklist"
anchor = "activeTab === 'Audit Checklist'"

[open]
token = "<div>"
replacement = '<Card title="Audit Checklist">'

[close]
token = "</div>"
replacement = "</Card>"

[[regions]]
name = "header"
trigger = "mb-4"
action = { unwrap = { close_replacement = "}>" } }
title = { marker = "</h3>", required = true }

[[regions]]
name = "edit heading"
trigger = "Edit Training"
extent = "line"
"#;

    fn parse(text: &str) -> Recipe {
        ConfigStore::new().parse(text, Format::Toml).unwrap()
    }

    #[test]
    fn defaults_apply() {
        let recipe = parse(MINIMAL);
        assert_eq!(recipe.nesting, NestingMode::Balanced);
        assert!(recipe.strict);
        assert_eq!(recipe.open.inject, None);
        assert_eq!(recipe.regions[1].action, RegionAction::Drop);
        assert_eq!(recipe.regions[1].extent, Extent::Line);
        recipe.validate().unwrap();
    }

    #[test]
    fn unwrap_action_parses() {
        let recipe = parse(MINIMAL);
        assert_eq!(
            recipe.regions[0].action,
            RegionAction::Unwrap {
                close_replacement: "}>".into()
            }
        );
        assert!(recipe.regions[0].title.as_ref().unwrap().required);
    }

    #[test]
    fn empty_anchor_rejected() {
        let mut recipe = parse(MINIMAL);
        recipe.anchor.clear();
        assert!(matches!(
            recipe.validate(),
            Err(Error::InvalidRecipe { message, .. }) if message == "anchor is empty"
        ));
    }

    #[test]
    fn line_extent_cannot_unwrap() {
        let mut recipe = parse(MINIMAL);
        recipe.regions[1].action = RegionAction::Unwrap {
            close_replacement: "x".into(),
        };
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn non_whitespace_indent_rejected() {
        let mut recipe = parse(MINIMAL);
        recipe.close.indent = Some("  x".into());
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn unknown_field_rejected() {
        let text = MINIMAL.replace("[close]", "bogus = 1\n[close]");
        let result: std::result::Result<Recipe, String> =
            ConfigStore::new().parse(&text, Format::Toml);
        assert!(result.is_err());
    }
}
