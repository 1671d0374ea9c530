//! Command implementations

mod apply;
mod check;
mod presets;

pub use apply::run_apply;
pub use check::run_check;
pub use presets::run_presets;

use patch_blocks::{Recipe, presets as builtin};

use crate::cli::TransformArgs;
use crate::error::{CliError, Result};

/// Presets first, then recipe files, each with the command-line overrides applied.
pub fn resolve_recipes(args: &TransformArgs) -> Result<Vec<Recipe>> {
    if args.presets.is_empty() && args.recipes.is_empty() {
        return Err(CliError::user(
            "no transform given: pass --preset <NAME> or --recipe <FILE>",
        ));
    }

    let mut recipes = Vec::with_capacity(args.presets.len() + args.recipes.len());
    for id in &args.presets {
        recipes.push(builtin::find(id)?);
    }
    for path in &args.recipes {
        recipes.push(Recipe::load(path)?);
    }

    Ok(recipes
        .into_iter()
        .map(|recipe| {
            let recipe = match args.nesting {
                Some(nesting) => recipe.with_nesting(nesting.into()),
                None => recipe,
            };
            if args.no_strict {
                recipe.with_strict(false)
            } else {
                recipe
            }
        })
        .collect())
}
