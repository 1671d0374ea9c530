//! Presets command implementation

use colored::Colorize;

use patch_blocks::presets;

use crate::error::Result;

/// List the built-in presets.
pub fn run_presets() -> Result<()> {
    println!("{}", "Built-in presets".bold());
    println!();
    for preset in presets::all() {
        let recipe = preset.recipe()?;
        println!("  {} {}", format!("{:<18}", preset.id).cyan(), preset.summary);
        println!("  {:<18} anchor: {}", "", recipe.anchor.dimmed());
    }
    Ok(())
}
