//! Check command implementation
//!
//! Runs every transform without writing and explains failures.

use colored::Colorize;

use patch_blocks::{PassMode, run_passes};

use super::resolve_recipes;
use crate::cli::TransformArgs;
use crate::error::Result;

/// Run the check command.
///
/// Returns whether every transform would match.
pub fn run_check(args: &TransformArgs) -> Result<bool> {
    let recipes = resolve_recipes(args)?;
    let reports = run_passes(&recipes, &args.source, PassMode::DryRun)?;

    for (recipe, report) in recipes.iter().zip(&reports) {
        let result = &report.result;
        match (result.found, result.reason) {
            (true, _) => {
                let span = result
                    .span
                    .map(|s| format!(" (lines {}-{})", s.start + 1, s.end))
                    .unwrap_or_default();
                println!(
                    "{} {}{} [{}]",
                    "OK".green().bold(),
                    report.recipe,
                    span,
                    recipe.nesting
                );
                for region in &result.regions {
                    println!(
                        "   {} {} (lines {}-{})",
                        if region.unwrapped { "unwrap" } else { "drop" }.dimmed(),
                        region.rule,
                        region.start + 1,
                        region.end
                    );
                }
            }
            (false, reason) => {
                let reason = reason.map(|r| r.to_string()).unwrap_or_default();
                println!("{} {}: {}", "FAIL".red().bold(), report.recipe, reason);
            }
        }
        for diagnostic in &result.diagnostics {
            println!("   {} {}", "warning:".yellow(), diagnostic);
        }
    }

    Ok(reports.iter().all(|r| r.succeeded()))
}
