//! Apply command implementation

use colored::Colorize;
use similar::{ChangeTag, TextDiff};

use patch_blocks::{PassMode, PassReport, run_passes};

use super::resolve_recipes;
use crate::cli::TransformArgs;
use crate::error::Result;

/// Run the apply command.
///
/// Returns whether every transform matched.
pub fn run_apply(args: &TransformArgs, dry_run: bool) -> Result<bool> {
    let recipes = resolve_recipes(args)?;
    let mode = if dry_run {
        PassMode::DryRun
    } else {
        PassMode::Write
    };

    let reports = run_passes(&recipes, &args.source, mode)?;
    for report in &reports {
        log_report(report);
        if dry_run {
            print_dry_run(report);
        } else {
            print_status(report);
        }
    }

    Ok(reports.iter().all(PassReport::succeeded))
}

fn log_report(report: &PassReport) {
    if let Some(reason) = report.result.reason {
        tracing::debug!(recipe = %report.recipe, %reason, "transform failed");
    }
    for diagnostic in &report.result.diagnostics {
        tracing::debug!(recipe = %report.recipe, %diagnostic, "nesting diagnostic");
    }
}

fn print_status(report: &PassReport) {
    let line = report.status_line();
    if report.succeeded() {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
    }
}

fn print_dry_run(report: &PassReport) {
    if !report.succeeded() {
        print_status(report);
        return;
    }

    let before = report.before.render();
    let after = report.result.sequence.render();
    let path = report.path.display().to_string();
    let diff = TextDiff::from_lines(&before, &after);

    println!("{}", format!("--- {path}").bold());
    println!("{}", format!("+++ {path} ({})", report.recipe).bold());
    for group in diff.grouped_ops(3) {
        for op in group {
            for change in diff.iter_changes(&op) {
                let text = change.value().trim_end_matches(['\r', '\n']);
                match change.tag() {
                    ChangeTag::Delete => println!("{}", format!("-{text}").red()),
                    ChangeTag::Insert => println!("{}", format!("+{text}").green()),
                    ChangeTag::Equal => println!(" {text}"),
                }
            }
        }
        println!("{}", "...".dimmed());
    }
    println!(
        "{} Would update {}",
        "[dry-run]".yellow(),
        report.recipe.cyan()
    );
}
