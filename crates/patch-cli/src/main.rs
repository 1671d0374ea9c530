//! blockpatch CLI
//!
//! Applies anchor-driven block rewrites to source files.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

/// Exit status when a transform's pattern was not found.
const EXIT_PATTERN_NOT_FOUND: i32 = 2;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_PATTERN_NOT_FOUND),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            if e.is_conflict() {
                eprintln!(
                    "{}: nothing was written; re-run against the current contents",
                    "hint".yellow()
                );
            }
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} rewrite anchored blocks, all or nothing", "blockpatch".green().bold());
            println!();
            println!("Run {} for available commands.", "blockpatch --help".cyan());
            Ok(true)
        }
    }
}

fn execute_command(cmd: Commands) -> Result<bool> {
    match cmd {
        Commands::Apply { transform, dry_run } => commands::run_apply(&transform, dry_run),
        Commands::Check { transform } => commands::run_check(&transform),
        Commands::Presets => commands::run_presets().map(|()| true),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "blockpatch",
                &mut std::io::stdout(),
            );
            Ok(true)
        }
    }
}
