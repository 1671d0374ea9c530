//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use patch_blocks::NestingMode;

/// blockpatch - rewrite anchored blocks in source files, all or nothing
#[derive(Parser, Debug)]
#[command(name = "blockpatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Apply transforms to a source file
    ///
    /// Each transform runs as its own pass and prints one status line.
    /// The file is only written when a transform's whole shape matched.
    ///
    /// Examples:
    ///   blockpatch apply -s src/pages/Dashboard.tsx -p audit-checklist -p certificates
    ///   blockpatch apply -s page.tsx -r card.toml --dry-run
    Apply {
        #[command(flatten)]
        transform: TransformArgs,

        /// Show the diff instead of writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Report whether transforms would match, without writing
    Check {
        #[command(flatten)]
        transform: TransformArgs,
    },

    /// List built-in presets
    Presets,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Source and transforms shared by `apply` and `check`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TransformArgs {
    /// File to transform
    #[arg(short, long, env = "BLOCKPATCH_SOURCE")]
    pub source: PathBuf,

    /// Recipe file (TOML, JSON or YAML); repeatable
    #[arg(short = 'r', long = "recipe", env = "BLOCKPATCH_RECIPE", value_delimiter = ',')]
    pub recipes: Vec<PathBuf>,

    /// Built-in preset; repeatable, runs before recipe files
    #[arg(short = 'p', long = "preset")]
    pub presets: Vec<String>,

    /// Override every recipe's nesting mode
    #[arg(long, value_enum)]
    pub nesting: Option<NestingArg>,

    /// Commit even when nesting diagnostics were raised
    #[arg(long)]
    pub no_strict: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingArg {
    Indentation,
    Balanced,
}

impl From<NestingArg> for NestingMode {
    fn from(arg: NestingArg) -> Self {
        match arg {
            NestingArg::Indentation => NestingMode::Indentation,
            NestingArg::Balanced => NestingMode::Balanced,
        }
    }
}
