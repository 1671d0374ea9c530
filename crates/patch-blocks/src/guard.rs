//! All-or-nothing commits.
//!
//! A pass loads the source, runs one recipe and writes the result back only
//! when the whole expected shape matched. Several recipes run as separate
//! passes, each starting from what the previous one left behind.

use std::fmt;
use std::path::{Path, PathBuf};

use patch_fs::io;

use crate::engine::{self, EditResult};
use crate::error::Result;
use crate::line::LineSequence;
use crate::recipe::Recipe;
use crate::store::LineStore;

/// What a pass does with a successful edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Persist successful edits.
    Write,
    /// Compute edits only. Later passes see earlier passes' output in memory.
    DryRun,
}

/// Report for one recipe applied to one source.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub recipe: String,
    pub path: PathBuf,
    pub before: LineSequence,
    pub result: EditResult,
    pub committed: bool,
}

impl PassReport {
    pub fn succeeded(&self) -> bool {
        self.result.found
    }

    /// The single human-readable status line for this pass.
    pub fn status_line(&self) -> String {
        if self.succeeded() {
            format!("Updated {}", self.recipe)
        } else {
            format!("Failed to update {} - Pattern not found", self.recipe)
        }
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_line())
    }
}

/// Write `result` through `store` if, and only if, it was found.
///
/// Returns whether anything was written.
pub fn commit_if_found(store: &LineStore, result: &EditResult) -> Result<bool> {
    if !result.found {
        tracing::info!(
            path = %store.path().display(),
            reason = ?result.reason,
            "shape not matched, source left untouched"
        );
        return Ok(false);
    }
    store.commit(&result.sequence)?;
    Ok(true)
}

/// Run one recipe as a full load-transform-store cycle.
pub fn run_pass(recipe: &Recipe, path: &Path, mode: PassMode) -> Result<PassReport> {
    let mut store = LineStore::new(path);
    let before = store.load()?;
    finish_pass(recipe, &store, before, mode)
}

/// Run recipes in order, each as its own pass over `path`.
///
/// The path is resolved once up front, so every report names the same file.
/// A failed pass does not stop later ones; I/O errors do.
pub fn run_passes(recipes: &[Recipe], path: &Path, mode: PassMode) -> Result<Vec<PassReport>> {
    let path = io::resolve(path)?;
    let mut reports: Vec<PassReport> = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let report = match (mode, reports.last()) {
            (PassMode::DryRun, Some(previous)) => {
                let store = LineStore::new(&path);
                finish_pass(recipe, &store, previous.result.sequence.clone(), mode)?
            }
            _ => run_pass(recipe, &path, mode)?,
        };
        reports.push(report);
    }
    Ok(reports)
}

fn finish_pass(
    recipe: &Recipe,
    store: &LineStore,
    before: LineSequence,
    mode: PassMode,
) -> Result<PassReport> {
    let result = engine::apply(recipe, &before)?;
    let committed = match mode {
        PassMode::Write => commit_if_found(store, &result)?,
        PassMode::DryRun => false,
    };
    Ok(PassReport {
        recipe: recipe.name.clone(),
        path: store.path().to_path_buf(),
        before,
        result,
        committed,
    })
}
