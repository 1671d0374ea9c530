//! Forward anchor scanning.

use crate::line::LineSequence;

/// Returns the position of the first line at or after `cursor` that
/// contains `needle`.
///
/// The scan never wraps and never looks behind `cursor`. A cursor past the
/// end yields `None`.
pub fn scan(sequence: &LineSequence, cursor: usize, needle: &str) -> Option<usize> {
    sequence
        .lines()
        .get(cursor..)?
        .iter()
        .find(|line| line.contains(needle))
        .map(|line| line.index)
}
