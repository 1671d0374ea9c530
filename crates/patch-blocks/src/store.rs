//! Whole-file line store.

use std::path::{Path, PathBuf};

use patch_fs::{Error as FsError, checksum, io};

use crate::error::Result;
use crate::line::LineSequence;

/// Loads a source file as a [`LineSequence`] and writes one back.
///
/// The store fingerprints what it loaded. [`LineStore::commit`] refuses to
/// overwrite a file whose bytes changed since then.
#[derive(Debug, Clone)]
pub struct LineStore {
    path: PathBuf,
    loaded: Option<String>,
}

impl LineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole source.
    pub fn load(&mut self) -> Result<LineSequence> {
        let text = io::read_text(&self.path)?;
        self.loaded = Some(checksum::checksum_bytes(text.as_bytes()));
        let sequence = LineSequence::parse(&text);
        tracing::debug!(path = %self.path.display(), lines = sequence.len(), "loaded source");
        Ok(sequence)
    }

    /// Replace the source with `sequence`.
    pub fn commit(&self, sequence: &LineSequence) -> Result<()> {
        if let Some(expected) = &self.loaded {
            let actual = checksum::checksum_file(&self.path)?;
            if &actual != expected {
                return Err(FsError::SourceChanged {
                    path: self.path.clone(),
                    expected: expected.clone(),
                    actual,
                }
                .into());
            }
        }

        io::write_atomic(&self.path, sequence.render().as_bytes())?;
        tracing::info!(path = %self.path.display(), lines = sequence.len(), "committed source");
        Ok(())
    }
}
