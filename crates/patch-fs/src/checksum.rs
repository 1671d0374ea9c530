//! SHA-256 checksums in the canonical `sha256:<hex>` form.
//!
//! The line store fingerprints the bytes it loaded so a commit can tell
//! whether the source was touched in between.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{Error, Result};

const PREFIX: &str = "sha256:";

/// Checksum of in-memory bytes.
pub fn checksum_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Checksum of a file's current on-disk contents.
pub fn checksum_file(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(checksum_bytes(&content))
}
