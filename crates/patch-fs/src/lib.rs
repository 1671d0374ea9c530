//! Filesystem layer for blockpatch
//!
//! Whole-file reads, lock-guarded atomic writes, content checksums and
//! format-agnostic loading of recipe files.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, Result};
