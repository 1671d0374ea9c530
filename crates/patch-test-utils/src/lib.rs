//! Shared test fixtures for the blockpatch workspace.
//!
//! A dev-dependency only, never published.
//!
//! - [`source`]: [`source::TestSource`], a scratch source file in a temp dir
//! - [`fixtures`]: sample documents shaped like the files the presets target

pub mod fixtures;
pub mod source;
