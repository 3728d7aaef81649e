//! Configuration module for inkpaste
//!
//! This module handles the persisted render defaults, including
//! serialization to/from JSON and storage in the platform-specific config
//! directory, plus user theme files in TOML.

mod persistence;
mod settings;
mod theme_file;

pub use persistence::*;
pub use settings::*;
pub use theme_file::*;
