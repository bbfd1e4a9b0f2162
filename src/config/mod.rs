// src/config/mod.rs

//! Configuration loading and validation for stylewatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate values into strongly typed settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    DEFAULT_CONFIG_FILE, load_and_validate, load_for_cli, load_from_path, project_root,
};
pub use model::{
    ConfigFile, RawConfigFile, StylesConfig, StylesSection, WatchConfig, WatchSection,
};
