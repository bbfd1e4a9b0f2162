// src/errors.rs

//! Crate-wide error type.
//!
//! `NotFound`, `CompileError` and `OutputError` are the ways a single compile
//! fails. `ConfigError` is raised before anything runs; the rest carry
//! lower-level failures.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StylewatchError {
    #[error("Entry stylesheet not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Compile error: {0}")]
    CompileError(String),

    #[error("Failed to write output: {0}")]
    OutputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StylewatchError>;
