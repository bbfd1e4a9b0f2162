// src/config/loader.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StylewatchError};

/// Name of the config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Stylewatch.toml";

/// Load a configuration file and return the raw, unvalidated `RawConfigFile`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] for
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults for missing keys.
/// - Rejects unknown output styles and busy policies, out-of-range precision,
///   empty or invalid globs and a zero queue length with `ConfigError`.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the configuration for a CLI invocation.
///
/// - An explicitly requested file must exist.
/// - Without `--config`, `Stylewatch.toml` is used when present and the
///   built-in defaults otherwise.
///
/// Returns the config together with the path it was read from, if any.
pub fn load_for_cli(explicit: Option<&Path>) -> Result<(ConfigFile, Option<PathBuf>)> {
    let path = explicit.map_or_else(default_config_path, Path::to_path_buf);

    match load_and_validate(&path) {
        Ok(cfg) => Ok((cfg, Some(path))),
        Err(StylewatchError::IoError(err)) if err.kind() == ErrorKind::NotFound => {
            if explicit.is_some() {
                return Err(StylewatchError::ConfigError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "no config file; using built-in defaults");
            Ok((ConfigFile::default(), None))
        }
        Err(err) => Err(err),
    }
}

/// Default config path (`Stylewatch.toml` in the working directory).
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Directory relative paths in a config are resolved against.
///
/// - For `site/Stylewatch.toml` this is `site`.
/// - For a bare file name, or no config file at all, it is the working
///   directory.
pub fn project_root(config_path: Option<&Path>) -> PathBuf {
    match config_path.and_then(Path::parent) {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
