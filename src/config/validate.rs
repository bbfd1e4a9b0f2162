// src/config/validate.rs

use crate::compile::CompileOptions;
use crate::config::model::{
    ConfigFile, RawConfigFile, StylesConfig, WatchConfig, WatchSection,
};
use crate::errors::{Result, StylewatchError};
use crate::types::{BusyPolicy, OutputStyle};
use crate::watch::SourcePatterns;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = StylewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let styles = validate_styles(&raw)?;
        let watch = validate_watch(raw.watch)?;
        Ok(ConfigFile::new_unchecked(styles, watch))
    }
}

fn validate_styles(raw: &RawConfigFile) -> Result<StylesConfig> {
    let section = &raw.styles;

    if section.entry.as_os_str().is_empty() {
        return Err(StylewatchError::ConfigError(
            "[styles].entry must not be empty".to_string(),
        ));
    }
    if section.dest.as_os_str().is_empty() {
        return Err(StylewatchError::ConfigError(
            "[styles].dest must not be empty (use \".\" for the project root)".to_string(),
        ));
    }
    if let Some(pos) = section
        .include_paths
        .iter()
        .position(|p| p.as_os_str().is_empty())
    {
        return Err(StylewatchError::ConfigError(format!(
            "[styles].include_paths[{pos}] must not be empty"
        )));
    }

    let output_style: OutputStyle = section
        .output_style
        .parse()
        .map_err(|e: String| StylewatchError::ConfigError(format!("[styles].{e}")))?;

    let options =
        CompileOptions::new(output_style, section.precision, section.include_paths.clone())?;

    Ok(StylesConfig {
        entry: section.entry.clone(),
        dest: section.dest.clone(),
        options,
    })
}

fn validate_watch(watch: WatchSection) -> Result<WatchConfig> {
    if watch.sources.is_empty() {
        return Err(StylewatchError::ConfigError(
            "[watch].sources must contain at least one glob pattern".to_string(),
        ));
    }

    if watch.queue_length == 0 {
        return Err(StylewatchError::ConfigError(
            "[watch].queue_length must be >= 1 (got 0)".to_string(),
        ));
    }

    let on_busy: BusyPolicy = watch
        .on_busy
        .parse()
        .map_err(|e: String| StylewatchError::ConfigError(format!("[watch].{e}")))?;

    // Surface bad globs at load time instead of when the watcher starts.
    SourcePatterns::new(&watch.sources, &watch.exclude)?;

    Ok(WatchConfig {
        sources: watch.sources,
        exclude: watch.exclude,
        use_hash: watch.use_hash,
        debounce_ms: watch.debounce_ms,
        on_busy,
        queue_length: watch.queue_length,
    })
}
