// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::compile::CompileOptions;
use crate::types::BusyPolicy;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [styles]
/// entry = "scss/main.scss"
/// dest = "."
/// output_style = "nested"
/// precision = 10
/// include_paths = ["."]
///
/// [watch]
/// sources = ["scss/*.scss"]
/// ```
///
/// Every key is optional; the defaults reproduce the classic
/// `scss/main.scss -> ./main.css` setup.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub styles: StylesSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// `[styles]` section. Values are kept loosely typed here so that bad
/// values surface as configuration errors rather than TOML errors.
#[derive(Debug, Clone, Deserialize)]
pub struct StylesSection {
    #[serde(default = "default_entry")]
    pub entry: PathBuf,

    #[serde(default = "default_dest")]
    pub dest: PathBuf,

    /// `"nested"`, `"compact"`, `"expanded"` or `"compressed"`.
    #[serde(default = "default_output_style")]
    pub output_style: String,

    /// Decimal digits kept in numeric results. Must be in `1..=100`.
    #[serde(default = "default_precision")]
    pub precision: i64,

    /// Directories searched, in order, when resolving `@import`/`@use`.
    #[serde(default = "default_include_paths")]
    pub include_paths: Vec<PathBuf>,
}

fn default_entry() -> PathBuf {
    PathBuf::from("scss/main.scss")
}

fn default_dest() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_style() -> String {
    "nested".to_string()
}

fn default_precision() -> i64 {
    10
}

fn default_include_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

impl Default for StylesSection {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            dest: default_dest(),
            output_style: default_output_style(),
            precision: default_precision(),
            include_paths: default_include_paths(),
        }
    }
}

/// `[watch]` section. Loosely typed like `[styles]`.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Glob patterns (relative to the project root) whose changes trigger a
    /// compile.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// Glob patterns removed from `sources`.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Only compile when the content of the watched files actually changed.
    #[serde(default)]
    pub use_hash: bool,

    /// Window for batching raw filesystem events. `0` disables batching.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// `"coalesce"` or `"serialize"`.
    #[serde(default = "default_on_busy")]
    pub on_busy: String,

    /// Maximum number of queued compiles under `on_busy = "serialize"`.
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,
}

fn default_sources() -> Vec<String> {
    vec!["scss/*.scss".to_string()]
}

fn default_debounce_ms() -> u64 {
    50
}

fn default_on_busy() -> String {
    "coalesce".to_string()
}

fn default_queue_length() -> usize {
    1
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            exclude: Vec::new(),
            use_hash: false,
            debounce_ms: default_debounce_ms(),
            on_busy: default_on_busy(),
            queue_length: default_queue_length(),
        }
    }
}

/// Validated `[styles]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesConfig {
    pub entry: PathBuf,
    pub dest: PathBuf,
    pub options: CompileOptions,
}

/// Validated `[watch]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub sources: Vec<String>,
    pub exclude: Vec<String>,
    pub use_hash: bool,
    pub debounce_ms: u64,
    pub on_busy: BusyPolicy,
    pub queue_length: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            exclude: Vec::new(),
            use_hash: false,
            debounce_ms: default_debounce_ms(),
            on_busy: BusyPolicy::default(),
            queue_length: default_queue_length(),
        }
    }
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    styles: StylesConfig,
    watch: WatchConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(styles: StylesConfig, watch: WatchConfig) -> Self {
        Self { styles, watch }
    }

    pub fn styles(&self) -> &StylesConfig {
        &self.styles
    }

    pub fn watch(&self) -> &WatchConfig {
        &self.watch
    }

    /// Resolve every relative path against `root`.
    ///
    /// Glob patterns stay relative; they are matched against paths relative
    /// to the same root by the watcher.
    pub fn rooted_at(&self, root: &Path) -> ConfigFile {
        let styles = StylesConfig {
            entry: root.join(&self.styles.entry),
            dest: root.join(&self.styles.dest),
            options: self.styles.options.rooted_at(root),
        };
        ConfigFile::new_unchecked(styles, self.watch.clone())
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let styles = StylesConfig {
            entry: default_entry(),
            dest: default_dest(),
            options: CompileOptions::default(),
        };
        ConfigFile::new_unchecked(styles, WatchConfig::default())
    }
}
