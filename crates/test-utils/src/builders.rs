use std::path::{Path, PathBuf};

use stylewatch::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults; every setter overrides one key.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn entry(mut self, path: impl AsRef<Path>) -> Self {
        self.config.styles.entry = path.as_ref().to_path_buf();
        self
    }

    pub fn dest(mut self, path: impl AsRef<Path>) -> Self {
        self.config.styles.dest = path.as_ref().to_path_buf();
        self
    }

    pub fn output_style(mut self, style: &str) -> Self {
        self.config.styles.output_style = style.to_string();
        self
    }

    pub fn precision(mut self, precision: i64) -> Self {
        self.config.styles.precision = precision;
        self
    }

    pub fn include_paths(mut self, paths: &[&str]) -> Self {
        self.config.styles.include_paths = paths.iter().map(PathBuf::from).collect();
        self
    }

    pub fn sources(mut self, patterns: &[&str]) -> Self {
        self.config.watch.sources = patterns.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn use_hash(mut self, val: bool) -> Self {
        self.config.watch.use_hash = val;
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.watch.debounce_ms = ms;
        self
    }

    /// `policy` is the raw `on_busy` string, so invalid values can be tested.
    pub fn on_busy(mut self, policy: &str, queue_length: usize) -> Self {
        self.config.watch.on_busy = policy.to_string();
        self.config.watch.queue_length = queue_length;
        self
    }

    /// The raw config, for tests that exercise validation failures.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
