// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::WatchConfig;
use crate::errors::{Result, StylewatchError};
use crate::fs::FileSystem;

/// Compiled `sources` / `exclude` glob patterns.
///
/// Patterns are relative to the project root and matched against relative,
/// forward-slash paths such as `"scss/_colors.scss"`. A `*` never crosses a
/// directory boundary; use `**` for that.
#[derive(Clone)]
pub struct SourcePatterns {
    sources: Vec<String>,
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for SourcePatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePatterns")
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

impl SourcePatterns {
    pub fn new(sources: &[String], exclude: &[String]) -> Result<Self> {
        let watch_set = build_globset(sources)?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude)?)
        };

        Ok(Self {
            sources: sources.to_vec(),
            watch_set,
            exclude_set,
        })
    }

    pub fn from_config(watch: &WatchConfig) -> Result<Self> {
        Self::new(&watch.sources, &watch.exclude)
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// True if a change to `rel_path` should trigger a compile.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        match &self.exclude_set {
            Some(exclude) => !exclude.is_match(rel_path),
            None => true,
        }
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .map_err(|e| {
                StylewatchError::ConfigError(format!("invalid glob pattern {pat:?}: {e}"))
            })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| StylewatchError::ConfigError(format!("building glob set: {e}")))
}

/// Convert `path` into a forward-slash string relative to `root`.
///
/// Falls back to comparing canonical paths, since notify may report a
/// different absolute prefix for the same directory (symlinks, macOS
/// `/private/var`). Returns `None` if `path` is not under `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let to_slash = |rel: &Path| rel.to_string_lossy().replace('\\', "/");

    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slash(rel));
    }

    let root_canon = root.canonicalize().ok()?;
    let path_canon = path.canonicalize().ok()?;
    path_canon.strip_prefix(&root_canon).ok().map(to_slash)
}

/// Collect all files under `root` matched by `patterns`, sorted by path.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &SourcePatterns,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                let Ok(rel) = path.strip_prefix(root) else {
                    continue;
                };
                let rel_str = rel.to_string_lossy().replace('\\', "/");
                if patterns.matches(&rel_str) {
                    files.push(path);
                }
            }
        }
    }

    files.sort();
    Ok(files)
}
