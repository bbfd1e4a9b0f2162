// src/watch/hash.rs

//! Content fingerprinting for `use_hash = true`.
//!
//! Editors often touch a file without changing it (save without edits,
//! metadata updates). With hashing enabled the watcher only forwards a batch
//! when the combined content of all watched sources actually changed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::patterns::{SourcePatterns, collect_matching_files};

/// Hash of a single file's content, hex encoded.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut reader = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut hasher = Hasher::new();
    std::io::copy(&mut reader, &mut hasher)
        .with_context(|| format!("reading file for hashing: {:?}", path))?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Combine per-file hashes into one.
///
/// Each file contributes its path as well as its content hash, so renaming
/// a partial counts as a change. `entries` must be sorted by path.
pub fn compute_aggregate_hash(entries: &[(PathBuf, String)]) -> String {
    let mut hasher = Hasher::new();
    for (path, hash) in entries {
        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update(&[0]);
        hasher.update(hash.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Last known aggregate hash of every watched source file. In memory only.
#[derive(Debug, Default)]
pub struct SourceFingerprint {
    last: Option<String>,
}

impl SourceFingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current aggregate hash of all files under `root` matched by
    /// `patterns`.
    pub fn compute(
        fs: &dyn FileSystem,
        root: &Path,
        patterns: &SourcePatterns,
    ) -> Result<String> {
        let files = collect_matching_files(fs, root, patterns)?;
        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let hash = compute_file_hash(fs, &file)?;
            entries.push((file, hash));
        }
        let aggregate = compute_aggregate_hash(&entries);
        debug!(files = entries.len(), hash = %aggregate, "computed source fingerprint");
        Ok(aggregate)
    }

    /// Record the current state without reporting a change.
    pub fn seed(&mut self, fs: &dyn FileSystem, root: &Path, patterns: &SourcePatterns) -> Result<()> {
        self.last = Some(Self::compute(fs, root, patterns)?);
        Ok(())
    }

    /// Recompute and report whether anything changed since the last call.
    ///
    /// An unseeded fingerprint always reports a change.
    pub fn refresh(
        &mut self,
        fs: &dyn FileSystem,
        root: &Path,
        patterns: &SourcePatterns,
    ) -> Result<bool> {
        let current = Self::compute(fs, root, patterns)?;
        let changed = self.last.as_deref() != Some(current.as_str());
        self.last = Some(current);
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn scss_patterns() -> SourcePatterns {
        SourcePatterns::new(&["scss/*.scss".to_string()], &[]).unwrap()
    }

    #[test]
    fn file_hash_is_blake3_of_content() {
        let fs = MockFileSystem::new();
        fs.add_file("test.txt", b"hello world".to_vec());

        let hash = compute_file_hash(&fs, Path::new("test.txt")).unwrap();
        assert_eq!(
            hash,
            "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24"
        );
    }

    #[test]
    fn refresh_detects_content_changes_only() {
        let fs = MockFileSystem::new();
        fs.add_file("./scss/main.scss", "a { color: red; }");
        fs.add_file("./scss/_vars.scss", "$x: 1;");
        let root = Path::new(".");
        let patterns = scss_patterns();

        let mut fp = SourceFingerprint::new();
        fp.seed(&fs, root, &patterns).unwrap();

        // Same content rewritten.
        fs.add_file("./scss/main.scss", "a { color: red; }");
        assert!(!fp.refresh(&fs, root, &patterns).unwrap());

        // Unwatched file changed.
        fs.add_file("./notes.md", "hi");
        assert!(!fp.refresh(&fs, root, &patterns).unwrap());

        fs.add_file("./scss/_vars.scss", "$x: 2;");
        assert!(fp.refresh(&fs, root, &patterns).unwrap());
        assert!(!fp.refresh(&fs, root, &patterns).unwrap());
    }

    #[test]
    fn new_partial_counts_as_change() {
        let fs = MockFileSystem::new();
        fs.add_file("./scss/main.scss", "a {}");
        let root = Path::new(".");
        let patterns = scss_patterns();

        let mut fp = SourceFingerprint::new();
        assert!(fp.refresh(&fs, root, &patterns).unwrap(), "unseeded reports change");

        fs.add_file("./scss/_empty.scss", "");
        assert!(fp.refresh(&fs, root, &patterns).unwrap());
    }
}
