// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow};
use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(BTreeSet<String>), // child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    read_only_dirs: Vec<PathBuf>,
    writes: usize,
}

/// In-memory filesystem for tests.
///
/// Clones share state, so a test can keep one handle while the code under
/// test owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.lock()
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(BTreeSet::new()));
        fs
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test must not hide its own failure behind a poison error.
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.lock();
        insert_file(&mut state.entries, path.as_ref(), content.into());
    }

    /// Make every write below `dir` fail, like a read-only mount.
    pub fn deny_writes_under(&self, dir: impl AsRef<Path>) {
        self.lock().read_only_dirs.push(dir.as_ref().to_path_buf());
    }

    /// Contents of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock().entries.get(path.as_ref()) {
            Some(MockEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// Number of successful `write_atomic` calls.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }
}

fn parent_or_root(path: &Path) -> Option<&Path> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Some(Path::new(".")),
        Some(parent) if parent != path => Some(parent),
        _ => None,
    }
}

fn insert_file(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path, content: Vec<u8>) {
    entries.insert(path.to_path_buf(), MockEntry::File(content));
    link_into_parent(entries, path);
}

fn ensure_dir(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(BTreeSet::new()));
    link_into_parent(entries, path);
}

fn link_into_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let (Some(parent), Some(name)) = (parent_or_root(path), path.file_name()) else {
        return;
    };
    ensure_dir(entries, parent);
    if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
        children.insert(name.to_string_lossy().into_owned());
    }
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        match self.lock().entries.get(path) {
            Some(MockEntry::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut state = self.lock();
        if state.read_only_dirs.iter().any(|dir| path.starts_with(dir)) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        if let Some(MockEntry::Dir(_)) = state.entries.get(path) {
            return Err(anyhow!("Is a directory: {:?}", path));
        }
        insert_file(&mut state.entries, path, contents.to_vec());
        state.writes += 1;
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.lock().entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
