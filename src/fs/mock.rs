// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEntry {
    File,
    Dir,
}

/// In-memory tree keyed by lexically normalized absolute paths.
///
/// Paths are taken as given: `canonicalize` only normalizes `.` and `..`
/// and never follows links, so tests should use absolute paths.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<BTreeMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.lock();
        insert_with_parents(&mut entries, &normalize(path.as_ref()), MockEntry::Dir);
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let mut entries = self.lock();
        insert_with_parents(&mut entries, &normalize(path.as_ref()), MockEntry::File);
    }

    pub fn entry(&self, path: impl AsRef<Path>) -> Option<MockEntry> {
        self.lock().get(&normalize(path.as_ref())).copied()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, MockEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn insert_with_parents(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path, entry: MockEntry) {
    let mut parent = path.parent();
    while let Some(dir) = parent {
        if dir.as_os_str().is_empty() {
            break;
        }
        entries.entry(dir.to_path_buf()).or_insert(MockEntry::Dir);
        parent = dir.parent();
    }
    entries.insert(path.to_path_buf(), entry);
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(&normalize(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(&normalize(path)), Some(MockEntry::Dir))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let path = normalize(path);
        if self.lock().contains_key(&path) {
            Ok(path)
        } else {
            Err(anyhow!("No such file or directory: {:?}", path))
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = normalize(path);
        let mut entries = self.lock();
        if let Some(MockEntry::File) = entries.get(&path) {
            return Err(anyhow!("Not a directory: {:?}", path));
        }
        insert_with_parents(&mut entries, &path, MockEntry::Dir);
        Ok(())
    }

    fn create_file(&self, path: &Path) -> Result<()> {
        let path = normalize(path);
        let mut entries = self.lock();
        if let Some(MockEntry::Dir) = entries.get(&path) {
            return Err(anyhow!("Is a directory: {:?}", path));
        }
        insert_with_parents(&mut entries, &path, MockEntry::File);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from = normalize(from);
        let to = normalize(to);
        let mut entries = self.lock();
        if !entries.contains_key(&from) {
            return Err(anyhow!("File not found: {:?}", from));
        }

        let moved: Vec<(PathBuf, MockEntry)> = entries
            .iter()
            .filter(|(p, _)| p.starts_with(&from))
            .map(|(p, e)| (p.clone(), *e))
            .collect();
        for (old, entry) in moved {
            entries.remove(&old);
            let rest = old.strip_prefix(&from).unwrap_or(Path::new(""));
            let new = if rest.as_os_str().is_empty() {
                to.clone()
            } else {
                to.join(rest)
            };
            insert_with_parents(&mut entries, &new, entry);
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let path = normalize(path);
        let mut entries = self.lock();
        match entries.get(&path) {
            Some(MockEntry::File) => {
                entries.remove(&path);
                Ok(())
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let path = normalize(path);
        let mut entries = self.lock();
        if !entries.contains_key(&path) {
            return Err(anyhow!("Not a directory or not found: {:?}", path));
        }
        entries.retain(|p, _| !p.starts_with(&path));
        Ok(())
    }
}
