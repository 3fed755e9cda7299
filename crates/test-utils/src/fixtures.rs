use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;
use treewatch::fs::{FileSystem, RealFileSystem};
use treewatch::watch::IgnoreFilter;

/// Ignores exactly one root-relative path (or nothing).
#[derive(Debug, Clone, Default)]
pub struct FakeIgnore {
    pub matches: Option<String>,
}

impl FakeIgnore {
    pub fn nothing() -> Self {
        Self { matches: None }
    }

    pub fn exactly(path: &str) -> Self {
        Self {
            matches: Some(path.to_string()),
        }
    }
}

impl IgnoreFilter for FakeIgnore {
    fn should_ignore(&self, rel_path: &str) -> bool {
        self.matches.as_deref() == Some(rel_path)
    }
}

/// A temporary directory tree to watch, driven through `RealFileSystem`.
///
/// `root()` is canonicalized, so it compares equal to the paths the OS
/// backend reports (macOS puts temp dirs behind a `/private` symlink).
#[derive(Debug)]
pub struct TestTree {
    _dir: TempDir,
    root: PathBuf,
    fs: RealFileSystem,
}

impl TestTree {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let fs = RealFileSystem;
        let root = fs.canonicalize(dir.path())?;
        Ok(Self {
            _dir: dir,
            root,
            fs,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn abs(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn mkdir(&self, rel: &str) -> Result<()> {
        self.fs.create_dir_all(&self.abs(rel))
    }

    /// Create `dir/file`, including parent directories. Returns `file`.
    pub fn create_file<'a>(&self, dir: &str, file: &'a str) -> Result<&'a str> {
        self.fs.create_file(&self.abs(dir).join(file))?;
        Ok(file)
    }

    pub fn rename_file(&self, dir: &str, old: &str, new: &str) -> Result<()> {
        let dir = self.abs(dir);
        self.fs.rename(&dir.join(old), &dir.join(new))
    }

    pub fn remove_file(&self, dir: &str, file: &str) -> Result<()> {
        self.fs.remove_file(&self.abs(dir).join(file))
    }
}
