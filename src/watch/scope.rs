// src/watch/scope.rs

//! Path scoping: absolute backend paths to root-relative event names.

use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, ScopeFault, WatchError};

/// Scoping context of one watch session.
///
/// - `root` is the (canonical) watch root all names are relative to.
/// - `subpath` is the normalized, `/`-separated subtree being watched, or
///   `"."` for the whole root.
/// - `base` is `root` joined with `subpath`, the directory handed to the
///   backend.
/// - `alias`, if set, is a second spelling of `root` that backends may
///   report (the root as the caller wrote it, before symlinks in its
///   ancestors were resolved).
///
/// Scoping never touches the filesystem: a path is inside the root only if
/// it is lexically below `root` or `alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoper {
    root: PathBuf,
    alias: Option<PathBuf>,
    subpath: String,
    base: PathBuf,
}

impl Scoper {
    /// Resolve `sub` against `root`.
    ///
    /// Purely lexical: `.` components are dropped and `..` is folded, but
    /// the result must stay inside `root`. Existence is checked by the
    /// caller through the filesystem abstraction.
    pub fn resolve(root: impl Into<PathBuf>, sub: &str) -> Result<Self> {
        let root = root.into();
        let mut parts: Vec<String> = Vec::new();

        for component in Path::new(sub).components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(WatchError::InvalidSubpath {
                            path: sub.to_string(),
                            reason: "escapes the watch root".to_string(),
                        });
                    }
                }
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(WatchError::InvalidSubpath {
                        path: sub.to_string(),
                        reason: "must be relative to the watch root".to_string(),
                    });
                }
            }
        }

        let mut base = root.clone();
        for part in &parts {
            base.push(part);
        }

        let subpath = if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        };

        Ok(Self {
            root,
            alias: None,
            subpath,
            base,
        })
    }

    /// Also accept paths below `alias`, named as if they were below the
    /// root. Ignored when `alias` is the root itself.
    pub fn with_alias(mut self, alias: impl Into<PathBuf>) -> Self {
        let alias = alias.into();
        self.alias = (alias != self.root).then_some(alias);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn alias(&self) -> Option<&Path> {
        self.alias.as_deref()
    }

    /// Absolute directory of the watched subtree.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Normalized subpath, `"."` for the root.
    pub fn subpath(&self) -> &str {
        &self.subpath
    }

    /// Convert an absolute backend path into a root-relative event name.
    ///
    /// Any descendant of the root succeeds, however deep. The root itself
    /// maps to `"."`. Anything else is a [`ScopeFault`].
    pub fn relativize(&self, path: &Path) -> std::result::Result<String, ScopeFault> {
        if let Some(name) = relative_name(&self.root, path) {
            return Ok(name);
        }

        // The path itself is never resolved: a link outside the root that
        // points into it is still outside.
        if let Some(name) = self.alias.as_deref().and_then(|alias| relative_name(alias, path)) {
            return Ok(name);
        }

        Err(ScopeFault {
            root: self.root.clone(),
            path: path.to_path_buf(),
        })
    }

    /// Whether a root-relative name lies in the watched subtree.
    pub fn contains(&self, name: &str) -> bool {
        if self.subpath == "." {
            return true;
        }
        match name.strip_prefix(self.subpath.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// `/`-joined components of `path` below `root`, or `None` when `path` is
/// not below `root`. Comparison is per component, so `/rootx` is not inside
/// `/root`.
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            // `..` below the root would let a record point back out of it.
            _ => return None,
        }
    }

    if parts.is_empty() {
        Some(".".to_string())
    } else {
        Some(parts.join("/"))
    }
}
