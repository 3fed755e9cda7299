// src/watch/ignore.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Decides whether a root-relative path (e.g. `"src/main.rs"`) should be
/// dropped before it can produce an event.
///
/// Called once per scoped record, from the backend's delivery thread.
pub trait IgnoreFilter: Send + Sync {
    fn should_ignore(&self, rel_path: &str) -> bool;
}

impl<F> IgnoreFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn should_ignore(&self, rel_path: &str) -> bool {
        self(rel_path)
    }
}

/// Ignores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIgnore;

impl IgnoreFilter for NoIgnore {
    fn should_ignore(&self, _rel_path: &str) -> bool {
        false
    }
}

/// Compiled ignore globs, relative to the watch root.
///
/// A path is ignored when it, or any of its parent directories, matches one
/// of the patterns. So `"target"` ignores `"target/debug/foo"` as well.
#[derive(Clone)]
pub struct GlobIgnore {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for GlobIgnore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobIgnore")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl GlobIgnore {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        let set = build_globset(&patterns).context("building ignore globset")?;
        Ok(Self { patterns, set })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl IgnoreFilter for GlobIgnore {
    fn should_ignore(&self, rel_path: &str) -> bool {
        if self.set.is_empty() || rel_path == "." {
            return false;
        }
        if self.set.is_match(rel_path) {
            return true;
        }
        rel_path
            .match_indices('/')
            .any(|(idx, _)| self.set.is_match(&rel_path[..idx]))
    }
}

/// Build a GlobSet from simple string patterns.
pub(crate) fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
