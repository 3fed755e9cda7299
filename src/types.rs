// src/types.rs

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

/// Two-valued kind of an emitted change.
///
/// - `Remove`: the path (most likely) no longer exists.
/// - `NonRemove`: the path was created, written, or otherwise touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    NonRemove,
    Remove,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::NonRemove => f.write_str("non-remove"),
            EventKind::Remove => f.write_str("remove"),
        }
    }
}

/// A normalized change notification delivered to consumers.
///
/// `name` is relative to the watch root, uses `/` as separator on every
/// platform, and is `"."` for the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    pub name: String,
    pub kind: EventKind,
}

impl Event {
    pub fn new(name: impl Into<String>, kind: EventKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn non_remove(name: impl Into<String>) -> Self {
        Self::new(name, EventKind::NonRemove)
    }

    pub fn remove(name: impl Into<String>) -> Self {
        Self::new(name, EventKind::Remove)
    }

    /// The synthetic "something changed somewhere below the root" event.
    pub fn root() -> Self {
        Self::non_remove(".")
    }

    pub fn is_root(&self) -> bool {
        self.name == "."
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// Backend-neutral rendition of a native event kind.
///
/// Backends map whatever their OS reports onto these; the session's
/// [`KindTable`](crate::watch::kinds::KindTable) then decides what each one
/// means for consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Create,
    Write,
    Metadata,
    Remove,
    /// Old name of a rename, reported separately by the backend.
    RenameFrom,
    /// New name of a rename, reported separately by the backend.
    RenameTo,
    /// A rename endpoint the backend could not attribute to either side.
    Rename,
    /// Read-only access (open, close without write).
    Access,
    Other,
}

/// One unprocessed notification from a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub path: PathBuf,
    pub kind: NativeKind,
}

impl RawRecord {
    pub fn new(path: impl Into<PathBuf>, kind: NativeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// How a backend reports the two endpoints of a rename.
///
/// - `Distinguishes`: old and new names arrive as `RenameFrom` / `RenameTo`;
///   an unattributed `Rename` endpoint is still reported as `Remove`.
/// - `Indistinct(kind)`: every rename endpoint arrives as `Rename` and is
///   reported with the given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameCapability {
    Distinguishes,
    Indistinct(EventKind),
}

impl RenameCapability {
    /// Default capability for the platform's recommended `notify` backend.
    ///
    /// inotify and ReadDirectoryChangesW tell the old name from the new one;
    /// FSEvents and the polling fallback do not.
    pub fn for_platform() -> Self {
        if cfg!(any(target_os = "linux", target_os = "android", target_os = "windows")) {
            RenameCapability::Distinguishes
        } else {
            RenameCapability::Indistinct(EventKind::Remove)
        }
    }
}

impl Default for RenameCapability {
    fn default() -> Self {
        Self::for_platform()
    }
}

impl FromStr for RenameCapability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(RenameCapability::for_platform()),
            "distinguishes" => Ok(RenameCapability::Distinguishes),
            "remove" => Ok(RenameCapability::Indistinct(EventKind::Remove)),
            "non-remove" | "nonremove" => Ok(RenameCapability::Indistinct(EventKind::NonRemove)),
            other => Err(format!(
                "invalid rename capability: {other} (expected \"auto\", \"distinguishes\", \"remove\" or \"non-remove\")"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for RenameCapability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
