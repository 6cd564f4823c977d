//! Files addressed relative to a base directory.
//!
//! Filtering and mirroring only ever look at the relative part, so the
//! directories a checkout happens to live under never take part in matching.

use std::path::{Path, PathBuf};

/// A file as `base` + `rel`, where `rel` is what rules are applied to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target {
    base: PathBuf,
    rel: PathBuf,
}

impl Target {
    pub fn new(base: impl Into<PathBuf>, rel: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            rel: rel.into(),
        }
    }

    /// Split `path` against `base`.
    ///
    /// Relative paths are taken as relative to `base`. An absolute path
    /// outside `base` keeps only its file name as the relative part.
    pub fn resolve(base: &Path, path: &Path) -> Self {
        if path.is_relative() {
            return Self::new(base, path);
        }
        if let Ok(rel) = path.strip_prefix(base) {
            return Self::new(base, rel);
        }
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => Self::new(parent, name),
            _ => Self::new(PathBuf::new(), path),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn rel(&self) -> &Path {
        &self.rel
    }

    /// Full path for I/O.
    pub fn path(&self) -> PathBuf {
        self.base.join(&self.rel)
    }

    /// Same base, different relative part.
    pub fn with_rel(&self, rel: impl Into<PathBuf>) -> Self {
        Self::new(&self.base, rel)
    }
}
