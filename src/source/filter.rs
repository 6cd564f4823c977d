//! Image path filtering.
//!
//! Two rule sets decide which changed paths are worth processing:
//!
//! | Mode     | Include                     | Exclude                                                  |
//! |----------|-----------------------------|----------------------------------------------------------|
//! | `strict` | extension `jpg/jpeg/png`    | stem `low`, `*-low`, `*_low`, `*_converted`, `*.partial`; |
//! |          |                             | any `low/` or generated-tree directory                   |
//! | `loose`  | path contains `jpg`/`png`   | path contains `low` or `_converted`                      |
//!
//! `loose` reproduces plain substring matching, so `snowglow/a.png` is dropped
//! and `jpg-notes.txt` is kept.

use std::ffi::OsStr;
use std::path::{Component, Path};

use crate::config::FilterMode;
use crate::image::ImageKind;

/// Stem endings that mark files this tool produced itself.
const DERIVED_STEM_SUFFIXES: &[&str] = &["-low", "_low", "_converted", ".partial"];

/// Decides which paths are source images.
#[derive(Debug, Clone)]
pub struct ImageFilter {
    mode: FilterMode,
    generated_dir: String,
}

impl ImageFilter {
    pub fn new(mode: FilterMode, generated_dir: impl Into<String>) -> Self {
        Self {
            mode,
            generated_dir: generated_dir.into(),
        }
    }

    /// Check whether a changed path should be processed.
    pub fn accepts(&self, path: &Path) -> bool {
        self.is_image(path) && !self.is_excluded(path)
    }

    /// Check whether a resolved target must be skipped before processing.
    ///
    /// In loose mode this is its own substring list (`_converted`, `.rb`,
    /// `/low`), narrower than the change-set exclusion.
    pub fn skips_target(&self, path: &Path) -> bool {
        match self.mode {
            FilterMode::Loose => {
                let path = path.to_string_lossy();
                ["_converted", ".rb", "/low"]
                    .iter()
                    .any(|word| path.contains(word))
            }
            FilterMode::Strict => !self.accepts(path),
        }
    }

    fn is_image(&self, path: &Path) -> bool {
        match self.mode {
            FilterMode::Loose => {
                let path = path.to_string_lossy();
                ["jpg", "png"].iter().any(|word| path.contains(word))
            }
            FilterMode::Strict => ImageKind::from_path(path).is_some(),
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        match self.mode {
            FilterMode::Loose => {
                let path = path.to_string_lossy();
                ["low", "_converted"].iter().any(|word| path.contains(word))
            }
            FilterMode::Strict => self.is_derived_name(path) || self.in_excluded_dir(path),
        }
    }

    fn is_derived_name(&self, path: &Path) -> bool {
        let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
            return false;
        };
        stem == "low" || DERIVED_STEM_SUFFIXES.iter().any(|s| stem.ends_with(s))
    }

    fn in_excluded_dir(&self, path: &Path) -> bool {
        let Some(parent) = path.parent() else {
            return false;
        };
        parent.components().any(|c| match c {
            Component::Normal(name) => name == "low" || name == OsStr::new(&self.generated_dir),
            _ => false,
        })
    }
}
