//! Source/generated tree mapping.
//!
//! Any path with a component named like the source segment (`fullsize`) has a
//! twin under the generated segment (`generated`) with the same structure
//! below it:
//!
//! ```text
//! assets/fullsize/x/photo.png   →  assets/generated/x/photo.png
//! assets/fullsize/x             →  assets/generated/x
//! assets/other/photo.png        →  assets/other/photo.png   (unchanged)
//! ```

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Maps paths from the source tree onto the generated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    source: String,
    generated: String,
}

impl Mirror {
    pub fn new(source: impl Into<String>, generated: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            generated: generated.into(),
        }
    }

    /// Replace the first component equal to the source segment.
    ///
    /// Paths without that component are returned unchanged.
    pub fn map(&self, path: &Path) -> PathBuf {
        let mut replaced = false;
        path.components()
            .map(|component| match component {
                Component::Normal(name) if !replaced && name == OsStr::new(&self.source) => {
                    replaced = true;
                    Component::Normal(OsStr::new(&self.generated))
                }
                other => other,
            })
            .collect()
    }

    /// Mirrored path of a derived file: the source's directory mapped to the
    /// generated tree, file stem kept and extension replaced by `suffix`.
    ///
    /// `suffix` carries its own separator and extension, e.g. `-768.webp`.
    pub fn derived(&self, source: &Path, suffix: &str) -> PathBuf {
        self.map(&with_suffix(source, suffix))
    }
}

/// Replace the extension of `path` with `suffix` (`photo.png` + `-low.jpg` →
/// `photo-low.jpg`).
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{stem}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror() -> Mirror {
        Mirror::new("fullsize", "generated")
    }

    #[test]
    fn test_map_replaces_segment() {
        assert_eq!(
            mirror().map(Path::new("assets/fullsize/x/photo.png")),
            PathBuf::from("assets/generated/x/photo.png")
        );
        assert_eq!(
            mirror().map(Path::new("/repo/assets/fullsize")),
            PathBuf::from("/repo/assets/generated")
        );
    }

    #[test]
    fn test_map_only_first_segment() {
        assert_eq!(
            mirror().map(Path::new("fullsize/a/fullsize/b.png")),
            PathBuf::from("generated/a/fullsize/b.png")
        );
    }

    #[test]
    fn test_map_requires_whole_component() {
        let path = Path::new("assets/fullsize-old/photo.png");
        assert_eq!(mirror().map(path), path);
    }

    #[test]
    fn test_map_outside_tree_is_identity() {
        let path = Path::new("assets/images/photo.png");
        assert_eq!(mirror().map(path), path);
    }

    #[test]
    fn test_derived() {
        let source = Path::new("assets/fullsize/x/photo.png");
        assert_eq!(
            mirror().derived(source, "-768@2x.webp"),
            PathBuf::from("assets/generated/x/photo-768@2x.webp")
        );
        assert_eq!(
            mirror().derived(source, "_converted.png"),
            PathBuf::from("assets/generated/x/photo_converted.png")
        );
    }

    #[test]
    fn test_with_suffix_keeps_inner_dots() {
        assert_eq!(
            with_suffix(Path::new("a/my.photo.jpg"), "-low.jpg"),
            PathBuf::from("a/my.photo-low.jpg")
        );
    }
}
