//! Configuration sections.
//!
//! # Example
//!
//! ```toml
//! [converter]
//! program = "convert"        # ImageMagick 6; use "magick" for ImageMagick 7
//!
//! [source]
//! remote_ref = "origin/main" # commit whose changes are processed
//! filter = "strict"          # strict | loose
//!
//! [layout]
//! source_dir = "fullsize"
//! generated_dir = "generated"
//!
//! [compress]
//! jpeg_quality = 85
//!
//! [variants]
//! breakpoints = [768, 1366, 1920]
//! axis = "width"             # width | height
//! format = "webp"
//!
//! [placeholder]
//! scale = 20
//! blur = "0x8"
//! suffix = "-low.jpg"
//! ```

use serde::Deserialize;

use super::ConfigDiagnostics;
use crate::utils::path::Mirror;

// ============================================================================
// [converter]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// External image tool, looked up on `PATH`.
    pub program: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "convert".into(),
        }
    }
}

impl ConverterConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.program.trim().is_empty() {
            diag.error_with_hint(
                "converter.program",
                "program is empty",
                "set it to `convert` or `magick`",
            );
        }
    }
}

// ============================================================================
// [source]
// ============================================================================

/// How changed paths are matched against image names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Match by file extension and name suffixes.
    #[default]
    Strict,
    /// Match substrings anywhere in the path (`jpg`, `png`, `low`, `_converted`).
    Loose,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Ref whose latest commit provides the change set.
    pub remote_ref: String,
    pub filter: FilterMode,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            remote_ref: "origin/main".into(),
            filter: FilterMode::Strict,
        }
    }
}

impl SourceConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.remote_ref.trim().is_empty() {
            diag.error("source.remote_ref", "ref is empty");
        }
    }
}

// ============================================================================
// [layout]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Directory name holding originals.
    pub source_dir: String,
    /// Directory name receiving derived files.
    pub generated_dir: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            source_dir: "fullsize".into(),
            generated_dir: "generated".into(),
        }
    }
}

impl LayoutConfig {
    pub fn mirror(&self) -> Mirror {
        Mirror::new(&self.source_dir, &self.generated_dir)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, value) in [
            ("layout.source_dir", &self.source_dir),
            ("layout.generated_dir", &self.generated_dir),
        ] {
            if value.is_empty() || value.contains(['/', '\\']) || value == "." || value == ".." {
                diag.error_with_hint(
                    field,
                    format!("`{value}` is not a single directory name"),
                    "use a bare name like `fullsize`",
                );
            }
        }
        if self.source_dir == self.generated_dir {
            diag.error(
                "layout.generated_dir",
                "must differ from layout.source_dir, derived files would overwrite originals",
            );
        }
    }
}

// ============================================================================
// [compress]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    pub jpeg_quality: u8,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self { jpeg_quality: 85 }
    }
}

impl CompressConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(1..=100).contains(&self.jpeg_quality) {
            diag.error("compress.jpeg_quality", "must be between 1 and 100");
        }
    }
}

// ============================================================================
// [variants]
// ============================================================================

/// Which dimension a breakpoint constrains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Width,
    Height,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VariantsConfig {
    /// Target sizes in pixels; each yields a 1x and a 2x file.
    pub breakpoints: Vec<u32>,
    pub axis: Axis,
    /// Output extension for responsive variants.
    pub format: String,
}

impl Default for VariantsConfig {
    fn default() -> Self {
        Self {
            breakpoints: vec![768, 1366, 1920],
            axis: Axis::Width,
            format: "webp".into(),
        }
    }
}

impl VariantsConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.breakpoints.is_empty() {
            diag.error("variants.breakpoints", "at least one breakpoint is required");
        }
        if self.breakpoints.contains(&0) {
            diag.error("variants.breakpoints", "breakpoints must be positive");
        }
        if self.format.is_empty() || !self.format.chars().all(|c| c.is_ascii_alphanumeric()) {
            diag.error_with_hint(
                "variants.format",
                format!("`{}` is not a file extension", self.format),
                "use e.g. `webp` or `avif`",
            );
        }
    }
}

// ============================================================================
// [placeholder]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Downscale factor in percent.
    pub scale: u8,
    /// ImageMagick blur geometry (`radius x sigma`).
    pub blur: String,
    pub suffix: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            scale: 20,
            blur: "0x8".into(),
            suffix: "-low.jpg".into(),
        }
    }
}

impl PlaceholderConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(1..=100).contains(&self.scale) {
            diag.error("placeholder.scale", "must be a percentage between 1 and 100");
        }
        if self.blur.trim().is_empty() {
            diag.error("placeholder.blur", "blur geometry is empty");
        }
        let has_extension = self
            .suffix
            .rsplit_once('.')
            .is_some_and(|(_, ext)| !ext.is_empty());
        if !has_extension {
            diag.error_with_hint(
                "placeholder.suffix",
                format!("`{}` has no file extension", self.suffix),
                "the converter picks the output format from it, e.g. `-low.jpg`",
            );
        }
    }
}
