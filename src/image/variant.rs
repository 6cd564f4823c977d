//! Argument sets for every file derived from an original.
//!
//! | Output              | Arguments                                                                 |
//! |---------------------|---------------------------------------------------------------------------|
//! | `_converted.png`    | `-strip`                                                                  |
//! | `_converted.jpg`    | `-sampling-factor 4:2:0 -strip -quality 85 -interlace JPEG -colorspace sRGB` |
//! | `-low.jpg`          | `-filter Gaussian -resize 20% -interlace JPEG -colorspace sRGB -blur 0x8` |
//! | `-768.webp`         | `-resize 768x>`                                                           |
//! | `-768@2x.webp`      | `-resize 1536x>`                                                          |
//!
//! The `>` geometry flag only ever shrinks, so small originals keep their size.

use std::path::Path;

use super::ImageKind;
use crate::config::{Axis, CompressConfig, Config, PlaceholderConfig, VariantsConfig};

/// One derived file: converter arguments plus the destination suffix that
/// replaces the original extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub args: Vec<String>,
    pub suffix: String,
}

impl Variant {
    fn new<I, S>(args: I, suffix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            suffix: suffix.into(),
        }
    }
}

/// In-place re-encoding of an original, written as `<stem>_converted.<ext>`.
pub fn compression(source: &Path, kind: ImageKind, config: &CompressConfig) -> Variant {
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = format!("_converted.{ext}");

    match kind {
        ImageKind::Png => Variant::new(["-strip"], suffix),
        ImageKind::Jpeg => Variant::new(
            [
                "-sampling-factor".to_string(),
                "4:2:0".into(),
                "-strip".into(),
                "-quality".into(),
                config.jpeg_quality.to_string(),
                "-interlace".into(),
                "JPEG".into(),
                "-colorspace".into(),
                "sRGB".into(),
            ],
            suffix,
        ),
    }
}

/// Blurred low-resolution preview.
pub fn placeholder(config: &PlaceholderConfig) -> Variant {
    Variant::new(
        [
            "-filter".to_string(),
            "Gaussian".into(),
            "-resize".into(),
            format!("{}%", config.scale),
            "-interlace".into(),
            "JPEG".into(),
            "-colorspace".into(),
            "sRGB".into(),
            "-blur".into(),
            config.blur.clone(),
        ],
        config.suffix.clone(),
    )
}

/// Shrink-only resize geometry for one axis.
fn geometry(axis: Axis, px: u32) -> String {
    match axis {
        Axis::Width => format!("{px}x>"),
        Axis::Height => format!("x{px}>"),
    }
}

/// 1x and 2x variants for every breakpoint, in breakpoint order.
pub fn responsive(config: &VariantsConfig) -> Vec<Variant> {
    config
        .breakpoints
        .iter()
        .flat_map(|&width| {
            [
                Variant::new(
                    ["-resize".to_string(), geometry(config.axis, width)],
                    format!("-{width}.{}", config.format),
                ),
                Variant::new(
                    ["-resize".to_string(), geometry(config.axis, width.saturating_mul(2))],
                    format!("-{width}@2x.{}", config.format),
                ),
            ]
        })
        .collect()
}

/// All derived outputs of one original except the compressed copy.
#[derive(Debug, Clone)]
pub struct VariantSet {
    pub placeholder: Variant,
    pub responsive: Vec<Variant>,
}

impl VariantSet {
    pub fn from_config(config: &Config) -> Self {
        Self {
            placeholder: placeholder(&config.placeholder),
            responsive: responsive(&config.variants),
        }
    }

    /// Placeholder first, then breakpoints.
    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        std::iter::once(&self.placeholder).chain(&self.responsive)
    }
}
