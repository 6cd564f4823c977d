//! Image conversion through an external tool.
//!
//! # Modules
//!
//! - [`transcode`]: `Transcoder` seam in front of ImageMagick
//! - [`convert`]: mirrored, cached, atomic conversion of one file
//! - [`variant`]: argument sets for compression, placeholder and breakpoints
//! - [`size`]: decides whether a re-encoded file replaces its original

pub mod convert;
pub mod size;
pub mod transcode;
pub mod variant;

use std::path::Path;

pub use convert::{Conversion, ConvertError, Converter};
pub use transcode::{MagickTranscoder, Transcoder};
pub use variant::Variant;

/// Raster formats accepted as originals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Classify a path by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}
