//! Per-image processing.
//!
//! Every target goes through the same steps:
//!
//! 1. Re-encode the original into a temporary `<stem>_converted.<ext>` in the
//!    generated tree.
//! 2. Replace the original when that file is strictly smaller, else drop it.
//! 3. Write the blurred placeholder.
//! 4. Write a 1x and a 2x variant for every breakpoint.
//! 5. Copy the original into the generated tree.
//!
//! Steps 3-5 skip files that already exist. Step 5 runs last and only after
//! step 1 succeeded, so an existing mirrored copy marks the original as
//! already re-encoded and step 1 is skipped on later runs. A failed
//! re-encode leaves no copy and is retried next time.
//!
//! An original edited after its copy was written is not re-encoded again;
//! delete the mirrored copy to have it processed from step 1.
//!
//! A failing step is logged and the image counted as failed; the remaining
//! derived files are still written.

mod report;

pub use report::RunReport;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CompressConfig, Config};
use crate::image::convert::{move_file, remove_if_exists};
use crate::image::size::{is_smaller_file, percent_reduction};
use crate::image::variant::{self, VariantSet};
use crate::image::{ConvertError, Converter, ImageKind, Transcoder};
use crate::logger::ProgressLine;
use crate::source::{ImageFilter, image_filter};
use crate::utils::path::Target;
use crate::{debug, log};

/// Runs the processing steps over a list of targets.
pub struct Pipeline<'a> {
    converter: Converter<'a>,
    filter: ImageFilter,
    compress: CompressConfig,
    variants: VariantSet,
}

impl<'a> Pipeline<'a> {
    pub fn new(transcoder: &'a dyn Transcoder, config: &Config) -> Self {
        Self {
            converter: Converter::new(transcoder, config.layout.mirror()),
            filter: image_filter(config),
            compress: config.compress.clone(),
            variants: VariantSet::from_config(config),
        }
    }

    /// Process every target in order.
    pub fn run(&self, targets: &[Target]) -> RunReport {
        let progress = ProgressLine::new("optimize", &[("images", targets.len())]);
        let mut report = RunReport::default();

        for target in targets {
            self.process(target, &mut report);
            progress.inc("images");
        }

        progress.finish();
        report
    }

    fn process(&self, source: &Target, report: &mut RunReport) {
        if self.filter.skips_target(source.rel()) {
            debug!("skip"; "{} is not a source image", source.rel().display());
            report.ignored += 1;
            return;
        }
        let path = source.path();
        if !path.is_file() {
            log!("error"; "{}", ConvertError::MissingSource(path));
            report.failed += 1;
            return;
        }

        debug!("optimize"; "{}", path.display());
        let mut ok = true;
        let mut compressed = true;

        if self.is_processed(source) {
            debug!("skip"; "{} already re-encoded", source.rel().display());
        } else {
            match self.compress(source) {
                Ok(true) => report.replaced += 1,
                Ok(false) => {}
                Err(err) => {
                    log!("error"; "{err:#}");
                    ok = false;
                    compressed = false;
                }
            }
        }

        for variant in self.variants.iter() {
            match self.converter.convert(source, variant) {
                Ok(conversion) => report.record(&conversion),
                Err(err) => {
                    log!("error"; "{err:#}");
                    ok = false;
                }
            }
        }

        // the copy marks a finished re-encode
        if compressed {
            match self.converter.copy_original(source) {
                Ok(conversion) if conversion.path() != path => report.record(&conversion),
                Ok(_) => {}
                Err(err) => {
                    log!("error"; "{err:#}");
                    ok = false;
                }
            }
        }

        report.images += 1;
        if !ok {
            report.failed += 1;
        }
    }

    /// Check whether the mirrored copy of `source` exists.
    fn is_processed(&self, source: &Target) -> bool {
        let copy = self.converter.copy_destination(source);
        copy != source.path() && copy.exists()
    }

    /// Re-encode `source` and keep the result if it is smaller.
    ///
    /// Returns whether the original was replaced. On error the original is
    /// untouched.
    fn compress(&self, source: &Target) -> Result<bool, ConvertError> {
        let path = source.path();
        let Some(kind) = ImageKind::from_path(&path) else {
            debug!("skip"; "no encoder settings for {}", path.display());
            return Ok(false);
        };

        let variant = variant::compression(&path, kind, &self.compress);
        let candidate = self.converter.destination(source, &variant);
        // a leftover from an interrupted run would otherwise count as cached
        remove_if_exists(&candidate);
        self.converter.convert(source, &variant)?;

        if !is_smaller_file(&path, &candidate) {
            debug!("compress"; "{} is not smaller, keeping original", candidate.display());
            remove_if_exists(&candidate);
            return Ok(false);
        }

        let before = file_size(&path);
        let after = file_size(&candidate);
        move_file(&candidate, &path).map_err(|err| {
            remove_if_exists(&candidate);
            ConvertError::Io(path.clone(), err)
        })?;

        match percent_reduction(before, after) {
            Some(saved) => log!("compress"; "{} {saved:.1}% smaller", source.rel().display()),
            None => log!("compress"; "{}", source.rel().display()),
        }
        Ok(true)
    }
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Files a run would write for `source`: derived variants, then the copy.
///
/// Does not need a converter, so a dry run works without ImageMagick.
pub fn plan(config: &Config, source: &Target) -> Vec<PathBuf> {
    let mirror = config.layout.mirror();
    let mut outputs: Vec<_> = VariantSet::from_config(config)
        .iter()
        .map(|variant| source.base().join(mirror.derived(source.rel(), &variant.suffix)))
        .collect();

    let copy = mirror.map(source.rel());
    if copy != source.rel() {
        outputs.push(source.base().join(copy));
    }
    outputs
}
