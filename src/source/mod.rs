//! Target resolution.
//!
//! A run processes one of:
//!
//! - an explicit file, taken as-is
//! - every image under an explicit directory
//! - the images changed by the latest commit on the configured ref

mod filter;

pub use filter::ImageFilter;

use anyhow::Result;
use jwalk::WalkDir;
use std::path::Path;

use crate::config::Config;
use crate::utils::git::{changed_in_ref, open_repo};
use crate::utils::path::Target;
use crate::{debug, log};

/// Build the path filter for a configuration.
pub fn image_filter(config: &Config) -> ImageFilter {
    ImageFilter::new(config.source.filter, &config.layout.generated_dir)
}

/// Resolve the images to process.
///
/// Explicit paths are taken relative to `cwd` and repository paths relative
/// to the repository root. Filters and mirroring later see only that relative
/// part.
pub fn resolve_targets(path: Option<&Path>, config: &Config, cwd: &Path) -> Result<Vec<Target>> {
    let filter = image_filter(config);

    let Some(path) = path else {
        return Ok(changed_images(config, &filter, cwd));
    };

    let target = Target::resolve(cwd, path);
    if target.path().is_dir() {
        Ok(walk_images(&target, &filter))
    } else {
        Ok(vec![target])
    }
}

/// All accepted images below `dir`, sorted.
fn walk_images(dir: &Target, filter: &ImageFilter) -> Vec<Target> {
    let root = dir.path();
    let mut images: Vec<_> = WalkDir::new(&root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.path();
            let below = path.strip_prefix(&root).ok()?;
            Some(dir.with_rel(dir.rel().join(below)))
        })
        .filter(|target| filter.accepts(target.rel()))
        .collect();
    images.sort();
    debug!("source"; "{} images under {}", images.len(), root.display());
    images
}

/// Images touched by the latest commit on the configured ref.
///
/// Any version-control failure yields an empty list.
fn changed_images(config: &Config, filter: &ImageFilter, cwd: &Path) -> Vec<Target> {
    let reference = &config.source.remote_ref;
    let changes = match open_repo(cwd).and_then(|repo| changed_in_ref(&repo, reference)) {
        Ok(changes) => changes,
        Err(err) => {
            log!("error"; "cannot read changes from `{reference}`: {err:#}");
            return Vec::new();
        }
    };

    log!("source"; "{} at {}", reference, changes.commit);

    changes
        .paths
        .iter()
        .filter(|rel| filter.accepts(Path::new(rel)))
        .map(|rel| Target::new(&changes.root, rel))
        .filter(|target| {
            let exists = target.path().is_file();
            if !exists {
                debug!("skip"; "{} no longer exists", target.rel().display());
            }
            exists
        })
        .collect()
}
