//! The `respimg` run: resolve targets, then process them.

use anyhow::{Context, Result, bail};

use crate::cli::Cli;
use crate::config::Config;
use crate::image::MagickTranscoder;
use crate::pipeline::{self, Pipeline};
use crate::source::resolve_targets;
use crate::utils::path::Target;
use crate::utils::plural_count;
use crate::{debug, log};

/// Run one optimization pass.
///
/// Fails when the converter cannot be found or any image failed.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    match &config.config_path {
        Some(path) => debug!("optimize"; "config from {}", path.display()),
        None => debug!("optimize"; "default config"),
    }

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let targets = resolve_targets(cli.path.as_deref(), config, &cwd)?;

    if targets.is_empty() {
        log!("optimize"; "nothing to do");
        return Ok(());
    }

    if config.dry_run {
        print_plan(config, &targets);
        return Ok(());
    }

    let transcoder = MagickTranscoder::locate(&config.converter.program)?;
    debug!("optimize"; "using {}", transcoder.program().display());

    let report = Pipeline::new(&transcoder, config).run(&targets);
    report.print();

    if report.has_failures() {
        bail!("{} failed", plural_count(report.failed, "image"));
    }
    Ok(())
}

fn print_plan(config: &Config, targets: &[Target]) {
    log!("plan"; "{}", plural_count(targets.len(), "image"));
    for target in targets {
        log!("plan"; "{}", target.path().display());
        for output in pipeline::plan(config, target) {
            let state = if output.exists() { "exists" } else { "new" };
            println!("  {} ({state})", output.display());
        }
    }
}
