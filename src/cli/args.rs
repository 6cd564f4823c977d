//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::config::FilterMode;

/// Re-encode changed images and generate placeholder and responsive variants
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image file or directory to process.
    ///
    /// Without it, images changed by the latest commit on `--ref` are processed.
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    pub path: Option<PathBuf>,

    /// Ref whose latest commit provides the changed images (default: origin/main)
    #[arg(short, long = "ref", value_name = "REF")]
    pub reference: Option<String>,

    /// Image conversion program (default: convert)
    #[arg(short = 'P', long)]
    pub program: Option<String>,

    /// Path matching rules for changed files
    #[arg(short, long, value_enum)]
    pub filter: Option<FilterMode>,

    /// Config file path (default: respimg.toml, searched upward)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// List targets and planned outputs without converting anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
