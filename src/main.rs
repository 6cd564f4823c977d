//! respimg - re-encode changed images and generate responsive variants.

mod cli;
mod config;
mod image;
mod logger;
mod pipeline;
mod source;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;
    cli::optimize::run(&cli, &config)
}
