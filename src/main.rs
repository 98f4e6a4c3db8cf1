//! inline-svgo - re-optimize SVG data URIs embedded in CSS.

mod cli;
mod config;
mod css;
mod diagnostic;
mod logger;
mod svg;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::Config;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;
    let summary = cli::run::run(&cli, &config)?;
    Ok(summary.exit_code(cli.check))
}
