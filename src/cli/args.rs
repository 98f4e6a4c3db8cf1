//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Re-optimize SVG data URIs embedded in CSS
#[derive(Parser, Debug, Clone)]
#[command(name = "inline-svgo", version, about, long_about = None)]
pub struct Cli {
    /// CSS files to rewrite. Reads stdin when omitted or `-`.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    pub paths: Vec<PathBuf>,

    /// Rewrite files in place instead of printing to stdout
    #[arg(short, long, conflicts_with = "check")]
    pub write: bool,

    /// Write nothing; exit non-zero if any file would change
    #[arg(long)]
    pub check: bool,

    /// Force percent-encoding on or off instead of mirroring the input
    #[arg(short, long, value_name = "BOOL")]
    pub encode: Option<bool>,

    /// Config file path (default: inline-svgo.toml, searched upward)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
