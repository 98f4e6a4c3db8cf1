//! Rewrite command: read inputs, rewrite in parallel, emit in input order.

use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::Cli;
use crate::{
    config::Config,
    css::{Processed, RewriteReport, process_stylesheet},
    debug,
    diagnostic::Diagnostic,
    log,
    svg::{Optimizer, SvgoOptions, UsvgOptimizer},
};

/// One stylesheet source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// Inputs named on the command line. No paths means stdin.
    pub fn from_paths(paths: &[PathBuf]) -> Vec<Self> {
        if paths.is_empty() {
            return vec![Self::Stdin];
        }
        paths
            .iter()
            .map(|path| {
                if path.as_os_str() == "-" {
                    Self::Stdin
                } else {
                    Self::File(path.clone())
                }
            })
            .collect()
    }

    fn read(&self) -> Result<String> {
        match self {
            Self::Stdin => io::read_to_string(io::stdin()).context("failed to read stdin"),
            Self::File(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display())),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A processed input, before anything is written.
struct Rewritten {
    changed: bool,
    processed: Processed,
    diagnostics: Vec<Diagnostic>,
}

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    /// Inputs whose output differs from the source.
    pub changed: usize,
    /// Inputs that could not be read or written.
    pub failed: usize,
    pub report: RewriteReport,
}

impl Summary {
    /// False when an input failed, or when `check` and an input would change.
    pub fn succeeded(&self, check: bool) -> bool {
        self.failed == 0 && !(check && self.changed > 0)
    }

    pub fn exit_code(&self, check: bool) -> ExitCode {
        if self.succeeded(check) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Entry
// ============================================================================

/// Run the rewrite command with the usvg optimizer.
pub fn run(cli: &Cli, config: &Config) -> Result<Summary> {
    run_with(cli, config, &UsvgOptimizer)
}

/// Run the rewrite command with any optimizer.
pub fn run_with(cli: &Cli, config: &Config, optimizer: &dyn Optimizer) -> Result<Summary> {
    let inputs = Input::from_paths(&cli.paths);
    let options = config.svgo.options();

    debug!("svgo"; "processing {} input(s)", inputs.len());

    let results: Vec<Result<Rewritten>> = inputs
        .par_iter()
        .map(|input| rewrite_input(input, &options, optimizer))
        .collect();

    let mut summary = Summary {
        files: inputs.len(),
        ..Default::default()
    };
    let mut stdout = io::stdout().lock();

    for (input, result) in inputs.iter().zip(results) {
        let rewritten = match result {
            Ok(rewritten) => rewritten,
            Err(e) => {
                log!("error"; "{:#}", e);
                summary.failed += 1;
                continue;
            }
        };

        for d in &rewritten.diagnostics {
            log!("warn"; "{}:{}", input, d);
        }

        let report = rewritten.processed.report;
        summary.report += report;
        if rewritten.changed {
            summary.changed += 1;
        }
        debug!(
            "svgo";
            "{}: {}/{} optimized, {} -> {} bytes",
            input, report.optimized, report.matches, report.input_bytes, report.output_bytes
        );

        if let Err(e) = emit(cli, input, &rewritten, &mut stdout) {
            log!("error"; "{:#}", e);
            summary.failed += 1;
        }
    }

    stdout.flush().context("failed to flush stdout")?;
    log_summary(cli, &summary);
    Ok(summary)
}

fn rewrite_input(
    input: &Input,
    options: &SvgoOptions,
    optimizer: &dyn Optimizer,
) -> Result<Rewritten> {
    let css = input.read()?;
    let mut diagnostics = Vec::new();
    let processed = process_stylesheet(&css, options, optimizer, &mut diagnostics);
    Ok(Rewritten {
        changed: processed.changed(&css),
        processed,
        diagnostics,
    })
}

/// Write one result according to the output mode.
fn emit(cli: &Cli, input: &Input, rewritten: &Rewritten, stdout: &mut impl Write) -> Result<()> {
    if cli.check {
        if rewritten.changed {
            log!("check"; "{} would be rewritten", input);
        }
        return Ok(());
    }

    match input {
        Input::File(path) if cli.write => {
            if rewritten.changed {
                write_file(path, &rewritten.processed.css)?;
            }
            Ok(())
        }
        _ => stdout
            .write_all(rewritten.processed.css.as_bytes())
            .context("failed to write stdout"),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write `{}`", path.display()))
}

fn log_summary(cli: &Cli, summary: &Summary) {
    let report = &summary.report;
    let line = format!(
        "{} of {} file(s) changed, {} of {} data URI(s) optimized, {} failed, {} bytes saved",
        summary.changed,
        summary.files,
        report.optimized,
        report.matches,
        report.failed,
        report.saved()
    );
    if cli.check || cli.write {
        log!("done"; "{}", line);
    } else {
        debug!("done"; "{}", line);
    }
}
