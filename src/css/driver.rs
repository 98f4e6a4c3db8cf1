//! Stylesheet-level rewriting.
//!
//! Scans declarations, runs the value rewriter on those that mention an SVG
//! data URI, and splices the results back into the source.

use std::ops::AddAssign;

use super::rewrite::rewrite_value;
use super::stylesheet::scan_declarations;
use crate::diagnostic::{DeclarationContext, DiagnosticSink};
use crate::svg::{Optimizer, SvgoOptions, contains_svg_data_uri};

/// Counters for one or more processed stylesheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub declarations: usize,
    /// Declarations that passed the data URI pre-filter.
    pub candidates: usize,
    pub matches: usize,
    pub optimized: usize,
    pub failed: usize,
    pub input_bytes: usize,
    pub output_bytes: usize,
}

impl RewriteReport {
    /// Bytes saved. Negative when the output grew.
    pub fn saved(&self) -> i64 {
        self.input_bytes as i64 - self.output_bytes as i64
    }
}

impl AddAssign for RewriteReport {
    fn add_assign(&mut self, other: Self) {
        self.declarations += other.declarations;
        self.candidates += other.candidates;
        self.matches += other.matches;
        self.optimized += other.optimized;
        self.failed += other.failed;
        self.input_bytes += other.input_bytes;
        self.output_bytes += other.output_bytes;
    }
}

/// A rewritten stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub css: String,
    pub report: RewriteReport,
}

impl Processed {
    #[inline]
    pub fn changed(&self, original: &str) -> bool {
        self.css != original
    }
}

/// Rewrite every SVG data URI in `css`.
///
/// Bytes outside rewritten declaration values are copied unchanged.
/// Failures go to `sink`, one call per failing `url()` argument.
pub fn process_stylesheet(
    css: &str,
    options: &SvgoOptions,
    optimizer: &dyn Optimizer,
    sink: &mut dyn DiagnosticSink,
) -> Processed {
    let declarations = scan_declarations(css);
    let mut report = RewriteReport {
        declarations: declarations.len(),
        input_bytes: css.len(),
        ..Default::default()
    };

    let mut out = String::with_capacity(css.len());
    let mut cursor = 0;

    for declaration in &declarations {
        let value = &css[declaration.value.clone()];
        if !contains_svg_data_uri(value) {
            continue;
        }
        report.candidates += 1;

        let rewritten = rewrite_value(value, options, optimizer);
        report.matches += rewritten.matches;
        report.optimized += rewritten.optimized;
        report.failed += rewritten.diagnostics.len();

        let context = DeclarationContext {
            property: &declaration.property,
            line: declaration.line,
        };
        for message in &rewritten.diagnostics {
            sink.warn(&context, message);
        }

        if rewritten.changed() {
            out.push_str(&css[cursor..declaration.value.start]);
            out.push_str(&rewritten.value);
            cursor = declaration.value.end;
        }
    }
    out.push_str(&css[cursor..]);

    report.output_bytes = out.len();
    Processed { css: out, report }
}
