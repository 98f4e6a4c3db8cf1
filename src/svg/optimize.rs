//! SVG optimizer seam and the default usvg-backed implementation.
//!
//! The rewrite pipeline only sees the [`Optimizer`] trait. [`UsvgOptimizer`]
//! parses markup into a usvg tree and writes it back without indentation,
//! which drops comments, metadata, editor attributes and unused definitions.

use serde::{Deserialize, Serialize};

use super::viewbox::{painted_extent, write_viewbox};

/// Result of a single optimizer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgoResult {
    /// Optimized markup.
    Success { svg: String },
    /// The optimizer rejected the markup.
    Error { message: String },
}

/// Options handed to the optimizer untouched by the rewrite pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerOptions {
    /// Resolution used to resolve absolute units (`mm`, `in`, ...).
    pub dpi: f32,
    /// Decimal places kept in path coordinates.
    pub coordinates_precision: u8,
    /// Decimal places kept in transform matrices.
    pub transforms_precision: u8,
    /// Prefix for ids generated by the writer.
    pub id_prefix: Option<String>,
    /// Grow the viewBox so strokes on the edge are not clipped.
    pub expand_viewbox: bool,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            dpi: 96.0,
            coordinates_precision: 8,
            transforms_precision: 8,
            id_prefix: None,
            expand_viewbox: false,
        }
    }
}

/// An SVG minifier.
///
/// Implementations must be shareable across threads because stylesheets are
/// processed in parallel.
pub trait Optimizer: Sync {
    fn optimize(&self, svg: &str, options: &OptimizerOptions) -> SvgoResult;
}

impl<F> Optimizer for F
where
    F: Fn(&str, &OptimizerOptions) -> SvgoResult + Sync,
{
    fn optimize(&self, svg: &str, options: &OptimizerOptions) -> SvgoResult {
        self(svg, options)
    }
}

/// Optimizer built on usvg's parser and writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsvgOptimizer;

impl Optimizer for UsvgOptimizer {
    fn optimize(&self, svg: &str, options: &OptimizerOptions) -> SvgoResult {
        let parse_options = usvg::Options {
            dpi: options.dpi,
            ..Default::default()
        };

        let tree = match usvg::Tree::from_str(svg, &parse_options) {
            Ok(tree) => tree,
            Err(e) => {
                return SvgoResult::Error {
                    message: e.to_string(),
                };
            }
        };

        let write_options = usvg::WriteOptions {
            id_prefix: options.id_prefix.clone(),
            coordinates_precision: options.coordinates_precision,
            transforms_precision: options.transforms_precision,
            indent: usvg::Indent::None,
            attributes_indent: usvg::Indent::None,
            ..Default::default()
        };

        let mut optimized = tree.to_string(&write_options);

        if options.expand_viewbox
            && let Some(extent) = painted_extent(&tree)
        {
            optimized = write_viewbox(&optimized, &extent);
        }

        SvgoResult::Success { svg: optimized }
    }
}
