//! Payload minification: decode, repair quotes, optimize.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::optimize::{Optimizer, OptimizerOptions, SvgoResult};
use super::quotes::normalize_escaped_quotes;
use super::uri::{Decoded, detect};

/// Options for one rewrite run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgoOptions {
    /// Force the output encoding mode instead of mirroring the input.
    pub encode: Option<bool>,

    /// Passed through to the optimizer.
    #[serde(flatten)]
    pub optimizer: OptimizerOptions,
}

/// Optimized markup plus the encoding mode to write it back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifyOutcome {
    pub svg: String,
    pub uri_encoded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinifyError {
    #[error("SVG optimization failed: {0}")]
    Optimize(String),
}

/// Minify a payload that may or may not be percent-encoded.
///
/// `uri_encoded` reports whether `input` was percent-encoded, unless
/// `options.encode` overrides it.
pub fn minify(
    input: &str,
    options: &SvgoOptions,
    optimizer: &dyn Optimizer,
) -> Result<MinifyOutcome, MinifyError> {
    let (svg, detected) = match detect(input) {
        Decoded::Encoded(decoded) => (decoded, true),
        Decoded::Plain => (input.to_string(), false),
    };
    let uri_encoded = options.encode.unwrap_or(detected);

    let svg = normalize_escaped_quotes(&svg);

    match optimizer.optimize(&svg, &options.optimizer) {
        SvgoResult::Success { svg } => Ok(MinifyOutcome { svg, uri_encoded }),
        SvgoResult::Error { message } => Err(MinifyError::Optimize(message)),
    }
}
