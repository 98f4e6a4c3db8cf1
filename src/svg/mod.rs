//! SVG payload handling for `data:` URIs.
//!
//! # Modules
//!
//! - [`uri`]: percent-encoding of payloads
//! - [`quotes`]: escaped attribute quote repair
//! - [`data_uri`]: `data:image/svg+xml` classification
//! - [`optimize`]: optimizer trait and the usvg implementation
//! - [`minify`]: decode, repair, optimize
//!
//! # Flow
//!
//! ```text
//! url() argument
//!         │
//!         ▼
//!    ┌──────────┐
//!    │ data_uri │ ──► Base64 / PercentEncoded / NoMatch
//!    └────┬─────┘
//!         │ payload
//!         ▼
//!    ┌────────┐
//!    │ minify │ ──► uri::detect → quotes → Optimizer
//!    └────┬───┘
//!         │
//!         ▼
//!   MinifyOutcome { svg, uri_encoded }
//! ```

pub mod data_uri;
pub mod minify;
pub mod optimize;
pub mod quotes;
pub mod uri;
mod viewbox;

pub use data_uri::{BASE64_PREFIX, UTF8_PREFIX, UriMatch, classify, contains_svg_data_uri};
pub use minify::{MinifyError, SvgoOptions, minify};
pub use optimize::{Optimizer, OptimizerOptions, SvgoResult, UsvgOptimizer};
