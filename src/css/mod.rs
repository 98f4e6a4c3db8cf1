//! Stylesheet side of the pipeline.
//!
//! - [`stylesheet`]: locate declarations and their value spans
//! - [`value`]: `url()` calls and their byte spans
//! - [`rewrite`]: `url()` rewriting for one value
//! - [`driver`]: whole-stylesheet processing

pub mod driver;
pub mod rewrite;
pub mod stylesheet;
pub mod value;

pub use driver::{Processed, RewriteReport, process_stylesheet};
