//! Escaped attribute quote repair.
//!
//! Some CSS toolchains emit SVG with backslash-escaped attribute quotes
//! (`<svg width=\"10\">`). The optimizer would reject that markup, so it is
//! rewritten to plain quotes first.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Rewrite `name=\"value\"` as `name="value"`.
///
/// The value ends at the first following `\"`. Applying this twice gives the
/// same result as applying it once.
pub fn normalize_escaped_quotes(markup: &str) -> Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"\b([\w-]+)\s*=\s*\\"([\s\S]+?)\\""#).unwrap());
    re.replace_all(markup, r#"$1="$2""#)
}
