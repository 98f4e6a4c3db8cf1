//! `url()` rewriting for a single declaration value.
//!
//! Each `url(...)` whose first argument is an SVG data URI is minified and
//! written back in the same URI form. A failing argument is left exactly as
//! it was and reported; the other arguments of the value are still processed.

use base64::Engine;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use thiserror::Error;

use super::value::{UrlArgument, Visit, walk};
use crate::svg::{
    BASE64_PREFIX, MinifyError, Optimizer, SvgoOptions, UTF8_PREFIX, UriMatch, classify, minify,
    uri,
};

/// Standard alphabet, padding optional on input.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a single `url()` argument was left unchanged.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("base64 payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Minify(#[from] MinifyError),
}

/// Result of rewriting one declaration value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewrittenValue {
    /// Rewritten value, identical to the input when nothing was rewritten.
    pub value: String,
    /// `url()` arguments recognized as SVG data URIs.
    pub matches: usize,
    /// Arguments successfully rewritten.
    pub optimized: usize,
    /// One message per argument that failed.
    pub diagnostics: Vec<String>,
}

impl RewrittenValue {
    #[inline]
    pub fn changed(&self) -> bool {
        self.optimized > 0
    }
}

/// Rewrite every SVG data URI inside the `url()` calls of `input`.
///
/// Never fails: a broken argument becomes a diagnostic.
pub fn rewrite_value(
    input: &str,
    options: &SvgoOptions,
    optimizer: &dyn Optimizer,
) -> RewrittenValue {
    let mut matches = 0;
    let mut optimized = 0;
    let mut diagnostics = Vec::new();

    let value = walk(input, |call| {
        let Some(argument) = call.argument else {
            return Visit::Unchanged;
        };

        match rewrite_argument(argument, options, optimizer) {
            Ok(None) => Visit::Unchanged,
            Ok(Some(argument)) => {
                matches += 1;
                optimized += 1;
                Visit::Replaced(call.with_argument(&argument))
            }
            Err(e) => {
                matches += 1;
                diagnostics.push(e.to_string());
                Visit::Unchanged
            }
        }
    });

    RewrittenValue {
        value,
        matches,
        optimized,
        diagnostics,
    }
}

/// Rewrite a single argument, quotes included.
///
/// `Ok(None)` means it is not an SVG data URI.
fn rewrite_argument(
    argument: UrlArgument<'_>,
    options: &SvgoOptions,
    optimizer: &dyn Optimizer,
) -> Result<Option<String>, RewriteError> {
    match classify(argument.text) {
        UriMatch::NoMatch => Ok(None),
        UriMatch::Base64 { payload, fragment } => {
            let compact: String = payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let svg = String::from_utf8(LENIENT_BASE64.decode(compact)?)?;
            let outcome = minify(&svg, options, optimizer)?;

            let value = format!(
                "{BASE64_PREFIX}{}{fragment}",
                STANDARD.encode(outcome.svg)
            );
            Ok(Some(match argument.quote {
                Some(quote) => format!("{quote}{value}{quote}"),
                None => value,
            }))
        }
        UriMatch::PercentEncoded { payload } => {
            let outcome = minify(payload, options, optimizer)?;

            let data = if outcome.uri_encoded {
                uri::encode(&outcome.svg).into_owned()
            } else {
                outcome.svg
            };
            // Firefox rejects a literal `#` in the payload even when quoted.
            let data = data.replace('#', "%23");

            let quote = if outcome.uri_encoded { '"' } else { '\'' };
            Ok(Some(format!("{quote}{UTF8_PREFIX}{data}{quote}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::value::url_calls;
    use crate::svg::{OptimizerOptions, SvgoResult};
    use std::sync::Mutex;

    fn identity(svg: &str, _: &OptimizerOptions) -> SvgoResult {
        SvgoResult::Success {
            svg: svg.to_string(),
        }
    }

    fn collapse(svg: &str, _: &OptimizerOptions) -> SvgoResult {
        SvgoResult::Success {
            svg: svg.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }

    fn rewrite(input: &str) -> RewrittenValue {
        rewrite_value(input, &SvgoOptions::default(), &identity)
    }

    #[test]
    fn test_percent_encoded_roundtrip() {
        let input = "url(data:image/svg+xml,%3Csvg%3E%3Cpath/%3E%3C/svg%3E)";
        let result = rewrite(input);
        assert_eq!(
            result.value,
            r#"url("data:image/svg+xml;charset=utf-8,%3Csvg%3E%3Cpath/%3E%3C/svg%3E")"#
        );
        assert_eq!(result.matches, 1);
        assert_eq!(result.optimized, 1);
        assert!(result.diagnostics.is_empty());

        let calls = url_calls(&result.value);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].span, 0..result.value.len());
        assert_eq!(calls[0].argument.and_then(|a| a.quote), Some('"'));
    }

    #[test]
    fn test_percent_encoded_shrinks() {
        let input = "url(\"data:image/svg+xml,%3Csvg%20%20%20a='1'%3E%3C/svg%3E\")";
        let result = rewrite_value(input, &SvgoOptions::default(), &collapse);
        assert_eq!(
            result.value,
            r#"url("data:image/svg+xml;charset=utf-8,%3Csvg a='1'%3E%3C/svg%3E")"#
        );
        assert!(result.value.len() < input.len());
    }

    #[test]
    fn test_plain_markup_uses_single_quotes() {
        let input = r##"url('data:image/svg+xml;utf-8,<svg fill="#fff"/>')"##;
        let result = rewrite(input);
        assert_eq!(
            result.value,
            r#"url('data:image/svg+xml;charset=utf-8,<svg fill="%23fff"/>')"#
        );
    }

    #[test]
    fn test_hash_never_literal_in_percent_mode() {
        let inputs = [
            "url(\"data:image/svg+xml,<svg fill='#000' stroke='#fff'/>\")",
            "url(data:image/svg+xml,%3Csvg fill='%23000'/%3E)",
        ];
        for input in inputs {
            for encode in [None, Some(true), Some(false)] {
                let options = SvgoOptions {
                    encode,
                    ..Default::default()
                };
                let result = rewrite_value(input, &options, &identity);
                let payload = result
                    .value
                    .split_once(UTF8_PREFIX)
                    .map(|(_, rest)| rest)
                    .unwrap();
                assert!(!payload.contains('#'), "literal # in {}", result.value);
            }
        }
    }

    #[test]
    fn test_base64_roundtrip() {
        let input = r#"url("data:image/svg+xml;base64,PHN2Zz4uLi48L3N2Zz4=")"#;
        let result = rewrite(input);
        assert_eq!(result.value, input);
        assert_eq!(result.optimized, 1);

        let payload = result
            .value
            .trim_start_matches("url(\"data:image/svg+xml;base64,")
            .trim_end_matches("\")");
        let decoded = STANDARD.decode(payload).unwrap();
        assert_eq!(decoded, b"<svg>...</svg>");
    }

    #[test]
    fn test_base64_shrinks_and_keeps_fragment() {
        let svg = "<svg   a='1'>   </svg>";
        let input = format!(
            "url(data:image/svg+xml;base64,{}#frag)",
            STANDARD.encode(svg)
        );
        let result = rewrite_value(&input, &SvgoOptions::default(), &collapse);
        assert_eq!(
            result.value,
            format!(
                "url(data:image/svg+xml;base64,{}#frag)",
                STANDARD.encode("<svg a='1'> </svg>")
            )
        );
    }

    #[test]
    fn test_base64_never_escapes_hash() {
        let svg = "<svg fill='#000'/>";
        let input = format!("url('data:image/svg+xml;base64,{}')", STANDARD.encode(svg));
        let result = rewrite(&input);
        assert_eq!(result.value, input);
    }

    #[test]
    fn test_base64_lenient_input() {
        // unpadded, wrapped
        let input = "url(data:image/svg+xml;base64,PHN2\n Zz4uLi48L3N2Zz4)";
        let result = rewrite(input);
        assert_eq!(
            result.value,
            "url(data:image/svg+xml;base64,PHN2Zz4uLi48L3N2Zz4=)"
        );
    }

    #[test]
    fn test_invalid_base64_reports() {
        let input = "url(data:image/svg+xml;base64,!!!!)";
        let result = rewrite(input);
        assert_eq!(result.value, input);
        assert_eq!(result.matches, 1);
        assert_eq!(result.optimized, 0);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].starts_with("invalid base64 payload"));
    }

    #[test]
    fn test_no_match_untouched() {
        let cases = [
            "url( icon.svg ) no-repeat",
            "url( 'data:image/png;base64,AAAA' )",
            "url()",
            "red",
            "linear-gradient(#fff, #000)",
        ];
        for input in cases {
            let result = rewrite(input);
            assert_eq!(result.value, input);
            assert_eq!(result.matches, 0);
            assert!(!result.changed());
        }
    }

    #[test]
    fn test_escaped_quotes_reach_optimizer_normalized() {
        let seen = Mutex::new(Vec::new());
        let spy = |svg: &str, _: &OptimizerOptions| {
            seen.lock().unwrap().push(svg.to_string());
            SvgoResult::Success {
                svg: svg.to_string(),
            }
        };
        let input = r#"url("data:image/svg+xml;charset=utf-8,<svg xmlns=\"http://www.w3.org/2000/svg\" attr=\"x\"/>")"#;
        let result = rewrite_value(input, &SvgoOptions::default(), &spy);
        let seen = seen.into_inner().unwrap();
        assert_eq!(
            seen,
            vec![r#"<svg xmlns="http://www.w3.org/2000/svg" attr="x"/>"#]
        );
        assert_eq!(
            result.value,
            r#"url('data:image/svg+xml;charset=utf-8,<svg xmlns="http://www.w3.org/2000/svg" attr="x"/>')"#
        );
    }

    #[test]
    fn test_one_failure_among_three() {
        let picky = |svg: &str, _: &OptimizerOptions| {
            if svg.contains("bad") {
                SvgoResult::Error {
                    message: "parse error".into(),
                }
            } else {
                SvgoResult::Success {
                    svg: svg.replace("  ", " "),
                }
            }
        };
        let input = "url(data:image/svg+xml,%3Csvg%20%20a%3E), \
                     url(data:image/svg+xml,%3Cbad%3E), \
                     url(data:image/svg+xml,%3Csvg%20%20b%3E)";
        let result = rewrite_value(input, &SvgoOptions::default(), &picky);

        assert_eq!(
            result.value,
            "url(\"data:image/svg+xml;charset=utf-8,%3Csvg a%3E\"), \
             url(data:image/svg+xml,%3Cbad%3E), \
             url(\"data:image/svg+xml;charset=utf-8,%3Csvg b%3E\")"
        );
        assert_eq!(result.matches, 3);
        assert_eq!(result.optimized, 2);
        assert_eq!(
            result.diagnostics,
            vec!["SVG optimization failed: parse error".to_string()]
        );
    }

    #[test]
    fn test_encode_override_wins() {
        let encoded = "url(data:image/svg+xml,%3Csvg%3E%3C/svg%3E)";

        let forced_on = SvgoOptions {
            encode: Some(true),
            ..Default::default()
        };
        let result = rewrite_value(encoded, &forced_on, &identity);
        assert_eq!(
            result.value,
            r#"url("data:image/svg+xml;charset=utf-8,%3Csvg%3E%3C/svg%3E")"#
        );

        let forced_off = SvgoOptions {
            encode: Some(false),
            ..Default::default()
        };
        let result = rewrite_value(encoded, &forced_off, &identity);
        assert_eq!(
            result.value,
            "url('data:image/svg+xml;charset=utf-8,<svg></svg>')"
        );

        let plain = "url(\"data:image/svg+xml,<svg></svg>\")";
        let result = rewrite_value(plain, &forced_on, &identity);
        assert_eq!(
            result.value,
            r#"url("data:image/svg+xml;charset=utf-8,%3Csvg%3E%3C/svg%3E")"#
        );
    }

    #[test]
    fn test_surrounding_text_byte_identical() {
        let input = "/* a */ URL( data:image/svg+xml,%3Csvg/%3E )  ,\turl('x.png')";
        let result = rewrite(input);
        assert_eq!(
            result.value,
            "/* a */ URL(\"data:image/svg+xml;charset=utf-8,%3Csvg/%3E\")  ,\turl('x.png')"
        );
    }

    #[test]
    fn test_nested_and_whitespace_cleared() {
        let input = "image-set( url( data:image/svg+xml,%3Csvg/%3E ) 1x, url(a.png) 2x )";
        let result = rewrite(input);
        assert_eq!(
            result.value,
            "image-set( url(\"data:image/svg+xml;charset=utf-8,%3Csvg/%3E\") 1x, url(a.png) 2x )"
        );
    }
}
