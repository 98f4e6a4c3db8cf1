//! SVG `data:` URI classification.
//!
//! Patterns are tried in table order, so a base64 URI is never mistaken for
//! a percent-encoded one.

use std::sync::OnceLock;

use regex::Regex;

/// Canonical prefix written back for base64 payloads.
pub const BASE64_PREFIX: &str = "data:image/svg+xml;base64,";

/// Canonical prefix written back for percent-encoded payloads.
pub const UTF8_PREFIX: &str = "data:image/svg+xml;charset=utf-8,";

/// Result of classifying a `url()` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriMatch<'a> {
    /// `data:image/svg+xml;base64,...`
    Base64 {
        /// Base64 text, fragment excluded.
        payload: &'a str,
        /// `#...` suffix including the `#`, or empty.
        fragment: &'a str,
    },
    /// `data:image/svg+xml[;charset=utf-8|;utf-8],...`
    PercentEncoded {
        /// Everything after the comma.
        payload: &'a str,
    },
    NoMatch,
}

#[derive(Clone, Copy)]
enum Kind {
    Base64,
    PercentEncoded,
}

/// Ordered pattern table. First match wins.
fn patterns() -> &'static [(Kind, Regex)] {
    static TABLE: OnceLock<Vec<(Kind, Regex)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        vec![
            (
                Kind::Base64,
                Regex::new(r"(?i)^data:image/svg\+xml;base64,").unwrap(),
            ),
            (
                Kind::PercentEncoded,
                Regex::new(r"(?i)^data:image/svg\+xml(?:;(?:charset=)?utf-8)?,").unwrap(),
            ),
        ]
    })
}

/// Classify a candidate `url()` argument.
pub fn classify(candidate: &str) -> UriMatch<'_> {
    for (kind, re) in patterns() {
        let Some(prefix) = re.find(candidate) else {
            continue;
        };
        let rest = &candidate[prefix.end()..];
        return match kind {
            Kind::Base64 => {
                let split = rest.find('#').unwrap_or(rest.len());
                UriMatch::Base64 {
                    payload: &rest[..split],
                    fragment: &rest[split..],
                }
            }
            Kind::PercentEncoded => UriMatch::PercentEncoded { payload: rest },
        };
    }
    UriMatch::NoMatch
}

/// Cheap unanchored test for any SVG data URI prefix in `text`.
pub fn contains_svg_data_uri(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)data:image/svg\+xml(?:;(?:(?:charset=)?utf-8|base64))?,").unwrap()
    });
    re.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_base64() {
        assert_eq!(
            classify("data:image/svg+xml;base64,PHN2Zz4="),
            UriMatch::Base64 {
                payload: "PHN2Zz4=",
                fragment: ""
            }
        );
    }

    #[test]
    fn test_classify_base64_fragment() {
        assert_eq!(
            classify("DATA:image/SVG+xml;BASE64,PHN2Zz4=#icon"),
            UriMatch::Base64 {
                payload: "PHN2Zz4=",
                fragment: "#icon"
            }
        );
    }

    #[test]
    fn test_classify_percent_encoded() {
        let cases = [
            ("data:image/svg+xml,%3Csvg%3E", "%3Csvg%3E"),
            ("data:image/svg+xml;charset=utf-8,<svg/>", "<svg/>"),
            ("data:image/svg+xml;utf-8,<svg/>", "<svg/>"),
            ("Data:Image/Svg+Xml;Charset=UTF-8,<svg/>", "<svg/>"),
            ("data:image/svg+xml,", ""),
        ];
        for (input, payload) in cases {
            assert_eq!(
                classify(input),
                UriMatch::PercentEncoded { payload },
                "failed for {input}"
            );
        }
    }

    #[test]
    fn test_classify_payload_keeps_hash() {
        assert_eq!(
            classify("data:image/svg+xml,<svg fill='#000'/>"),
            UriMatch::PercentEncoded {
                payload: "<svg fill='#000'/>"
            }
        );
    }

    #[test]
    fn test_classify_no_match() {
        let cases = [
            "image.svg",
            "data:image/png;base64,iVBORw0KGgo=",
            "data:image/svg+xml;charset=latin1,<svg/>",
            "data:image/svg+xml",
            " data:image/svg+xml,<svg/>",
            "",
        ];
        for input in cases {
            assert_eq!(classify(input), UriMatch::NoMatch, "failed for {input}");
        }
    }

    #[test]
    fn test_contains_svg_data_uri() {
        assert!(contains_svg_data_uri("url(data:image/svg+xml,%3Csvg%3E)"));
        assert!(contains_svg_data_uri("url('data:image/svg+xml;base64,AA==')"));
        assert!(contains_svg_data_uri("a, url(\"DATA:IMAGE/SVG+XML;UTF-8,x\")"));
        assert!(!contains_svg_data_uri("url(icon.svg)"));
        assert!(!contains_svg_data_uri("url(data:image/png;base64,AA==)"));
    }
}
