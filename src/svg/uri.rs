//! Percent-encoding for SVG payloads inside `data:` URIs.
//!
//! - `encode()` escapes only what breaks a quoted CSS string or a URI
//! - `decode()` is strict: a stray `%` is an error, not a literal
//! - `detect()` folds the error into a plain/encoded answer

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use thiserror::Error;

/// Bytes escaped by [`encode`]. Non-ASCII is always escaped as UTF-8.
const PAYLOAD: &AsciiSet = &CONTROLS
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'<')
    .add(b'>')
    .add(b'\\');

/// Malformed percent-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed escape sequence at byte {0}")]
    Escape(usize),

    #[error("escaped bytes are not valid UTF-8")]
    Utf8,
}

/// Outcome of probing a payload for percent-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The payload was percent-encoded; holds the decoded text.
    Encoded(String),
    /// Decoding failed or changed nothing.
    Plain,
}

/// Percent-encode a payload.
pub fn encode(text: &str) -> Cow<'_, str> {
    utf8_percent_encode(text, PAYLOAD).into()
}

/// Decode a percent-encoded payload.
///
/// Every `%` must be followed by two hex digits and the decoded bytes must be
/// UTF-8.
pub fn decode(text: &str) -> Result<Cow<'_, str>, DecodeError> {
    let bytes = text.as_bytes();
    for (i, _) in text.match_indices('%') {
        let well_formed = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(DecodeError::Escape(i));
        }
    }

    percent_decode_str(text)
        .decode_utf8()
        .map_err(|_| DecodeError::Utf8)
}

/// Classify a payload as encoded or plain.
pub fn detect(text: &str) -> Decoded {
    match decode(text) {
        Ok(Cow::Owned(decoded)) if decoded != text => Decoded::Encoded(decoded),
        _ => Decoded::Plain,
    }
}
