//! `url()` calls inside a declaration value.
//!
//! Tokens come from `cssparser`. Each call is reported with its byte span and
//! the raw source text of its first argument, escapes included, so a
//! replacement can be spliced into the original value while every other byte
//! stays as written.

use std::ops::Range;

use cssparser::{ParseError, Parser, ParserInput, Token};

/// First argument of a `url()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlArgument<'a> {
    /// Source text without the surrounding quotes.
    pub text: &'a str,
    /// `None` for an unquoted argument.
    pub quote: Option<char>,
}

/// A `url()` call found in a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCall<'a> {
    /// Byte span of the call, from the name through `)`.
    pub span: Range<usize>,
    /// Function name as written, e.g. `url` or `URL`.
    pub name: &'a str,
    /// `None` when the first argument is neither a string nor a bare URL.
    pub argument: Option<UrlArgument<'a>>,
    /// Source after the first argument, trailing whitespace excluded.
    pub rest: &'a str,
    /// False when the input ends before `)`.
    pub closed: bool,
}

impl UrlCall<'_> {
    /// The call with `argument` in place of the first argument.
    ///
    /// Whitespace inside the parentheses is dropped; later arguments are kept.
    pub fn with_argument(&self, argument: &str) -> String {
        let close = if self.closed { ")" } else { "" };
        format!("{}({argument}{}{close}", self.name, self.rest)
    }
}

/// Decision for one visited call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    Unchanged,
    /// Replace the whole call with this text.
    Replaced(String),
}

/// Every `url()` call in `value`, depth-first in source order.
///
/// Calls nested in other functions or blocks (`image-set(url(..) 1x)`) are
/// included.
pub fn url_calls(value: &str) -> Vec<UrlCall<'_>> {
    let mut calls = Vec::new();
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    scan(&mut parser, &mut calls);
    calls
}

/// Visit every `url()` call in `value` and splice in the replacements.
///
/// Returns `value` unchanged when the visitor replaces nothing.
pub fn walk<'a, F>(value: &'a str, mut visitor: F) -> String
where
    F: FnMut(&UrlCall<'a>) -> Visit,
{
    let mut out = String::with_capacity(value.len());
    let mut cursor = 0;
    for call in url_calls(value) {
        if let Visit::Replaced(text) = visitor(&call) {
            out.push_str(&value[cursor..call.span.start]);
            out.push_str(&text);
            cursor = call.span.end;
        }
    }
    out.push_str(&value[cursor..]);
    out
}

// ============================================================================
// Token walk
// ============================================================================

fn scan<'i>(parser: &mut Parser<'i, '_>, calls: &mut Vec<UrlCall<'i>>) {
    loop {
        let start = parser.position();
        let Ok(token) = parser.next_including_whitespace_and_comments() else {
            break;
        };

        match token {
            Token::UnquotedUrl(_) | Token::BadUrl(_) => {
                calls.push(bare_call(parser.slice_from(start), start.byte_index()));
            }
            Token::Function(name) if name.eq_ignore_ascii_case("url") => {
                let head = parser.slice_from(start);
                let name = head.strip_suffix('(').unwrap_or(head);
                let Ok((argument, rest, inner_end)) =
                    parser.parse_nested_block(|nested| Ok::<_, ParseError<'i, ()>>(arguments(nested)))
                else {
                    continue;
                };
                let end = parser.position().byte_index();
                calls.push(UrlCall {
                    span: start.byte_index()..end,
                    name,
                    argument,
                    rest,
                    closed: end > inner_end,
                });
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                let _ = parser.parse_nested_block(|nested| {
                    scan(nested, calls);
                    Ok::<_, ParseError<'i, ()>>(())
                });
            }
            _ => {}
        }
    }
}

/// Inside `url(`: the string argument, what follows it, and the end offset.
fn arguments<'i>(nested: &mut Parser<'i, '_>) -> (Option<UrlArgument<'i>>, &'i str, usize) {
    let argument = loop {
        let start = nested.position();
        let quoted = match nested.next_including_whitespace_and_comments() {
            Ok(Token::WhiteSpace(_) | Token::Comment(_)) => continue,
            Ok(Token::QuotedString(_)) => true,
            _ => false,
        };
        break quoted.then(|| string_argument(nested.slice_from(start)));
    };

    let rest = nested.position();
    while nested.next_including_whitespace_and_comments().is_ok() {}
    (
        argument,
        nested.slice_from(rest).trim_end(),
        nested.position().byte_index(),
    )
}

/// A `url(...)` token with an unquoted argument. Bad URLs are kept as text.
fn bare_call(raw: &str, offset: usize) -> UrlCall<'_> {
    let (name, body) = raw.split_once('(').unwrap_or((raw, ""));
    let (body, closed) = match body.strip_suffix(')') {
        Some(body) => (body, true),
        None => (body, false),
    };
    UrlCall {
        span: offset..offset + raw.len(),
        name,
        argument: Some(UrlArgument {
            text: body.trim(),
            quote: None,
        }),
        rest: "",
        closed,
    }
}

/// Strip the quotes off a raw string token. An unterminated string keeps its tail.
fn string_argument(raw: &str) -> UrlArgument<'_> {
    let quote = raw.chars().next().unwrap_or('"');
    let body = &raw[quote.len_utf8()..];
    let text = match body.strip_suffix(quote) {
        Some(text) if !ends_with_escape(text) => text,
        _ => body,
    };
    UrlArgument {
        text,
        quote: Some(quote),
    }
}

fn ends_with_escape(text: &str) -> bool {
    text.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}
