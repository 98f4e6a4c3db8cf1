//! Declaration scanner for stylesheet text.
//!
//! Rules, at-rules and nesting are parsed with `cssparser`. Only the property
//! name, the byte span of the value and the line are kept, so the caller can
//! splice a new value into the original text.

use std::ops::Range;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser, Token,
};

/// A declaration found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    /// Byte span of the value, surrounding whitespace excluded.
    pub value: Range<usize>,
    /// 1-based line of the property name.
    pub line: usize,
}

/// Find every declaration in `css`, in source order.
///
/// Declarations inside style rules, nested rules and at-rule blocks are
/// found. Statement at-rules and top-level text never yield declarations.
pub fn scan_declarations(css: &str) -> Vec<Declaration> {
    let mut found = Vec::new();
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut collector = Collector { found: &mut found };

    for result in StyleSheetParser::new(&mut parser, &mut collector) {
        // Invalid rules are skipped, as a browser would.
        let _ = result;
    }
    found
}

// ============================================================================
// Rule parsers
// ============================================================================

struct Collector<'a> {
    found: &'a mut Vec<Declaration>,
}

impl Collector<'_> {
    fn body(&mut self, input: &mut Parser<'_, '_>) {
        for result in RuleBodyParser::new(input, self) {
            let _ = result;
        }
    }
}

/// Consume a prelude without looking at it.
fn skip_prelude<'i>(input: &mut Parser<'i, '_>) -> Result<(), ParseError<'i, ()>> {
    while input.next().is_ok() {}
    Ok(())
}

impl<'i> QualifiedRuleParser<'i> for Collector<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        skip_prelude(input)
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        self.body(input);
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for Collector<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        skip_prelude(input)
    }

    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(())
    }

    /// `@media` and `@supports` hold rules, `@font-face` and `@page` hold
    /// declarations; a rule body accepts both.
    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        self.body(input);
        Ok(())
    }
}

impl<'i> DeclarationParser<'i> for Collector<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let value_start = input.position();
        let custom = name.starts_with("--");

        loop {
            let block = match input.next_including_whitespace_and_comments() {
                Ok(token) => matches!(token, Token::CurlyBracketBlock),
                Err(_) => break,
            };
            // `a:hover { .. }` is a nested rule; let the body parser retry it.
            if block && !custom {
                return Err(input.new_custom_error(()));
            }
        }

        let raw = input.slice_from(value_start);
        let from = value_start.byte_index() + (raw.len() - raw.trim_start().len());
        let to = (value_start.byte_index() + raw.trim_end().len()).max(from);

        self.found.push(Declaration {
            property: name.as_ref().to_string(),
            value: from..to,
            line: start.source_location().line as usize + 1,
        });
        Ok(())
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for Collector<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        true
    }
}
