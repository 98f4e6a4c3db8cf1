//! Non-fatal warnings attached to a declaration.

use std::fmt;

/// Where a warning was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationContext<'a> {
    pub property: &'a str,
    pub line: usize,
}

/// An owned warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub property: String,
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(context: &DeclarationContext<'_>, message: &str) -> Self {
        Self {
            property: context.property.to_string(),
            line: context.line,
            message: message.to_string(),
        }
    }
}

/// `<line> <property>: <message>`; the CLI prefixes the file name.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.line, self.property, self.message)
    }
}

/// Receives one call per `url()` argument that could not be rewritten.
pub trait DiagnosticSink {
    fn warn(&mut self, context: &DeclarationContext<'_>, message: &str);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn warn(&mut self, context: &DeclarationContext<'_>, message: &str) {
        self.push(Diagnostic::new(context, message));
    }
}
