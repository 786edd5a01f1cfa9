//! What a running directive can reach.

use crate::directives::Directive;
use crate::document_parser::{BlockParser, DocumentParser, ParseScope};
use crate::environment::SharedEnvironment;
use crate::error::{ParseDiagnostics, ParseError, SourceLocation};
use crate::events::ParseEvent;
use crate::nodes::{DocumentNode, Node};
use crate::parse::ParseOptions;
use crate::parser::Parser;
use crate::references::SharedReferenceRegistry;
use std::sync::Arc;

/// Handle passed to [`Directive::run`].
///
/// Borrows the running parse: nested content parsed through it shares the
/// enclosing document's anchors and diagnostics, and directives registered
/// through it stay registered on the [`Parser`].
pub struct DirectiveContext<'a> {
    pub(crate) parser: BlockParser<'a>,
    pub(crate) line: usize,
    pub(crate) body_line: usize,
}

impl DirectiveContext<'_> {
    /// The environment of the enclosing parse, if one is bound.
    ///
    /// Do not hold its lock across [`parse_nested`](Self::parse_nested) or
    /// [`parse_fragment`](Self::parse_fragment).
    pub fn environment(&self) -> Option<&SharedEnvironment> {
        self.parser.environment
    }

    /// Scope of the enclosing parse.
    pub fn scope(&self) -> ParseScope {
        self.parser.scope
    }

    /// Nesting depth of the directive.
    pub fn depth(&self) -> usize {
        self.parser.depth
    }

    /// Identity of the document being parsed.
    pub fn filename(&self) -> Option<&str> {
        self.parser.filename
    }

    /// Line of the directive.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Options of the parser.
    pub fn options(&self) -> &ParseOptions {
        &self.parser.extensions.options
    }

    /// The reference registry shared with the parser.
    pub fn references(&self) -> &SharedReferenceRegistry {
        &self.parser.extensions.references
    }

    /// Parses `text` as content of the directive: same scope as the
    /// enclosing parse, one level deeper. Line numbers continue from the
    /// directive body.
    pub fn parse_nested(&mut self, text: &str) -> Result<Vec<Node>, ParseError> {
        self.parser.parse_nested_text(text, self.body_line)
    }

    /// Like [`parse_nested`](Self::parse_nested), numbering lines from
    /// `first_line`.
    pub fn parse_nested_at(&mut self, text: &str, first_line: usize) -> Result<Vec<Node>, ParseError> {
        self.parser.parse_nested_text(text, first_line)
    }

    /// Parses `text` in fragment scope, one level deeper. Nothing is recorded
    /// into the environment and references resolve against the fragment's own
    /// targets first.
    pub fn parse_fragment(&mut self, text: &str) -> Result<DocumentNode, ParseError> {
        DocumentParser {
            directives: &mut *self.parser.directives,
            extensions: self.parser.extensions,
            environment: self.parser.environment,
            scope: ParseScope::Fragment,
            depth: self.parser.depth + 1,
            filename: self.parser.filename,
        }
        .parse(text)
    }

    /// A parser for separately sourced content, one level deeper than this
    /// directive.
    pub fn sub_parser(&self) -> Parser {
        Parser::from_parts(
            self.parser.extensions.clone(),
            self.parser.directives.clone(),
            self.parser.depth + 1,
        )
    }

    /// Registers a directive for the rest of this parse and on the parser.
    pub fn register_directive(&mut self, directive: Arc<dyn Directive>) {
        self.parser.directives.register(directive);
    }

    /// Forwards an event to the parser's sink.
    pub fn notify(&self, event: &ParseEvent) {
        self.parser.extensions.events.notify(event);
    }

    /// Adds diagnostics collected elsewhere, e.g. by a sub-parser, to the
    /// enclosing document.
    pub fn report(&mut self, diagnostics: ParseDiagnostics) {
        self.parser.state.diagnostics.extend(diagnostics);
    }

    /// Records a warning against the directive's line.
    pub fn warn(&mut self, message: impl Into<String>) {
        let location = match self.parser.filename {
            Some(file) => SourceLocation::with_file(file, self.line),
            None => SourceLocation::new(self.line),
        };
        self.parser.state.diagnostics.add_warning_at(message, location);
    }
}
