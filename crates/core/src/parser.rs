//! The parser orchestrator.
//!
//! A [`Parser`] owns a directive registry, shares a reference registry, and
//! binds to a caller-owned [`SharedEnvironment`] on each parse. Every parse
//! runs a fresh document parser; the last document-scope result is cached and
//! available through [`Parser::document`].

use crate::directives::{Directive, DirectiveRegistry};
use crate::document_parser::{DocumentParser, ParseScope};
use crate::environment::SharedEnvironment;
use crate::error::{ParseError, ParserError};
use crate::events::{EventSink, LogEventSink};
use crate::format::{Format, PlainFormat};
use crate::nodes::DocumentNode;
use crate::parse::ParseOptions;
use crate::references::{Doc, Reference, SharedReferenceRegistry};
use std::fmt;
use std::sync::Arc;

/// Filename reported before one is set.
pub const UNKNOWN_FILENAME: &str = "(unknown)";

/// Configuration a parser hands on to every sub-parser.
#[derive(Clone)]
pub(crate) struct Extensions {
    pub(crate) format: Arc<dyn Format>,
    pub(crate) references: SharedReferenceRegistry,
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) options: ParseOptions,
}

/// Parses markup text into [`DocumentNode`] trees.
pub struct Parser {
    extensions: Extensions,
    directives: DirectiveRegistry,
    filename: Option<String>,
    environment: Option<SharedEnvironment>,
    document: Option<DocumentNode>,
    depth: usize,
}

impl Parser {
    /// Creates a parser.
    ///
    /// Caller directives are registered first, then the format's own, so the
    /// format wins on name collisions. The built-in `doc` and `ref` (default
    /// role) references are registered before the caller's.
    pub fn new(
        format: Arc<dyn Format>,
        references: SharedReferenceRegistry,
        events: Arc<dyn EventSink>,
        directives: Vec<Arc<dyn Directive>>,
        extra_references: Vec<Arc<dyn Reference>>,
    ) -> Self {
        Self::with_options(
            format,
            references,
            events,
            directives,
            extra_references,
            ParseOptions::default(),
        )
    }

    fn with_options(
        format: Arc<dyn Format>,
        references: SharedReferenceRegistry,
        events: Arc<dyn EventSink>,
        directives: Vec<Arc<dyn Directive>>,
        extra_references: Vec<Arc<dyn Reference>>,
        options: ParseOptions,
    ) -> Self {
        let mut registry = DirectiveRegistry::new();
        for directive in directives.into_iter().chain(format.directives()) {
            registry.register(directive);
        }

        {
            let mut roles = references.write();
            roles.register(Arc::new(Doc::new()));
            roles.register(Arc::new(Doc::with_role("ref", true)));
            for reference in extra_references {
                roles.register(reference);
            }
        }

        log::debug!(
            "Parser for format \"{}\" with {} directive names",
            format.name(),
            registry.len()
        );

        Self::from_parts(
            Extensions {
                format,
                references,
                events,
                options,
            },
            registry,
            0,
        )
    }

    pub(crate) fn from_parts(extensions: Extensions, directives: DirectiveRegistry, depth: usize) -> Self {
        Self {
            extensions,
            directives,
            filename: None,
            environment: None,
            document: None,
            depth,
        }
    }

    /// Starts a [`ParserBuilder`] with the plain format and default options.
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Resets `environment`, binds this parser's filename into it and parses
    /// `text` as a complete document.
    pub fn parse(
        &mut self,
        environment: &SharedEnvironment,
        text: &str,
    ) -> Result<&DocumentNode, ParseError> {
        {
            let mut env = environment.lock();
            env.reset();
            if let Some(filename) = &self.filename {
                env.set_current_file(filename.clone());
            }
        }
        self.parse_local(environment, text)
    }

    /// Parses `text` into `environment` without resetting it, so titles,
    /// numbering and anchors continue from earlier parses.
    pub fn parse_local(
        &mut self,
        environment: &SharedEnvironment,
        text: &str,
    ) -> Result<&DocumentNode, ParseError> {
        self.environment = Some(environment.clone());
        self.document = None;

        let filename = self
            .filename
            .clone()
            .or_else(|| environment.lock().current_file().map(str::to_string));
        let document = DocumentParser {
            directives: &mut self.directives,
            extensions: &self.extensions,
            environment: self.environment.as_ref(),
            scope: ParseScope::Document,
            depth: self.depth,
            filename: filename.as_deref(),
        }
        .parse(text)?;

        Ok(self.document.insert(document))
    }

    /// Parses `text` without recording anything into the environment.
    ///
    /// Works without a bound environment. The cached document is left alone.
    pub fn parse_fragment(&mut self, text: &str) -> Result<DocumentNode, ParseError> {
        DocumentParser {
            directives: &mut self.directives,
            extensions: &self.extensions,
            environment: self.environment.as_ref(),
            scope: ParseScope::Fragment,
            depth: self.depth,
            filename: self.filename.as_deref(),
        }
        .parse(text)
    }

    /// A parser for separately sourced content.
    ///
    /// Shares the format, reference registry, event sink and options; copies
    /// the current directive set. It has no bound environment and no cached
    /// document of its own.
    pub fn sub_parser(&self) -> Parser {
        Parser::from_parts(self.extensions.clone(), self.directives.clone(), self.depth)
    }

    /// Registers a directive for subsequent parses.
    pub fn register_directive(&mut self, directive: Arc<dyn Directive>) {
        self.directives.register(directive);
    }

    /// Registers a reference on the shared reference registry.
    pub fn register_reference(&self, reference: Arc<dyn Reference>) {
        self.extensions.references.register(reference);
    }

    /// The latest document-scope parse result.
    pub fn document(&self) -> Result<&DocumentNode, ParserError> {
        self.document.as_ref().ok_or(ParserError::NothingParsed)
    }

    /// The environment bound by the latest parse.
    pub fn environment(&self) -> Result<&SharedEnvironment, ParserError> {
        self.environment.as_ref().ok_or(ParserError::NotStarted)
    }

    /// Document identity, or `"(unknown)"`.
    pub fn filename(&self) -> &str {
        self.filename.as_deref().unwrap_or(UNKNOWN_FILENAME)
    }

    /// Sets the document identity used by subsequent parses.
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = Some(filename.into());
    }

    /// The directives this parser dispatches to.
    pub fn directives(&self) -> &DirectiveRegistry {
        &self.directives
    }

    /// The shared reference registry.
    pub fn references(&self) -> &SharedReferenceRegistry {
        &self.extensions.references
    }

    /// The format this parser was built for.
    pub fn format(&self) -> &dyn Format {
        self.extensions.format.as_ref()
    }

    /// Parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.extensions.options
    }

    /// Nesting depth this parser starts at.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("format", &self.extensions.format.name())
            .field("directives", &self.directives)
            .field("filename", &self.filename)
            .field("depth", &self.depth)
            .field("parsed", &self.document.is_some())
            .finish()
    }
}

/// Builder for [`Parser`].
///
/// `build` borrows the builder, so one builder can seed many parsers, one per
/// document.
#[derive(Clone)]
pub struct ParserBuilder {
    format: Arc<dyn Format>,
    references: Option<SharedReferenceRegistry>,
    events: Arc<dyn EventSink>,
    directives: Vec<Arc<dyn Directive>>,
    extra_references: Vec<Arc<dyn Reference>>,
    options: ParseOptions,
    filename: Option<String>,
}

impl ParserBuilder {
    /// Plain format, logging event sink, default options.
    pub fn new() -> Self {
        Self {
            format: Arc::new(PlainFormat),
            references: None,
            events: Arc::new(LogEventSink),
            directives: Vec::new(),
            extra_references: Vec::new(),
            options: ParseOptions::default(),
            filename: None,
        }
    }

    /// Sets the format.
    pub fn with_format(mut self, format: Arc<dyn Format>) -> Self {
        self.format = format;
        self
    }

    /// Adds a directive.
    pub fn with_directive(mut self, directive: Arc<dyn Directive>) -> Self {
        self.directives.push(directive);
        self
    }

    /// Adds directives.
    pub fn with_directives(mut self, directives: impl IntoIterator<Item = Arc<dyn Directive>>) -> Self {
        self.directives.extend(directives);
        self
    }

    /// Adds a reference.
    pub fn with_reference(mut self, reference: Arc<dyn Reference>) -> Self {
        self.extra_references.push(reference);
        self
    }

    /// Adds references.
    pub fn with_references(mut self, references: impl IntoIterator<Item = Arc<dyn Reference>>) -> Self {
        self.extra_references.extend(references);
        self
    }

    /// Shares an existing reference registry instead of creating one per parser.
    pub fn with_reference_registry(mut self, references: SharedReferenceRegistry) -> Self {
        self.references = Some(references);
        self
    }

    /// Sets the event sink.
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Sets parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the document identity.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Builds a parser.
    pub fn build(&self) -> Parser {
        let mut parser = Parser::with_options(
            Arc::clone(&self.format),
            self.references.clone().unwrap_or_default(),
            Arc::clone(&self.events),
            self.directives.clone(),
            self.extra_references.clone(),
            self.options,
        );
        parser.filename = self.filename.clone();
        parser
    }
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParserBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserBuilder")
            .field("format", &self.format.name())
            .field("directives", &self.directives.len())
            .field("references", &self.extra_references.len())
            .field("options", &self.options)
            .field("filename", &self.filename)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DirectiveContext;
    use crate::directives::DirectiveInvocation;
    use crate::error::DirectiveError;
    use crate::nodes::Node;

    struct Echo;

    impl Directive for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn run(
            &self,
            _ctx: &mut DirectiveContext<'_>,
            invocation: &DirectiveInvocation,
        ) -> Result<Vec<Node>, DirectiveError> {
            Ok(vec![Node::text_paragraph(invocation.arguments.clone())])
        }
    }

    struct EchoFormat;

    impl Format for EchoFormat {
        fn name(&self) -> &str {
            "echo"
        }

        fn directives(&self) -> Vec<Arc<dyn Directive>> {
            vec![Arc::new(Echo)]
        }
    }

    #[test]
    fn builtin_references_are_seeded() {
        let parser = Parser::builder().build();
        let references = parser.references().read();
        assert_eq!(references.roles(), vec!["doc", "ref"]);
        assert_eq!(references.default_role(), Some("ref"));
    }

    #[test]
    fn format_directives_are_registered() {
        let parser = Parser::builder().with_format(Arc::new(EchoFormat)).build();
        assert!(parser.directives().contains("echo"));
        assert_eq!(parser.format().name(), "echo");
    }

    #[test]
    fn filename_defaults_to_unknown() {
        let mut parser = Parser::builder().build();
        assert_eq!(parser.filename(), "(unknown)");
        parser.set_filename("index.rst");
        assert_eq!(parser.filename(), "index.rst");
    }

    #[test]
    fn parse_binds_filename_into_environment() {
        let env = SharedEnvironment::default();
        env.lock().set_current_file("stale");
        let mut parser = Parser::builder().with_filename("index").build();

        let document = parser.parse(&env, "Hello").unwrap();
        assert_eq!(document.filename.as_deref(), Some("index"));
        assert_eq!(env.lock().current_file(), Some("index"));
        assert!(parser.environment().unwrap().ptr_eq(&env));
    }

    #[test]
    fn parse_local_keeps_numbering() {
        let env = SharedEnvironment::default();
        let mut parser = Parser::builder().build();
        parser.parse(&env, "One\n===\n").unwrap();
        let document = parser.parse_local(&env, "Two\n===\n").unwrap();

        match &document.children[0] {
            Node::Section { number, .. } => assert_eq!(number, &vec![2]),
            other => panic!("expected section, got {:?}", other),
        }
    }

    #[test]
    fn sub_parser_starts_unbound() {
        let env = SharedEnvironment::default();
        let mut parser = Parser::builder().build();
        parser.parse(&env, "text").unwrap();

        let sub = parser.sub_parser();
        assert!(matches!(sub.document(), Err(ParserError::NothingParsed)));
        assert!(matches!(sub.environment(), Err(ParserError::NotStarted)));
        assert!(sub.references().ptr_eq(parser.references()));
        assert_eq!(sub.depth(), parser.depth());
    }

    #[test]
    fn sub_parser_keeps_replaced_references() {
        let parser = Parser::builder().build();
        let replacement: Arc<dyn Reference> = Arc::new(Doc::with_role("ref", true));
        parser.register_reference(replacement.clone());

        let _sub = parser.sub_parser();
        let references = parser.references().read();
        assert!(Arc::ptr_eq(references.get(Some("ref")).unwrap(), &replacement));
        assert!(Arc::ptr_eq(references.get(None).unwrap(), &replacement));
    }
}
