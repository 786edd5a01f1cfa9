#![deny(missing_docs)]
//! xrst core: environment, directive and reference registries, and the
//! recursive document parser.

/// What a running directive can reach.
pub mod context;
/// Directive capability, invocation parsing and the directive registry.
pub mod directives;
/// The recursive block parser.
pub mod document_parser;
/// Per-document parsing context.
pub mod environment;
/// Core error and diagnostic types.
pub mod error;
/// Parse milestones and observers.
pub mod events;
/// Output-format hook.
pub mod format;
/// Inline markup parsing.
pub mod inline;
/// Line scanning primitives.
pub mod lines;
/// Node tree types.
pub mod nodes;
/// Parser options.
pub mod parse;
/// The parser orchestrator.
pub mod parser;
/// Inline role resolution.
pub mod references;
/// Anchor id generation.
pub mod slug;

pub use context::DirectiveContext;
pub use directives::{
    Directive, DirectiveInvocation, DirectiveOpening, DirectiveOptions, DirectiveRegistry,
    ExplicitMarkup, parse_directive_opening, parse_explicit_markup,
};
pub use document_parser::ParseScope;
pub use environment::{Anchor, Environment, SharedEnvironment, TitleHierarchy, TitleStyle};
pub use error::{
    DirectiveError, ErrorSeverity, ParseDiagnostics, ParseError, ParserError, RecoverableError,
    SourceLocation,
};
pub use events::{EventSink, LogEventSink, NullEventSink, ParseEvent, RecordingEventSink};
pub use format::{Format, PlainFormat};
pub use inline::parse_inline;
pub use nodes::{DocumentNode, Inline, Node, ReferenceToken};
pub use parse::{DEFAULT_MAX_NESTING_DEPTH, ParseOptions};
pub use parser::{Parser, ParserBuilder, UNKNOWN_FILENAME};
pub use references::{
    Doc, Reference, ReferenceInvocation, ReferenceRegistry, ResolveScope, ResolvedReference,
    SharedReferenceRegistry,
};
pub use slug::{Slugger, make_id, normalize_name};
