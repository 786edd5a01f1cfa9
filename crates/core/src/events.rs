//! Parse milestones reported to an injected observer.
//!
//! Events are notifications only; nothing a sink does feeds back into parsing.

use std::sync::Mutex;

/// Something that happened while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// A document parser started on some input.
    DocumentStarted {
        /// Document identity, if known.
        filename: Option<String>,
        /// Nesting depth of the parse (0 for top level).
        depth: usize,
    },
    /// A registered directive is about to run.
    DirectiveInvoked {
        /// Directive name as written.
        name: String,
        /// Line of the directive.
        line: usize,
    },
    /// No directive is registered under this name.
    UnknownDirective {
        /// Directive name as written.
        name: String,
        /// Line of the directive.
        line: usize,
    },
    /// A directive returned an error; a system message took its place.
    DirectiveFailed {
        /// Directive name.
        name: String,
        /// Line of the directive.
        line: usize,
        /// Error text.
        message: String,
    },
    /// Interpreted text could not be resolved.
    UnresolvedReference {
        /// Role, or `None` for the default role.
        role: Option<String>,
        /// Target as written.
        target: String,
        /// Line of the enclosing paragraph.
        line: usize,
    },
    /// A document parser finished.
    DocumentParsed {
        /// Document identity, if known.
        filename: Option<String>,
        /// Number of top-level nodes.
        nodes: usize,
        /// Number of diagnostics collected.
        diagnostics: usize,
    },
}

/// Observer of parse events.
pub trait EventSink: Send + Sync {
    /// Receives one event.
    fn notify(&self, event: &ParseEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn notify(&self, event: &ParseEvent) {
        match event {
            ParseEvent::UnknownDirective { name, line } => {
                log::warn!("Unknown directive \"{}\" at line {}", name, line);
            }
            ParseEvent::DirectiveFailed {
                name,
                line,
                message,
            } => {
                log::warn!("Directive \"{}\" at line {} failed: {}", name, line, message);
            }
            ParseEvent::UnresolvedReference { role, target, line } => {
                log::warn!(
                    "Unresolved reference {}`{}` at line {}",
                    role.as_deref().map(|r| format!(":{}:", r)).unwrap_or_default(),
                    target,
                    line
                );
            }
            other => log::trace!("{:?}", other),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn notify(&self, _event: &ParseEvent) {}
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ParseEvent>>,
}

impl RecordingEventSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far.
    pub fn events(&self) -> Vec<ParseEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingEventSink {
    fn notify(&self, event: &ParseEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
