use serde::Serialize;
use thiserror::Error;

/// Source location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Optional document identity
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize) -> Self {
        Self { file: None, line }
    }

    /// Create a source location with file information
    pub fn with_file(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: Some(file.into()),
            line,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}", file, self.line)
        } else {
            write!(f, "line {}", self.line)
        }
    }
}

/// Misuse of the parser API, signalled before any input is looked at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// `Parser::environment` was called before `parse`/`parse_local`.
    #[error("A parser's Environment should not be consulted before parsing has started")]
    NotStarted,
    /// `Parser::document` was called before any parse completed.
    #[error("Nothing has been parsed yet")]
    NothingParsed,
}

/// Failure of a whole parse invocation.
///
/// Only structural safeguards end up here; malformed markup is reported
/// through [`ParseDiagnostics`] and diagnostic nodes instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nested content went deeper than `ParseOptions::max_nesting_depth`.
    #[error("Nesting depth {depth} exceeds the limit of {limit}")]
    NestingTooDeep {
        /// Depth that was requested
        depth: usize,
        /// Configured limit
        limit: usize,
    },
}

/// Errors a directive may return from `Directive::run`.
///
/// The document parser turns each of these into a system message node at the
/// directive's position and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    /// The directive requires an argument after `::`.
    #[error("Directive \"{0}\" requires an argument")]
    MissingArgument(String),
    /// The directive requires a content block.
    #[error("Directive \"{0}\" requires content")]
    MissingContent(String),
    /// An option value could not be interpreted.
    #[error("Invalid option \"{option}\": {message}")]
    InvalidOption {
        /// Option name
        option: String,
        /// What was wrong with it
        message: String,
    },
    /// Parsing the directive body failed.
    #[error(transparent)]
    Nested(#[from] ParseError),
    /// Anything else a directive wants to report.
    #[error("{0}")]
    Custom(String),
}

impl DirectiveError {
    /// Create a custom directive error
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create an invalid option error
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }
}

/// Recoverable error information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoverableError {
    /// Error message
    pub message: String,
    /// Source location
    pub location: SourceLocation,
    /// Error severity
    pub severity: ErrorSeverity,
}

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Error that was recovered from
    Error,
    /// Warning that doesn't prevent parsing
    Warning,
}

impl RecoverableError {
    /// Create a new recoverable error
    pub fn error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
            severity: ErrorSeverity::Error,
        }
    }

    /// Create a new warning
    pub fn warning(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
            severity: ErrorSeverity::Warning,
        }
    }
}

impl std::fmt::Display for RecoverableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            ErrorSeverity::Error => "error",
            ErrorSeverity::Warning => "warning",
        };
        write!(f, "{} at {}: {}", severity, self.location, self.message)
    }
}

/// Collection of parse diagnostics (warnings and recoverable errors)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<RecoverableError>,
    /// List of recoverable errors
    pub errors: Vec<RecoverableError>,
}

impl ParseDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic, sorted by its severity
    pub fn push(&mut self, diagnostic: RecoverableError) {
        match diagnostic.severity {
            ErrorSeverity::Error => self.errors.push(diagnostic),
            ErrorSeverity::Warning => self.warnings.push(diagnostic),
        }
    }

    /// Add an error with location
    pub fn add_error_at(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.errors.push(RecoverableError::error(message, location));
    }

    /// Add a warning with location
    pub fn add_warning_at(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.warnings
            .push(RecoverableError::warning(message, location));
    }

    /// Move every diagnostic of `other` into this collection
    pub fn extend(&mut self, other: ParseDiagnostics) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any diagnostics
    pub fn has_any(&self) -> bool {
        self.has_warnings() || self.has_errors()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len() + self.errors.len()
    }
}
