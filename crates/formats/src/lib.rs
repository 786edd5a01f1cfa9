#![deny(missing_docs)]
//! xrst formats: configurable directive sets, formats and batch parsing.

/// Parallel parsing of many documents.
pub mod batch;
/// Built-in directives.
pub mod directives;
/// Configuration errors.
pub mod error;
/// Formats built from registry configuration.
pub mod format;
/// Directive registry configuration.
pub mod registry;

pub use batch::{BatchInput, BatchOptions, BatchProcessingResult, BatchResult, BatchStats, parse_batch};
pub use directives::{AdmonitionDirective, CodeBlockDirective, IncludeDirective};
pub use error::ConfigError;
pub use format::ConfiguredFormat;
pub use registry::{AdmonitionMapping, CodeBlockConfig, RegistryConfig, default_registry};
