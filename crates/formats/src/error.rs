//! Errors raised while loading directive configuration.

use thiserror::Error;

/// A registry configuration could not be loaded or is inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document is malformed or has the wrong shape.
    #[error("Invalid JSON registry config: {0}")]
    Json(#[from] serde_json::Error),
    /// The YAML document is malformed or has the wrong shape.
    #[error("Invalid YAML registry config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Two entries claim the same directive name or alias.
    #[error("Directive \"{0}\" is configured more than once")]
    DuplicateDirective(String),
}
