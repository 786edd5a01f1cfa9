//! Serializable description of a directive set.

pub mod defaults;
pub mod types;

pub use defaults::{default_registry, default_supported_directives};
pub use types::{AdmonitionMapping, CodeBlockConfig, RegistryConfig};
