//! Directives a configured format can provide.

pub mod admonition;
pub mod code_block;
pub mod include;

pub use admonition::AdmonitionDirective;
pub use code_block::CodeBlockDirective;
pub use include::IncludeDirective;
