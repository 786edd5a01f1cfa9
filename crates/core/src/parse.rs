//! Parser options.

use serde::{Deserialize, Serialize};

/// Default bound on nested parses (block quotes, list items, directive bodies,
/// sub-parsers).
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 16;

/// Options shared by a parser and every sub-parser it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Deepest nesting level a nested parse may reach.
    pub max_nesting_depth: usize,
    /// Assign hierarchical numbers to sections.
    pub section_numbering: bool,
    /// Resolve interpreted text at the end of each parse. When off, references
    /// stay pending for the embedder to resolve.
    pub resolve_references: bool,
}

impl ParseOptions {
    /// Defaults used by [`Parser::builder`](crate::Parser::builder).
    pub const fn new() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            section_numbering: true,
            resolve_references: true,
        }
    }

    /// Overrides the nesting limit.
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Toggles section numbering.
    pub const fn with_section_numbering(mut self, enabled: bool) -> Self {
        self.section_numbering = enabled;
        self
    }

    /// Toggles end-of-parse reference resolution.
    pub const fn with_reference_resolution(mut self, enabled: bool) -> Self {
        self.resolve_references = enabled;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_override_defaults() {
        let options = ParseOptions::new()
            .with_max_nesting_depth(3)
            .with_section_numbering(false);
        assert_eq!(options.max_nesting_depth, 3);
        assert!(!options.section_numbering);
        assert!(options.resolve_references);
        assert_eq!(ParseOptions::default().max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }
}
