//! Output-format hook for directive sets.

use crate::directives::Directive;
use std::sync::Arc;

/// A format contributes its own directives to every parser built for it.
///
/// Format directives are registered after caller-supplied ones and therefore
/// win on name collisions.
pub trait Format: Send + Sync {
    /// Format name, for logs.
    fn name(&self) -> &str;

    /// Directives this format supplies.
    fn directives(&self) -> Vec<Arc<dyn Directive>>;
}

/// A format that supplies no directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormat;

impl Format for PlainFormat {
    fn name(&self) -> &str {
        "plain"
    }

    fn directives(&self) -> Vec<Arc<dyn Directive>> {
        Vec::new()
    }
}
