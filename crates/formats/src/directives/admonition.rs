//! Note, warning and the other admonitions.

use crate::registry::AdmonitionMapping;
use xrst_core::{Directive, DirectiveContext, DirectiveError, DirectiveInvocation, Node};

/// An admonition directive built from an [`AdmonitionMapping`].
///
/// For specific admonitions (`note`, `tip`, ...) text after `::` is the start
/// of the content. For title-required ones (`admonition`) it is the title.
#[derive(Debug, Clone)]
pub struct AdmonitionDirective {
    mapping: AdmonitionMapping,
}

impl AdmonitionDirective {
    /// Creates the directive.
    pub fn new(mapping: AdmonitionMapping) -> Self {
        Self { mapping }
    }

    /// The mapping this directive was built from.
    pub fn mapping(&self) -> &AdmonitionMapping {
        &self.mapping
    }
}

impl Directive for AdmonitionDirective {
    fn name(&self) -> &str {
        &self.mapping.directive
    }

    fn aliases(&self) -> Vec<String> {
        self.mapping.aliases.clone()
    }

    fn run(
        &self,
        ctx: &mut DirectiveContext<'_>,
        invocation: &DirectiveInvocation,
    ) -> Result<Vec<Node>, DirectiveError> {
        let (title, children) = if self.mapping.title_required {
            if invocation.arguments.is_empty() {
                return Err(DirectiveError::MissingArgument(invocation.name.clone()));
            }
            if !invocation.has_body() {
                return Err(DirectiveError::MissingContent(invocation.name.clone()));
            }
            let children = ctx.parse_nested(&invocation.body)?;
            (Some(invocation.arguments.clone()), children)
        } else {
            let children = match (invocation.arguments.is_empty(), invocation.has_body()) {
                (true, false) => {
                    return Err(DirectiveError::MissingContent(invocation.name.clone()));
                }
                (true, true) => ctx.parse_nested(&invocation.body)?,
                (false, false) => ctx.parse_nested_at(&invocation.arguments, invocation.line)?,
                (false, true) => {
                    // A body starting right below the marker continues the
                    // first paragraph; after a blank line it is a new one.
                    let separator = if invocation.body_line == invocation.line + 1 {
                        "\n"
                    } else {
                        "\n\n"
                    };
                    let text = format!("{}{}{}", invocation.arguments, separator, invocation.body);
                    ctx.parse_nested_at(&text, invocation.line)?
                }
            };
            (self.mapping.title.clone(), children)
        };

        Ok(vec![Node::Admonition {
            kind: self.mapping.kind().to_string(),
            title,
            children,
        }])
    }
}
