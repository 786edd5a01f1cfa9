//! Literal code with a language hint.

use crate::registry::CodeBlockConfig;
use xrst_core::{Directive, DirectiveContext, DirectiveError, DirectiveInvocation, Node};

/// Options the code directive understands. Presentation-only options are
/// accepted and ignored.
const KNOWN_OPTIONS: &[&str] = &[
    "caption",
    "class",
    "dedent",
    "emphasize-lines",
    "force",
    "lineno-start",
    "linenos",
    "name",
];

/// `.. code-block:: language` and its aliases.
#[derive(Debug, Clone)]
pub struct CodeBlockDirective {
    config: CodeBlockConfig,
}

impl CodeBlockDirective {
    /// Creates the directive.
    pub fn new(config: CodeBlockConfig) -> Self {
        Self { config }
    }
}

impl Default for CodeBlockDirective {
    fn default() -> Self {
        Self::new(CodeBlockConfig::default())
    }
}

impl Directive for CodeBlockDirective {
    fn name(&self) -> &str {
        &self.config.directive
    }

    fn aliases(&self) -> Vec<String> {
        self.config.aliases.clone()
    }

    fn run(
        &self,
        _ctx: &mut DirectiveContext<'_>,
        invocation: &DirectiveInvocation,
    ) -> Result<Vec<Node>, DirectiveError> {
        if let Some((unknown, _)) = invocation
            .options
            .iter()
            .find(|(key, _)| !KNOWN_OPTIONS.contains(key))
        {
            return Err(DirectiveError::invalid_option(unknown, "unknown option"));
        }
        if !invocation.has_body() {
            return Err(DirectiveError::MissingContent(invocation.name.clone()));
        }

        let text = match invocation.options.get("dedent") {
            Some(value) => {
                let columns = value.parse::<usize>().map_err(|_| {
                    DirectiveError::invalid_option("dedent", format!("expected a number, got \"{}\"", value))
                })?;
                dedent_by(&invocation.body, columns)
            }
            None => invocation.body.clone(),
        };

        let language = Some(invocation.arguments.as_str())
            .filter(|arg| !arg.is_empty())
            .map(str::to_string)
            .or_else(|| self.config.default_language.clone());

        Ok(vec![Node::LiteralBlock { text, language }])
    }
}

/// Removes up to `columns` leading spaces from every line.
fn dedent_by(text: &str, columns: usize) -> String {
    text.lines()
        .map(|line| {
            let indent = line.len() - line.trim_start_matches(' ').len();
            &line[indent.min(columns)..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedent_stops_at_text() {
        assert_eq!(dedent_by("    a\n  b\nc", 3), " a\nb\nc");
    }
}
