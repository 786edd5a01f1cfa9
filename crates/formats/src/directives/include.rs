//! Splicing another source into the document.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use xrst_core::{Directive, DirectiveContext, DirectiveError, DirectiveInvocation, Node, ParseScope};

type Loader = dyn Fn(&str) -> io::Result<String> + Send + Sync;

/// `.. include:: path`
///
/// The included text is parsed by a sub-parser into the enclosing document's
/// environment, so section numbering and anchors continue across the
/// boundary. With the `:literal:` flag the text becomes a literal block.
/// Inclusion cycles stop at the nesting limit.
#[derive(Clone)]
pub struct IncludeDirective {
    loader: Arc<Loader>,
}

impl IncludeDirective {
    /// Creates the directive with a loader mapping the argument to text.
    pub fn new(loader: impl Fn(&str) -> io::Result<String> + Send + Sync + 'static) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }

    /// Resolves paths relative to `root` and reads them from disk.
    pub fn from_directory(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::new(move |path| std::fs::read_to_string(root.join(path)))
    }
}

impl fmt::Debug for IncludeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncludeDirective").finish_non_exhaustive()
    }
}

impl Directive for IncludeDirective {
    fn name(&self) -> &str {
        "include"
    }

    fn run(
        &self,
        ctx: &mut DirectiveContext<'_>,
        invocation: &DirectiveInvocation,
    ) -> Result<Vec<Node>, DirectiveError> {
        let path = invocation.arguments.trim();
        if path.is_empty() {
            return Err(DirectiveError::MissingArgument(invocation.name.clone()));
        }

        let text = (self.loader)(path).map_err(|err| {
            DirectiveError::custom(format!("Problems with \"include\" path \"{}\": {}", path, err))
        })?;
        log::debug!("Including {} ({} bytes)", path, text.len());

        if invocation.options.contains("literal") {
            return Ok(vec![Node::LiteralBlock {
                text: text.trim_end().to_string(),
                language: None,
            }]);
        }

        let mut sub = ctx.sub_parser();
        let document = match (ctx.scope(), ctx.environment().cloned()) {
            (ParseScope::Document, Some(environment)) => sub.parse_local(&environment, &text)?.clone(),
            _ => sub.parse_fragment(&text)?,
        };
        ctx.report(document.diagnostics);
        Ok(document.children)
    }
}
