//! Directive capability, invocation parsing and the directive registry.
//!
//! A directive is written as explicit markup:
//!
//! ```text
//! .. name:: arguments
//!    :option: value
//!    :flag:
//!
//!    Body content, indented relative to the marker.
//! ```
//!
//! The document parser recognizes the opening line, cuts the indented block
//! out, splits it into options and body, and dispatches to the
//! [`Directive`] registered under `name`.

use crate::context::DirectiveContext;
use crate::error::DirectiveError;
use crate::lines::{Line, dedent, join, trim_blank};
use crate::nodes::Node;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A block-level extension point.
///
/// Implementations are stateless with respect to any single document and may
/// be shared between parsers and threads.
pub trait Directive: Send + Sync {
    /// Primary name, matched case-insensitively.
    fn name(&self) -> &str;

    /// Additional names this directive answers to.
    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// Turns one invocation into nodes spliced into the tree at its position.
    fn run(
        &self,
        ctx: &mut DirectiveContext<'_>,
        invocation: &DirectiveInvocation,
    ) -> Result<Vec<Node>, DirectiveError>;
}

/// Options given as `:key: value` field lines, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveOptions {
    entries: Vec<(String, String)>,
}

impl DirectiveOptions {
    /// Creates an empty option list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option; a repeated key replaces the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value of an option. Flags have an empty value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether an option (or flag) is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over options in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no options.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One directive occurrence, as handed to [`Directive::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveInvocation {
    /// Lowercased directive name as written.
    pub name: String,
    /// Text after `::` on the opening line.
    pub arguments: String,
    /// Parsed option lines.
    pub options: DirectiveOptions,
    /// Body text with the block indentation removed.
    pub body: String,
    /// Line the directive starts on.
    pub line: usize,
    /// Line the body starts on, for diagnostics inside nested parses.
    pub body_line: usize,
}

impl DirectiveInvocation {
    /// Builds an invocation from the opening line and the indented block
    /// that follows it.
    pub fn from_block(opening: DirectiveOpening, line: usize, block: &[Line]) -> Self {
        let lines = dedent(block);
        let mut options = DirectiveOptions::new();
        let mut idx = 0;

        while idx < lines.len() {
            let Some((key, value)) = parse_option_line(lines[idx].content()) else {
                break;
            };
            let mut value = value.to_string();
            idx += 1;
            // Continuation lines of a long option value are indented further.
            while idx < lines.len() && !lines[idx].is_blank() && lines[idx].indent() > 0 {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(lines[idx].content());
                idx += 1;
            }
            options.insert(key, value);
        }

        let body = trim_blank(&lines[idx..]);
        let body_line = body.first().map_or(line + 1, |l| l.number);

        Self {
            name: opening.name,
            arguments: opening.arguments,
            options,
            body: join(&dedent(body)),
            line,
            body_line,
        }
    }

    /// Whether the invocation has a non-empty body.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

fn parse_option_line(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(':')?;
    let end = rest.find(": ").or_else(|| rest.strip_suffix(':').map(str::len))?;
    let key = &rest[..end];
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    let value = rest[end + 1..].trim();
    Some((key, value))
}

/// Parsed opening line of a directive (`.. name:: arguments`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveOpening {
    /// Lowercased directive name.
    pub name: String,
    /// Remaining text after `::`, trimmed.
    pub arguments: String,
}

/// What an explicit markup block (`.. ...`) turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplicitMarkup {
    /// `.. name:: arguments`
    Directive(DirectiveOpening),
    /// `.. _name:` (optionally followed by an external URL)
    Target {
        /// Target name as written.
        name: String,
        /// Link destination, when the target points outside the document.
        url: Option<String>,
    },
    /// Anything else.
    Comment(String),
}

/// Classifies the text after the `..` marker of an explicit markup line.
///
/// Returns `None` when the line is not explicit markup at all.
pub fn parse_explicit_markup(content: &str) -> Option<ExplicitMarkup> {
    let rest = if content == ".." {
        ""
    } else {
        content.strip_prefix(".. ")?
    };

    if let Some(target) = rest.strip_prefix('_') {
        return parse_target(target).or_else(|| Some(ExplicitMarkup::Comment(rest.to_string())));
    }

    if let Some(opening) = parse_directive_opening(rest) {
        return Some(ExplicitMarkup::Directive(opening));
    }

    Some(ExplicitMarkup::Comment(rest.trim().to_string()))
}

fn parse_target(text: &str) -> Option<ExplicitMarkup> {
    // `.. _`name with colon`: url` quotes names that contain a colon.
    let (name, after) = if let Some(quoted) = text.strip_prefix('`') {
        let close = quoted.find("`:")?;
        (&quoted[..close], &quoted[close + 2..])
    } else {
        let colon = text.find(':')?;
        (&text[..colon], &text[colon + 1..])
    };

    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let url = after.trim();
    Some(ExplicitMarkup::Target {
        name: name.to_string(),
        url: (!url.is_empty()).then(|| url.to_string()),
    })
}

/// Parses `name:: arguments`.
///
/// Names consist of letters, digits and the separators `-`, `_`, `.`, `+`, `:`;
/// the `::` marker must be followed by whitespace or the end of the line.
pub fn parse_directive_opening(text: &str) -> Option<DirectiveOpening> {
    let marker = text.find("::")?;
    let name = &text[..marker];
    let after = &text[marker + 2..];

    if name.is_empty()
        || !name.starts_with(|c: char| c.is_alphanumeric())
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | ':'))
    {
        return None;
    }
    if !after.is_empty() && !after.starts_with(char::is_whitespace) {
        return None;
    }

    Some(DirectiveOpening {
        name: name.to_lowercase(),
        arguments: after.trim().to_string(),
    })
}

/// Directive handlers keyed by name and alias.
#[derive(Clone, Default)]
pub struct DirectiveRegistry {
    entries: HashMap<String, Arc<dyn Directive>>,
}

impl DirectiveRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `directive` under its name and every alias.
    ///
    /// Existing entries for any of these keys are overwritten. Keys not named by
    /// this directive are left alone, so an alias written by an earlier
    /// registration keeps pointing at the earlier object.
    pub fn register(&mut self, directive: Arc<dyn Directive>) {
        let name = directive.name().to_lowercase();
        for alias in directive.aliases() {
            let alias = alias.to_lowercase();
            if self.entries.contains_key(&alias) {
                log::debug!("Directive alias \"{}\" re-registered", alias);
            }
            self.entries.insert(alias, Arc::clone(&directive));
        }
        if self.entries.contains_key(&name) {
            log::debug!("Directive \"{}\" re-registered", name);
        }
        self.entries.insert(name, directive);
    }

    /// Looks up a directive by name or alias.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Directive>> {
        self.entries.get(name).or_else(|| {
            // Entries are stored lowercased; avoid the allocation when possible.
            if name.chars().any(char::is_uppercase) {
                self.entries.get(&name.to_lowercase())
            } else {
                None
            }
        })
    }

    /// Whether any directive answers to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered keys (names and aliases), sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no directive is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("names", &self.names())
            .finish()
    }
}
