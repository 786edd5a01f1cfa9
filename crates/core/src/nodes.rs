//! Node tree produced by the document parser.
//!
//! The tree is an in-memory API object; `Serialize` is derived so embedders can
//! hand it across process boundaries, but the field layout is the contract.

use crate::error::{ErrorSeverity, ParseDiagnostics};
use serde::Serialize;

/// Root of a parsed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentNode {
    /// Document identity, if the parser was given one.
    pub filename: Option<String>,
    /// Top-level nodes in source order.
    pub children: Vec<Node>,
    /// Recoverable problems observed while parsing.
    pub diagnostics: ParseDiagnostics,
}

impl DocumentNode {
    /// Creates an empty document.
    pub fn new(filename: Option<String>) -> Self {
        Self {
            filename,
            children: Vec::new(),
            diagnostics: ParseDiagnostics::new(),
        }
    }

    /// Title of the first section, if the document has one.
    pub fn title(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::Section { title, .. } => Some(title.as_str()),
            _ => None,
        })
    }

    /// Visits every block node depth-first, in source order.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Collects every inline node of every paragraph, depth-first.
    pub fn inlines(&self) -> Vec<&Inline> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if let Node::Paragraph { content } = node {
                for inline in content {
                    inline.collect(&mut found);
                }
            }
        });
        found
    }
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// A titled section owning the nodes that follow its title.
    Section {
        /// Title text.
        title: String,
        /// Anchor id registered for the title.
        id: String,
        /// 1-based depth in the title hierarchy.
        level: usize,
        /// Hierarchical section number (e.g. `[2, 1]`), empty when numbering is off.
        number: Vec<usize>,
        /// Section content.
        children: Vec<Node>,
    },
    /// Running text.
    Paragraph {
        /// Inline content.
        content: Vec<Inline>,
    },
    /// Verbatim text.
    LiteralBlock {
        /// Text with the block indentation removed.
        text: String,
        /// Language hint, if any.
        language: Option<String>,
    },
    /// Indented content.
    BlockQuote {
        /// Quoted blocks.
        children: Vec<Node>,
    },
    /// A bullet list; every item is a sequence of blocks.
    BulletList {
        /// List items.
        items: Vec<Vec<Node>>,
    },
    /// Note, warning and friends.
    Admonition {
        /// Admonition kind (e.g. "note").
        kind: String,
        /// Optional title.
        title: Option<String>,
        /// Body content.
        children: Vec<Node>,
    },
    /// Generic wrapper produced by directives.
    Container {
        /// Name of the producing construct.
        name: String,
        /// Extra classes.
        classes: Vec<String>,
        /// Wrapped content.
        children: Vec<Node>,
    },
    /// An explicit hyperlink target (`.. _name:`).
    Target {
        /// Normalized target name.
        name: String,
        /// Anchor id.
        id: String,
    },
    /// A standalone adornment line between blocks.
    Transition,
    /// Explicit markup that is not a directive or target.
    Comment {
        /// Comment text.
        text: String,
    },
    /// Diagnostic placed where a construct could not be processed.
    SystemMessage {
        /// Severity of the problem.
        level: ErrorSeverity,
        /// Human readable description.
        message: String,
        /// Line the construct started on.
        line: usize,
    },
}

impl Node {
    /// Short kind name, used in events and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Section { .. } => "section",
            Node::Paragraph { .. } => "paragraph",
            Node::LiteralBlock { .. } => "literal_block",
            Node::BlockQuote { .. } => "block_quote",
            Node::BulletList { .. } => "bullet_list",
            Node::Admonition { .. } => "admonition",
            Node::Container { .. } => "container",
            Node::Target { .. } => "target",
            Node::Transition => "transition",
            Node::Comment { .. } => "comment",
            Node::SystemMessage { .. } => "system_message",
        }
    }

    /// Creates a paragraph holding plain text.
    pub fn text_paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph {
            content: vec![Inline::Text(text.into())],
        }
    }

    /// Child blocks, for the variants that have them.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Section { children, .. }
            | Node::BlockQuote { children }
            | Node::Admonition { children, .. }
            | Node::Container { children, .. } => children,
            _ => &[],
        }
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        if let Node::BulletList { items } = self {
            for item in items {
                for node in item {
                    node.walk(visit);
                }
            }
        }
        for child in self.children() {
            child.walk(visit);
        }
    }

    pub(crate) fn for_each_inline_mut(&mut self, f: &mut dyn FnMut(&mut Inline)) {
        match self {
            Node::Paragraph { content } => {
                for inline in content {
                    inline.for_each_mut(f);
                }
            }
            Node::BulletList { items } => {
                for node in items.iter_mut().flatten() {
                    node.for_each_inline_mut(f);
                }
            }
            Node::Section { children, .. }
            | Node::BlockQuote { children }
            | Node::Admonition { children, .. }
            | Node::Container { children, .. } => {
                for child in children {
                    child.for_each_inline_mut(f);
                }
            }
            _ => {}
        }
    }
}

/// An inline node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// `*emphasis*`
    Emphasis(Vec<Inline>),
    /// `**strong**`
    Strong(Vec<Inline>),
    /// ``` ``literal`` ```
    Literal(String),
    /// Interpreted text awaiting resolution at the end of the parse.
    PendingReference(ReferenceToken),
    /// A resolved cross-reference.
    Reference {
        /// Role that resolved it.
        role: String,
        /// Target as written.
        target: String,
        /// Link destination.
        url: String,
        /// Link text.
        text: String,
    },
    /// Placeholder for a reference no resolver could satisfy.
    UnresolvedReference(ReferenceToken),
}

impl Inline {
    fn collect<'a>(&'a self, found: &mut Vec<&'a Inline>) {
        found.push(self);
        if let Inline::Emphasis(children) | Inline::Strong(children) = self {
            for child in children {
                child.collect(found);
            }
        }
    }

    fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut Inline)) {
        f(self);
        if let Inline::Emphasis(children) | Inline::Strong(children) = self {
            for child in children {
                child.for_each_mut(f);
            }
        }
    }
}

/// Interpreted text as written in the source: `` :role:`label <target>` ``.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceToken {
    /// Role name; `None` for the default role.
    pub role: Option<String>,
    /// Target.
    pub target: String,
    /// Explicit link text.
    pub label: Option<String>,
    /// Line of the enclosing paragraph.
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_first_section() {
        let mut doc = DocumentNode::new(None);
        doc.children.push(Node::text_paragraph("intro"));
        doc.children.push(Node::Section {
            title: "First".into(),
            id: "first".into(),
            level: 1,
            number: vec![],
            children: vec![],
        });
        assert_eq!(doc.title(), Some("First"));
    }

    #[test]
    fn walk_visits_nested_blocks() {
        let mut doc = DocumentNode::new(None);
        doc.children.push(Node::BlockQuote {
            children: vec![Node::BulletList {
                items: vec![vec![Node::text_paragraph("a")], vec![Node::text_paragraph("b")]],
            }],
        });
        let mut kinds = Vec::new();
        doc.walk(&mut |node| kinds.push(node.kind()));
        assert_eq!(
            kinds,
            vec!["block_quote", "bullet_list", "paragraph", "paragraph"]
        );
    }

    #[test]
    fn inlines_include_nested_markup() {
        let mut doc = DocumentNode::new(None);
        doc.children.push(Node::Paragraph {
            content: vec![Inline::Strong(vec![Inline::Text("x".into())])],
        });
        assert_eq!(doc.inlines().len(), 2);
    }
}
