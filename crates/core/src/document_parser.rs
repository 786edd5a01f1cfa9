//! The recursive block parser.
//!
//! A [`DocumentParser`] runs one parse over some text and produces a
//! [`DocumentNode`]. Nested constructs (block quotes, list items, directive
//! bodies) are parsed by a [`BlockParser`] that shares the run's state, so
//! anchors declared anywhere in the input are visible when interpreted text is
//! resolved at the end.

use crate::context::DirectiveContext;
use crate::directives::{DirectiveInvocation, DirectiveRegistry, ExplicitMarkup, parse_explicit_markup};
use crate::environment::{Anchor, SharedEnvironment, TitleHierarchy, TitleStyle};
use crate::error::{ErrorSeverity, ParseDiagnostics, ParseError, SourceLocation};
use crate::events::ParseEvent;
use crate::inline::parse_inline;
use crate::lines::{Line, adornment_char, bullet_item, dedent, indented_block, join, split_lines};
use crate::nodes::{DocumentNode, Inline, Node, ReferenceToken};
use crate::parser::Extensions;
use crate::references::{ReferenceInvocation, ResolveScope};
use crate::slug::{Slugger, normalize_name};
use std::collections::BTreeMap;

/// Whether a parse may record into the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseScope {
    /// Titles, section numbers and anchors go to the bound environment.
    Document,
    /// Everything stays local to the parse; the environment is only read.
    Fragment,
}

/// State of one run, shared by every nested block parse of that run.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    pub(crate) diagnostics: ParseDiagnostics,
    local_anchors: BTreeMap<String, Anchor>,
    local_titles: TitleHierarchy,
    local_ids: Slugger,
    /// Targets seen since the last block; a section that follows lends them its title.
    pending_targets: Vec<String>,
}

/// One parse of one text.
pub(crate) struct DocumentParser<'a> {
    pub(crate) directives: &'a mut DirectiveRegistry,
    pub(crate) extensions: &'a Extensions,
    pub(crate) environment: Option<&'a SharedEnvironment>,
    pub(crate) scope: ParseScope,
    pub(crate) depth: usize,
    pub(crate) filename: Option<&'a str>,
}

impl DocumentParser<'_> {
    /// Parses `text`, resolving interpreted text once the whole input is read.
    pub(crate) fn parse(self, text: &str) -> Result<DocumentNode, ParseError> {
        let limit = self.extensions.options.max_nesting_depth;
        if self.depth > limit {
            return Err(ParseError::NestingTooDeep {
                depth: self.depth,
                limit,
            });
        }

        let filename = self.filename.map(str::to_string);
        self.extensions.events.notify(&ParseEvent::DocumentStarted {
            filename: filename.clone(),
            depth: self.depth,
        });
        log::debug!(
            "Parsing {} ({:?} scope, depth {})",
            self.filename.unwrap_or("(unknown)"),
            self.scope,
            self.depth
        );

        let mut state = RunState::default();
        let mut children = {
            let mut blocks = BlockParser {
                directives: &mut *self.directives,
                extensions: self.extensions,
                environment: self.environment,
                state: &mut state,
                scope: self.scope,
                depth: self.depth,
                filename: self.filename,
            };
            let lines = split_lines(text, 1);
            blocks.parse_lines(&lines)
        };

        if self.extensions.options.resolve_references {
            self.resolve_references(&mut children, &mut state);
        }

        let document = DocumentNode {
            filename,
            children,
            diagnostics: state.diagnostics,
        };
        self.extensions.events.notify(&ParseEvent::DocumentParsed {
            filename: document.filename.clone(),
            nodes: document.children.len(),
            diagnostics: document.diagnostics.count(),
        });
        Ok(document)
    }

    fn resolve_references(&self, nodes: &mut [Node], state: &mut RunState) {
        let mut unresolved: Vec<ReferenceToken> = Vec::new();
        {
            let registry = self.extensions.references.read();
            let environment = self.environment.map(SharedEnvironment::lock);
            let scope = ResolveScope::new(&state.local_anchors, environment.as_deref());

            for node in nodes.iter_mut() {
                node.for_each_inline_mut(&mut |inline| {
                    let Inline::PendingReference(token) = inline else {
                        return;
                    };
                    let resolved = registry.get(token.role.as_deref()).and_then(|reference| {
                        let invocation = ReferenceInvocation {
                            role: reference.role().to_string(),
                            target: token.target.clone(),
                            label: token.label.clone(),
                        };
                        reference
                            .resolve(&scope, &invocation)
                            .map(|resolved| (invocation.role, resolved))
                    });
                    *inline = match resolved {
                        Some((role, resolved)) => Inline::Reference {
                            role,
                            target: token.target.clone(),
                            url: resolved.url,
                            text: resolved.text,
                        },
                        None => {
                            unresolved.push(token.clone());
                            Inline::UnresolvedReference(token.clone())
                        }
                    };
                });
            }
        }

        for token in unresolved {
            let shown = match &token.role {
                Some(role) => format!(":{}:`{}`", role, token.target),
                None => format!("`{}`", token.target),
            };
            state
                .diagnostics
                .add_warning_at(format!("Unresolved reference {}", shown), self.location(token.line));
            self.extensions.events.notify(&ParseEvent::UnresolvedReference {
                role: token.role,
                target: token.target,
                line: token.line,
            });
        }
    }

    fn location(&self, line: usize) -> SourceLocation {
        location(self.filename, line)
    }
}

fn location(filename: Option<&str>, line: usize) -> SourceLocation {
    match filename {
        Some(file) => SourceLocation::with_file(file, line),
        None => SourceLocation::new(line),
    }
}

/// Parses a run of lines into blocks. Created per nesting level.
pub(crate) struct BlockParser<'a> {
    pub(crate) directives: &'a mut DirectiveRegistry,
    pub(crate) extensions: &'a Extensions,
    pub(crate) environment: Option<&'a SharedEnvironment>,
    pub(crate) state: &'a mut RunState,
    pub(crate) scope: ParseScope,
    pub(crate) depth: usize,
    pub(crate) filename: Option<&'a str>,
}

impl<'a> BlockParser<'a> {
    /// Parses `text` one level deeper than this parser.
    pub(crate) fn parse_nested_text(
        &mut self,
        text: &str,
        first_line: usize,
    ) -> Result<Vec<Node>, ParseError> {
        self.parse_nested(&split_lines(text, first_line))
    }

    fn parse_nested(&mut self, lines: &[Line]) -> Result<Vec<Node>, ParseError> {
        let depth = self.depth + 1;
        let limit = self.extensions.options.max_nesting_depth;
        if depth > limit {
            return Err(ParseError::NestingTooDeep { depth, limit });
        }
        let mut nested = BlockParser {
            directives: &mut *self.directives,
            extensions: self.extensions,
            environment: self.environment,
            state: &mut *self.state,
            scope: self.scope,
            depth,
            filename: self.filename,
        };
        Ok(nested.parse_lines(lines))
    }

    /// Nested content, or a system message standing in for it.
    fn nested_or_message(&mut self, lines: &[Line], line: usize) -> Vec<Node> {
        match self.parse_nested(lines) {
            Ok(nodes) => nodes,
            Err(err) => vec![self.system_message(ErrorSeverity::Error, err.to_string(), line)],
        }
    }

    fn system_message(&mut self, level: ErrorSeverity, message: String, line: usize) -> Node {
        let at = location(self.filename, line);
        match level {
            ErrorSeverity::Error => {
                log::warn!("{}: {}", at, message);
                self.state.diagnostics.add_error_at(message.clone(), at);
            }
            ErrorSeverity::Warning => self.state.diagnostics.add_warning_at(message.clone(), at),
        }
        Node::SystemMessage {
            level,
            message,
            line,
        }
    }

    pub(crate) fn parse_lines(&mut self, lines: &[Line]) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut idx = 0;

        while idx < lines.len() {
            let line = &lines[idx];
            if line.is_blank() {
                idx += 1;
                continue;
            }

            if line.indent() > 0 {
                let (block, next) = indented_block(lines, idx, 0);
                let children = self.nested_or_message(&dedent(block), line.number);
                self.state.pending_targets.clear();
                nodes.push(Node::BlockQuote { children });
                idx = next;
                continue;
            }

            if let Some(markup) = parse_explicit_markup(&line.text) {
                let (block, next) = indented_block(lines, idx + 1, 0);
                let is_target = matches!(markup, ExplicitMarkup::Target { .. });
                let produced = self.explicit_markup(markup, line.number, block);
                if !is_target {
                    self.state.pending_targets.clear();
                }
                nodes.extend(produced);
                idx = next;
                continue;
            }

            if let Some((node, next)) = self.section_title(lines, idx) {
                nodes.push(node);
                idx = next;
                continue;
            }
            self.state.pending_targets.clear();

            if adornment_char(line).is_some()
                && lines.get(idx + 1).is_none_or(Line::is_blank)
                && line.text.chars().count() >= 4
            {
                nodes.push(Node::Transition);
                idx += 1;
                continue;
            }

            if bullet_item(line).is_some() {
                let (list, next) = self.bullet_list(lines, idx);
                nodes.push(list);
                idx = next;
                continue;
            }

            let (produced, next) = self.paragraph(lines, idx);
            nodes.extend(produced);
            idx = next;
        }

        nest_sections(nodes)
    }

    fn explicit_markup(&mut self, markup: ExplicitMarkup, line: usize, block: &[Line]) -> Vec<Node> {
        match markup {
            ExplicitMarkup::Directive(opening) => {
                let invocation = DirectiveInvocation::from_block(opening, line, block);
                self.directive(invocation)
            }
            ExplicitMarkup::Target { name, url } => {
                // A URL may also be written on the indented lines below the marker.
                let url = url.or_else(|| {
                    let rest: Vec<&str> = block.iter().map(Line::content).filter(|l| !l.is_empty()).collect();
                    (!rest.is_empty()).then(|| rest.concat())
                });
                let id = self.register_target(&name, url.as_deref());
                vec![Node::Target {
                    name: normalize_name(&name),
                    id,
                }]
            }
            ExplicitMarkup::Comment(first) => {
                let mut text = first;
                let rest = join(&dedent(block));
                if !rest.is_empty() {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&rest);
                }
                vec![Node::Comment { text }]
            }
        }
    }

    fn directive(&mut self, invocation: DirectiveInvocation) -> Vec<Node> {
        let events = &self.extensions.events;
        let Some(directive) = self.directives.get(&invocation.name).cloned() else {
            events.notify(&ParseEvent::UnknownDirective {
                name: invocation.name.clone(),
                line: invocation.line,
            });
            self.state.diagnostics.add_warning_at(
                format!("Unknown directive \"{}\"", invocation.name),
                location(self.filename, invocation.line),
            );
            if !invocation.has_body() {
                return Vec::new();
            }
            let lines = split_lines(&invocation.body, invocation.body_line);
            return self.nested_or_message(&lines, invocation.line);
        };

        log::debug!("Running directive \"{}\" at line {}", invocation.name, invocation.line);
        events.notify(&ParseEvent::DirectiveInvoked {
            name: invocation.name.clone(),
            line: invocation.line,
        });

        let result = {
            let mut ctx = DirectiveContext {
                parser: BlockParser {
                    directives: &mut *self.directives,
                    extensions: self.extensions,
                    environment: self.environment,
                    state: &mut *self.state,
                    scope: self.scope,
                    depth: self.depth,
                    filename: self.filename,
                },
                line: invocation.line,
                body_line: invocation.body_line,
            };
            directive.run(&mut ctx, &invocation)
        };

        match result {
            Ok(nodes) => nodes,
            Err(err) => {
                let message = format!("Error in \"{}\" directive: {}", invocation.name, err);
                self.extensions.events.notify(&ParseEvent::DirectiveFailed {
                    name: invocation.name.clone(),
                    line: invocation.line,
                    message: err.to_string(),
                });
                vec![self.system_message(ErrorSeverity::Error, message, invocation.line)]
            }
        }
    }

    fn records_to_environment(&self) -> Option<&'a SharedEnvironment> {
        match self.scope {
            ParseScope::Document => self.environment,
            ParseScope::Fragment => None,
        }
    }

    fn register_target(&mut self, name: &str, url: Option<&str>) -> String {
        self.state.pending_targets.push(name.to_string());
        if let Some(environment) = self.records_to_environment() {
            let mut env = environment.lock();
            return match url {
                Some(url) => {
                    env.register_external_target(name, url);
                    env.anchor(name).map(|a| a.id.clone()).unwrap_or_default()
                }
                None => env.register_anchor(name, name),
            };
        }

        let id = self.state.local_ids.next_id(name);
        self.state
            .local_anchors
            .entry(normalize_name(name))
            .or_insert_with(|| Anchor {
                id: id.clone(),
                title: name.to_string(),
                document: self.filename.map(str::to_string),
                url: url.map(str::to_string),
            });
        id
    }

    /// Recognizes a title at `idx` (underlined, or over- and underlined).
    fn section_title(&mut self, lines: &[Line], idx: usize) -> Option<(Node, usize)> {
        let line = &lines[idx];
        let next = lines.get(idx + 1).filter(|l| !l.is_blank())?;

        let (title, style, consumed) = match adornment_char(line) {
            Some(marker) => {
                let under = lines.get(idx + 2)?;
                let title = next.content();
                if adornment_char(next).is_some()
                    || adornment_char(under) != Some(marker)
                    || under.text.chars().count() != line.text.chars().count()
                    || line.text.chars().count() < title.chars().count()
                {
                    return None;
                }
                (title, TitleStyle::new(marker, true), 3)
            }
            None => {
                let marker = adornment_char(next)?;
                let title = line.content();
                if next.text.chars().count() < title.chars().count() {
                    return None;
                }
                (title, TitleStyle::new(marker, false), 2)
            }
        };

        let title = title.to_string();
        let (id, level, number) = self.register_section(&title, style);
        Some((
            Node::Section {
                title,
                id,
                level,
                number,
                children: Vec::new(),
            },
            idx + consumed,
        ))
    }

    fn register_section(&mut self, title: &str, style: TitleStyle) -> (String, usize, Vec<usize>) {
        let pending = std::mem::take(&mut self.state.pending_targets);
        let numbering = self.extensions.options.section_numbering;

        if let Some(environment) = self.records_to_environment() {
            let mut env = environment.lock();
            let level = env.title_level(style);
            let number = if numbering {
                env.next_section_number(level)
            } else {
                Vec::new()
            };
            let id = env.register_anchor(title, title);
            for target in &pending {
                env.set_anchor_title(target, title);
            }
            return (id, level, number);
        }

        let level = self.state.local_titles.level_of(style);
        let id = self.state.local_ids.next_id(title);
        for target in &pending {
            if let Some(anchor) = self.state.local_anchors.get_mut(&normalize_name(target)) {
                anchor.title = title.to_string();
            }
        }
        self.state
            .local_anchors
            .entry(normalize_name(title))
            .or_insert_with(|| Anchor {
                id: id.clone(),
                title: title.to_string(),
                document: self.filename.map(str::to_string),
                url: None,
            });
        (id, level, Vec::new())
    }

    fn bullet_list(&mut self, lines: &[Line], start: usize) -> (Node, usize) {
        let mut items = Vec::new();
        let mut idx = start;

        loop {
            let line = &lines[idx];
            let Some((text, column)) = bullet_item(line) else {
                break;
            };
            let mut item_lines = vec![Line {
                text: text.to_string(),
                number: line.number,
            }];
            let (block, next) = indented_block(lines, idx + 1, column.saturating_sub(1));
            item_lines.extend(block.iter().map(|l| l.dedented(column)));
            items.push(self.nested_or_message(&item_lines, line.number));
            idx = next;

            let following = lines[idx..].iter().position(|l| !l.is_blank()).map(|p| idx + p);
            match following {
                Some(pos) if lines[pos].indent() == 0 && bullet_item(&lines[pos]).is_some() => idx = pos,
                _ => break,
            }
        }

        (Node::BulletList { items }, idx)
    }

    fn paragraph(&mut self, lines: &[Line], start: usize) -> (Vec<Node>, usize) {
        let mut idx = start;
        while idx < lines.len() && !lines[idx].is_blank() && lines[idx].indent() == 0 {
            idx += 1;
        }
        let first_line = lines[start].number;
        let text = lines[start..idx]
            .iter()
            .map(Line::content)
            .collect::<Vec<_>>()
            .join(" ");

        let mut nodes = Vec::new();
        if text.ends_with("::") {
            let body = lines[idx..].iter().position(|l| !l.is_blank()).map(|p| idx + p);
            if let Some(body) = body
                && lines[body].indent() > 0
            {
                let (block, next) = indented_block(lines, body, 0);
                let paragraph = if text == "::" {
                    None
                } else if let Some(stripped) = text.strip_suffix(" ::") {
                    Some(stripped.trim_end().to_string())
                } else {
                    Some(text[..text.len() - 1].to_string())
                };
                if let Some(paragraph) = paragraph {
                    nodes.push(Node::Paragraph {
                        content: parse_inline(&paragraph, first_line),
                    });
                }
                nodes.push(Node::LiteralBlock {
                    text: join(&dedent(block)),
                    language: None,
                });
                return (nodes, next);
            }
        }

        nodes.push(Node::Paragraph {
            content: parse_inline(&text, first_line),
        });
        (nodes, idx)
    }
}

/// Moves the nodes following each section title into that section.
fn nest_sections(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut open: Vec<Node> = Vec::new();

    for node in nodes {
        if let Node::Section { level, .. } = &node {
            let level = *level;
            while open.last().is_some_and(|s| section_level(s) >= level) {
                close_section(&mut open, &mut out);
            }
            open.push(node);
            continue;
        }
        match open.last_mut() {
            Some(Node::Section { children, .. }) => children.push(node),
            _ => out.push(node),
        }
    }
    while !open.is_empty() {
        close_section(&mut open, &mut out);
    }
    out
}

fn section_level(node: &Node) -> usize {
    match node {
        Node::Section { level, .. } => *level,
        _ => 0,
    }
}

fn close_section(open: &mut Vec<Node>, out: &mut Vec<Node>) {
    let Some(section) = open.pop() else {
        return;
    };
    match open.last_mut() {
        Some(Node::Section { children, .. }) => children.push(section),
        _ => out.push(section),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEventSink;
    use crate::parse::ParseOptions;
    use crate::parser::Parser;
    use std::sync::Arc;

    fn parser() -> Parser {
        Parser::builder().with_events(Arc::new(NullEventSink)).build()
    }

    fn parse(text: &str) -> DocumentNode {
        let env = SharedEnvironment::default();
        parser().parse(&env, text).unwrap().clone()
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn sections_nest_by_adornment_order() {
        let doc = parse("Title\n=====\n\nIntro text.\n\nSub\n---\n\nBody.\n\nSecond\n======\n");

        assert_eq!(doc.children.len(), 2);
        let Node::Section {
            title,
            id,
            level,
            number,
            children,
        } = &doc.children[0]
        else {
            panic!("expected a section, got {:?}", doc.children[0]);
        };
        assert_eq!(title, "Title");
        assert_eq!(id, "title");
        assert_eq!(*level, 1);
        assert_eq!(number, &vec![1]);
        assert_eq!(children[0], Node::text_paragraph("Intro text."));
        assert!(matches!(
            &children[1],
            Node::Section { level: 2, number, .. } if number == &vec![1, 1]
        ));
        assert!(matches!(
            &doc.children[1],
            Node::Section { level: 1, number, children, .. } if number == &vec![2] && children.is_empty()
        ));
    }

    #[test]
    fn overlined_titles_are_a_separate_style() {
        let doc = parse("=====\nTitle\n=====\n\nSub\n=====\n");
        let Node::Section { children, .. } = &doc.children[0] else {
            panic!("expected a section");
        };
        assert!(matches!(&children[0], Node::Section { level: 2, title, .. } if title == "Sub"));
    }

    #[test]
    fn literal_block_marker_variants() {
        let doc = parse("Example::\n\n   code here\n   more\n\nAfter");
        assert_eq!(
            doc.children,
            vec![
                Node::text_paragraph("Example:"),
                Node::LiteralBlock {
                    text: "code here\nmore".into(),
                    language: None,
                },
                Node::text_paragraph("After"),
            ]
        );

        let doc = parse("::\n\n    x");
        assert_eq!(
            doc.children,
            vec![Node::LiteralBlock {
                text: "x".into(),
                language: None,
            }]
        );

        let doc = parse("Run this ::\n\n  x");
        assert_eq!(doc.children[0], Node::text_paragraph("Run this"));
    }

    #[test]
    fn bullet_items_take_continuation_lines() {
        let doc = parse("- one\n- two\n  continued\n\n- three\n\nafter");
        assert_eq!(
            doc.children,
            vec![
                Node::BulletList {
                    items: vec![
                        vec![Node::text_paragraph("one")],
                        vec![Node::text_paragraph("two continued")],
                        vec![Node::text_paragraph("three")],
                    ],
                },
                Node::text_paragraph("after"),
            ]
        );
    }

    #[test]
    fn indented_text_is_a_block_quote() {
        let doc = parse("para\n\n   quoted text\n\nend");
        assert_eq!(
            doc.children,
            vec![
                Node::text_paragraph("para"),
                Node::BlockQuote {
                    children: vec![Node::text_paragraph("quoted text")],
                },
                Node::text_paragraph("end"),
            ]
        );
    }

    #[test]
    fn non_breaking_space_is_content_not_indent() {
        let doc = parse("para\n\n  a\n \u{a0}b\n");
        assert_eq!(
            doc.children,
            vec![
                Node::text_paragraph("para"),
                Node::BlockQuote {
                    children: vec![
                        Node::BlockQuote {
                            children: vec![Node::text_paragraph("a")],
                        },
                        Node::text_paragraph("\u{a0}b"),
                    ],
                },
            ]
        );
    }

    #[test]
    fn comments_and_transitions() {
        let doc = parse(".. a comment\n   continues\n\nText\n\n----\n\nMore");
        assert_eq!(
            doc.children,
            vec![
                Node::Comment {
                    text: "a comment\ncontinues".into(),
                },
                Node::text_paragraph("Text"),
                Node::Transition,
                Node::text_paragraph("More"),
            ]
        );
    }

    #[test]
    fn references_resolve_forward_to_titled_targets() {
        let doc = parse(
            "See :ref:`later`.\n\n.. _later:\n\nLater Section\n=============\n\nText.",
        );
        assert_eq!(
            doc.children[0],
            Node::Paragraph {
                content: vec![
                    text("See "),
                    Inline::Reference {
                        role: "ref".into(),
                        target: "later".into(),
                        url: "#later".into(),
                        text: "Later Section".into(),
                    },
                    text("."),
                ],
            }
        );
        assert_eq!(
            doc.children[1],
            Node::Target {
                name: "later".into(),
                id: "later".into(),
            }
        );
        assert!(!doc.diagnostics.has_any());
    }

    #[test]
    fn external_targets_resolve_to_their_url() {
        let doc = parse("Read `the docs <docs>`_.\n\n.. _docs: https://example.com/docs\n");
        assert!(matches!(
            &doc.children[0],
            Node::Paragraph { content } if content[1] == Inline::Reference {
                role: "ref".into(),
                target: "docs".into(),
                url: "https://example.com/docs".into(),
                text: "the docs".into(),
            }
        ));
    }

    #[test]
    fn fragment_scope_leaves_environment_alone() {
        let env = SharedEnvironment::default();
        let mut parser = parser();
        parser.parse(&env, "Top\n===\n").unwrap();

        let fragment = parser
            .parse_fragment("Frag\n----\n\n.. _x:\n\nSee `x`_ and `top`_.")
            .unwrap();

        let env = env.lock();
        assert_eq!(env.anchors().count(), 1);
        assert_eq!(env.title_hierarchy().depth(), 1);
        drop(env);

        let Node::Section { level, number, children, .. } = &fragment.children[0] else {
            panic!("expected a section");
        };
        assert_eq!(*level, 1);
        assert!(number.is_empty());
        // Local targets first, then the environment.
        let Node::Paragraph { content } = &children[1] else {
            panic!("expected a paragraph");
        };
        assert!(matches!(&content[1], Inline::Reference { url, .. } if url == "#x"));
        assert!(matches!(&content[3], Inline::Reference { url, .. } if url == "#top"));
    }

    #[test]
    fn unknown_directive_body_is_kept() {
        let doc = parse(".. mystery:: arg\n\n   Inner text\n");
        assert_eq!(doc.children, vec![Node::text_paragraph("Inner text")]);
        assert_eq!(doc.diagnostics.warnings.len(), 1);
        assert_eq!(doc.diagnostics.warnings[0].location.line, 1);
    }

    #[test]
    fn numbering_can_be_disabled() {
        let env = SharedEnvironment::default();
        let mut parser = Parser::builder()
            .with_events(Arc::new(NullEventSink))
            .with_options(ParseOptions::new().with_section_numbering(false))
            .build();
        let doc = parser.parse(&env, "Aa\n==\n").unwrap();
        assert!(matches!(&doc.children[0], Node::Section { number, .. } if number.is_empty()));
    }

    #[test]
    fn pending_references_survive_when_resolution_is_off() {
        let env = SharedEnvironment::default();
        let mut parser = Parser::builder()
            .with_events(Arc::new(NullEventSink))
            .with_options(ParseOptions::new().with_reference_resolution(false))
            .build();
        let doc = parser.parse(&env, ":ref:`x`").unwrap();
        assert!(matches!(doc.inlines()[0], Inline::PendingReference(_)));
        assert!(!doc.diagnostics.has_any());
    }
}
