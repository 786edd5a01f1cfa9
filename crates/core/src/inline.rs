//! Inline markup: emphasis, strong, literals and interpreted text.
//!
//! Interpreted text becomes [`Inline::PendingReference`]; the document parser
//! resolves those once the whole input has been read, so references may
//! point at targets declared further down.

use crate::nodes::{Inline, ReferenceToken};

/// Parses one paragraph's text into inline nodes.
///
/// Markup that is not terminated is kept as literal text.
pub fn parse_inline(text: &str, line: usize) -> Vec<Inline> {
    let mut nodes = Vec::new();
    let mut buffer = String::new();
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(ch) = rest.chars().next() {
        if ch == '\\' {
            let escaped = rest[1..].chars().next();
            match escaped {
                Some(next) => {
                    buffer.push(next);
                    rest = &rest[1 + next.len_utf8()..];
                    prev = Some(next);
                }
                None => {
                    buffer.push('\\');
                    rest = "";
                }
            }
            continue;
        }

        if may_start_markup(prev)
            && let Some((inline, consumed)) = markup_at(rest, line)
        {
            flush_text(&mut buffer, &mut nodes);
            nodes.push(inline);
            prev = rest[..consumed].chars().last();
            rest = &rest[consumed..];
            continue;
        }

        buffer.push(ch);
        prev = Some(ch);
        rest = &rest[ch.len_utf8()..];
    }

    flush_text(&mut buffer, &mut nodes);
    nodes
}

fn flush_text(buffer: &mut String, nodes: &mut Vec<Inline>) {
    if !buffer.is_empty() {
        nodes.push(Inline::Text(std::mem::take(buffer)));
    }
}

fn may_start_markup(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '(' | '[' | '{' | '<' | '"' | '\'' | '-' | '/'),
    }
}

/// Recognizes markup at the start of `rest`, returning the node and the
/// number of bytes it spans.
fn markup_at(rest: &str, line: usize) -> Option<(Inline, usize)> {
    if let Some(after) = rest.strip_prefix("``") {
        let end = after.find("``")?;
        let content = &after[..end];
        if content.is_empty() {
            return None;
        }
        return Some((Inline::Literal(content.to_string()), end + 4));
    }

    if let Some(after) = rest.strip_prefix("**") {
        let content = delimited(after, "**")?;
        return Some((
            Inline::Strong(vec![Inline::Text(content.to_string())]),
            content.len() + 4,
        ));
    }

    if let Some(after) = rest.strip_prefix('*') {
        let content = delimited(after, "*")?;
        return Some((
            Inline::Emphasis(vec![Inline::Text(content.to_string())]),
            content.len() + 2,
        ));
    }

    if let Some(after) = rest.strip_prefix(':') {
        let role_end = after.find(":`")?;
        let role = &after[..role_end];
        if role.is_empty()
            || !role
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | ':'))
        {
            return None;
        }
        let body = &after[role_end + 2..];
        let close = body.find('`')?;
        let token = reference_token(Some(role), &body[..close], line)?;
        return Some((Inline::PendingReference(token), 1 + role_end + 2 + close + 1));
    }

    if let Some(after) = rest.strip_prefix('`') {
        let close = after.find('`')?;
        let token = reference_token(None, &after[..close], line)?;
        let mut consumed = close + 2;
        // `target`_ and `target`__ are hyperlink references to the same target.
        consumed += after[close + 1..]
            .chars()
            .take_while(|c| *c == '_')
            .take(2)
            .count();
        return Some((Inline::PendingReference(token), consumed));
    }

    None
}

/// Content up to `closer`, rejecting empty content or content with
/// whitespace just inside the delimiters.
fn delimited<'a>(after: &'a str, closer: &str) -> Option<&'a str> {
    let end = after.find(closer)?;
    let content = &after[..end];
    if content.is_empty() || content.trim() != content {
        return None;
    }
    Some(content)
}

fn reference_token(role: Option<&str>, content: &str, line: usize) -> Option<ReferenceToken> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }
    let (label, target) = split_label(content);
    Some(ReferenceToken {
        role: role.map(str::to_string),
        target: target.to_string(),
        label: label.map(str::to_string),
        line,
    })
}

/// Splits `label <target>` into its parts.
fn split_label(content: &str) -> (Option<&str>, &str) {
    if let Some(inner) = content.strip_suffix('>')
        && let Some(open) = inner.rfind('<')
    {
        let label = inner[..open].trim();
        let target = inner[open + 1..].trim();
        if !target.is_empty() && (label.is_empty() || inner[..open].ends_with(char::is_whitespace))
        {
            return ((!label.is_empty()).then_some(label), target);
        }
    }
    (None, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn pending(role: Option<&str>, target: &str, label: Option<&str>) -> Inline {
        Inline::PendingReference(ReferenceToken {
            role: role.map(Into::into),
            target: target.into(),
            label: label.map(Into::into),
            line: 1,
        })
    }

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(parse_inline("just words", 1), vec![text("just words")]);
        assert!(parse_inline("", 1).is_empty());
    }

    #[test]
    fn emphasis_strong_literal() {
        assert_eq!(
            parse_inline("a *b* **c** ``d*e``", 1),
            vec![
                text("a "),
                Inline::Emphasis(vec![text("b")]),
                text(" "),
                Inline::Strong(vec![text("c")]),
                text(" "),
                Inline::Literal("d*e".into()),
            ]
        );
    }

    #[test]
    fn roles_with_and_without_labels() {
        assert_eq!(
            parse_inline("see :ref:`intro` and :doc:`the guide <guide/index>`", 1),
            vec![
                text("see "),
                pending(Some("ref"), "intro", None),
                text(" and "),
                pending(Some("doc"), "guide/index", Some("the guide")),
            ]
        );
    }

    #[test]
    fn default_role_and_hyperlink_suffix() {
        assert_eq!(
            parse_inline("`intro` `docs`_ end", 1),
            vec![
                pending(None, "intro", None),
                text(" "),
                pending(None, "docs", None),
                text(" end"),
            ]
        );
    }

    #[test]
    fn unterminated_markup_is_text() {
        assert_eq!(parse_inline("2 * 3 and *open", 1), vec![text("2 * 3 and *open")]);
        assert_eq!(parse_inline(":ref:`open", 1), vec![text(":ref:`open")]);
        assert_eq!(parse_inline("``", 1), vec![text("``")]);
    }

    #[test]
    fn markup_needs_a_word_boundary() {
        assert_eq!(parse_inline("a*b*c", 1), vec![text("a*b*c")]);
        assert_eq!(parse_inline("(*x*)", 1)[1], Inline::Emphasis(vec![text("x")]));
    }

    #[test]
    fn escapes_suppress_markup() {
        assert_eq!(parse_inline("\\*not\\* it", 1), vec![text("*not* it")]);
        assert_eq!(parse_inline("trailing\\", 1), vec![text("trailing\\")]);
    }

    #[test]
    fn angle_brackets_without_space_are_part_of_target() {
        assert_eq!(
            parse_inline(":ref:`a<b>`", 1),
            vec![pending(Some("ref"), "a<b>", None)]
        );
        assert_eq!(
            parse_inline(":ref:`<only>`", 1),
            vec![pending(Some("ref"), "only", None)]
        );
    }
}
