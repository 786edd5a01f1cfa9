//! Line scanning primitives for the block grammar.
//!
//! The document parser never looks at raw text directly; it walks a slice of
//! [`Line`]s and cuts indented blocks out of it with the helpers below.

/// Tab stops are every 8 columns, as in the markup's reference grammar.
const TAB_WIDTH: usize = 8;

/// One physical line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line text with tabs expanded and trailing whitespace removed.
    pub text: String,
    /// 1-indexed line number in the outermost document.
    pub number: usize,
}

impl Line {
    /// Creates a line, expanding tabs and trimming trailing whitespace.
    pub fn new(raw: &str, number: usize) -> Self {
        Self {
            text: expand_tabs(raw).trim_end().to_string(),
            number,
        }
    }

    /// Number of leading spaces. Tabs are already expanded; any other
    /// whitespace counts as content.
    pub fn indent(&self) -> usize {
        self.text.len() - self.content().len()
    }

    /// Text after the leading indentation.
    pub fn content(&self) -> &str {
        self.text.trim_start_matches(' ')
    }

    /// Whether the line holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the line with `columns` leading spaces removed.
    pub fn dedented(&self, columns: usize) -> Line {
        let cut = columns.min(self.indent());
        Line {
            text: self.text[cut..].to_string(),
            number: self.number,
        }
    }
}

/// Splits input into numbered lines, starting at `first_line`.
pub fn split_lines(input: &str, first_line: usize) -> Vec<Line> {
    input
        .split('\n')
        .enumerate()
        .map(|(idx, raw)| Line::new(raw.strip_suffix('\r').unwrap_or(raw), first_line + idx))
        .collect()
}

fn expand_tabs(raw: &str) -> String {
    if !raw.contains('\t') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len() + TAB_WIDTH);
    let mut col = 0;
    for ch in raw.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - (col % TAB_WIDTH);
            out.extend(std::iter::repeat_n(' ', pad));
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// Collects the block of lines starting at `start` that are blank or indented
/// by more than `parent_indent` columns.
///
/// Trailing blank lines are not part of the block. Returns the block and the
/// index of the first line after it.
pub fn indented_block(lines: &[Line], start: usize, parent_indent: usize) -> (&[Line], usize) {
    let mut end = start;
    let mut last_content = start;

    while end < lines.len() {
        let line = &lines[end];
        if line.is_blank() {
            end += 1;
            continue;
        }
        if line.indent() <= parent_indent {
            break;
        }
        end += 1;
        last_content = end;
    }

    (&lines[start..last_content], last_content)
}

/// Removes the common indentation of all non-blank lines.
pub fn dedent(lines: &[Line]) -> Vec<Line> {
    let common = lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(Line::indent)
        .min()
        .unwrap_or(0);

    lines.iter().map(|l| l.dedented(common)).collect()
}

/// Joins lines back into text, one `\n` between lines.
pub fn join(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drops leading and trailing blank lines.
pub fn trim_blank(lines: &[Line]) -> &[Line] {
    let start = lines.iter().position(|l| !l.is_blank()).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.is_blank())
        .map_or(start, |idx| idx + 1);
    &lines[start..end]
}

/// Returns the adornment character when the line is a section underline or
/// overline: at least two repetitions of one punctuation character.
pub fn adornment_char(line: &Line) -> Option<char> {
    if line.indent() > 0 {
        return None;
    }
    let mut chars = line.text.chars();
    let first = chars.next()?;
    if !is_adornment_punctuation(first) {
        return None;
    }
    let run_len = 1 + chars.by_ref().take_while(|c| *c == first).count();
    if run_len >= 2 && run_len == line.text.chars().count() {
        Some(first)
    } else {
        None
    }
}

fn is_adornment_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '!' | '"'
            | '#'
            | '$'
            | '%'
            | '&'
            | '\''
            | '('
            | ')'
            | '*'
            | '+'
            | ','
            | '-'
            | '.'
            | '/'
            | ':'
            | ';'
            | '<'
            | '='
            | '>'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
            | '^'
            | '_'
            | '`'
            | '{'
            | '|'
            | '}'
            | '~'
    )
}

/// Returns the text after a bullet marker (`- `, `* `, `+ `) and the column
/// at which that text starts.
pub fn bullet_item(line: &Line) -> Option<(&str, usize)> {
    let content = line.content();
    let mut chars = content.chars();
    let marker = chars.next()?;
    if !matches!(marker, '-' | '*' | '+') {
        return None;
    }
    let rest = &content[1..];
    if rest.is_empty() {
        return Some(("", line.indent() + 2));
    }
    if !rest.starts_with(' ') {
        return None;
    }
    let text = rest.trim_start_matches(' ');
    let text_col = line.indent() + 1 + (rest.len() - text.len());
    Some((text, text_col))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &str) -> Vec<Line> {
        split_lines(input, 1)
    }

    #[test]
    fn tabs_expand_to_eight_columns() {
        let line = Line::new("\tcode", 1);
        assert_eq!(line.indent(), 8);
        let line = Line::new("ab\tc", 1);
        assert_eq!(line.text, "ab      c");
    }

    #[test]
    fn numbering_starts_at_offset() {
        let ls = split_lines("a\r\nb", 10);
        assert_eq!(ls[0].text, "a");
        assert_eq!(ls[1].number, 11);
    }

    #[test]
    fn indented_block_stops_at_parent_indent() {
        let ls = lines("   one\n\n   two\n\nback");
        let (block, next) = indented_block(&ls, 0, 0);
        assert_eq!(block.len(), 3);
        assert_eq!(next, 3);
        assert_eq!(ls[4].text, "back");
    }

    #[test]
    fn indented_block_excludes_trailing_blanks() {
        let ls = lines("  a\n  b\n\n\n");
        let (block, next) = indented_block(&ls, 0, 0);
        assert_eq!(join(block), "  a\n  b");
        assert_eq!(next, 2);
    }

    #[test]
    fn only_spaces_count_as_indentation() {
        let ls = lines("  a\n \u{a0}b\n\u{3000}c");
        assert_eq!(ls[1].indent(), 1);
        assert_eq!(ls[1].content(), "\u{a0}b");
        assert_eq!(ls[2].indent(), 0);
        assert_eq!(join(&dedent(&ls[..2])), " a\n\u{a0}b");
    }

    #[test]
    fn dedent_uses_smallest_indent() {
        let ls = lines("    a\n\n  b\n      c");
        assert_eq!(join(&dedent(&ls)), "  a\n\nb\n    c");
    }

    #[test]
    fn adornments_detected() {
        assert_eq!(adornment_char(&Line::new("=====", 1)), Some('='));
        assert_eq!(adornment_char(&Line::new("--", 1)), Some('-'));
        assert_eq!(adornment_char(&Line::new("-", 1)), None);
        assert_eq!(adornment_char(&Line::new("==-==", 1)), None);
        assert_eq!(adornment_char(&Line::new("  ====", 1)), None);
        assert_eq!(adornment_char(&Line::new("abcd", 1)), None);
    }

    #[test]
    fn bullets_detected() {
        assert_eq!(bullet_item(&Line::new("- item", 1)), Some(("item", 2)));
        assert_eq!(bullet_item(&Line::new("  *   wide", 1)), Some(("wide", 6)));
        assert_eq!(bullet_item(&Line::new("-dash", 1)), None);
        assert_eq!(bullet_item(&Line::new("text", 1)), None);
    }

    #[test]
    fn trim_blank_edges() {
        let ls = lines("\n\na\n\nb\n\n");
        assert_eq!(join(trim_blank(&ls)), "a\n\nb");
        let empty = lines("\n\n");
        assert!(trim_blank(&empty).is_empty());
    }
}
