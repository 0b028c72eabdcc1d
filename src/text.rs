//! Text Module — measurement, styled text, and wrapping.
//!
//! Responsibilities:
//! - Display width of strings and grapheme clusters
//! - `Span` / `Line` / `Text` styled text model
//! - Word wrapping by display width, breaking oversized words by grapheme
//!
//! Width follows unicode-width 0.2: ASCII is 1 cell, CJK and emoji are
//! 2 cells, combining marks are 0 cells.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::style::Style;

/// Measure the display cell width of a UTF-8 string.
pub fn width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Iterate extended grapheme clusters.
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> {
    UnicodeSegmentation::graphemes(text, true)
}

/// Count user-visible grapheme clusters.
pub fn grapheme_count(text: &str) -> usize {
    graphemes(text).count()
}

/// Truncate to at most `max_width` cells without splitting a grapheme.
pub fn truncate(text: &str, max_width: usize) -> Cow<'_, str> {
    if width(text) <= max_width {
        return Cow::Borrowed(text);
    }
    let mut used = 0;
    let mut end = 0;
    for (idx, g) in UnicodeSegmentation::grapheme_indices(text, true) {
        let w = width(g);
        if used + w > max_width {
            break;
        }
        used += w;
        end = idx + g.len();
    }
    Cow::Owned(text[..end].to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Column offset of content `content_width` wide inside `available`.
    pub fn offset(self, content_width: u16, available: u16) -> u16 {
        let slack = available.saturating_sub(content_width);
        match self {
            Alignment::Left => 0,
            Alignment::Center => slack / 2,
            Alignment::Right => slack,
        }
    }
}

// ============================================================================
// Styled text model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "SpanRepr")]
pub struct Span {
    pub content: String,
    #[serde(default)]
    pub style: Style,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpanRepr {
    Raw(String),
    Styled {
        content: String,
        #[serde(default)]
        style: Style,
    },
}

impl From<SpanRepr> for Span {
    fn from(repr: SpanRepr) -> Self {
        match repr {
            SpanRepr::Raw(content) => Span::raw(content),
            SpanRepr::Styled { content, style } => Span { content, style },
        }
    }
}

impl Span {
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: Style::default(),
        }
    }

    pub fn styled(content: impl Into<String>, style: Style) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    pub fn width(&self) -> usize {
        width(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "LineRepr")]
pub struct Line {
    pub spans: Vec<Span>,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LineRepr {
    Raw(String),
    Spans(Vec<Span>),
    Styled {
        spans: Vec<Span>,
        #[serde(default)]
        style: Style,
        #[serde(default)]
        alignment: Option<Alignment>,
    },
}

impl From<LineRepr> for Line {
    fn from(repr: LineRepr) -> Self {
        match repr {
            LineRepr::Raw(s) => Line::raw(s),
            LineRepr::Spans(spans) => Line::from(spans),
            LineRepr::Styled {
                spans,
                style,
                alignment,
            } => Line {
                spans,
                style,
                alignment,
            },
        }
    }
}

impl Line {
    pub fn raw(content: impl Into<String>) -> Self {
        Self::from(vec![Span::raw(content)])
    }

    pub fn styled(content: impl Into<String>, style: Style) -> Self {
        Self::from(vec![Span::styled(content, style)])
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Compose `style` over the line style.
    pub fn patch_style(mut self, style: Style) -> Self {
        self.style = self.style.patch(style);
        self
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Graphemes paired with the span style patched over the line style.
    pub fn styled_graphemes(&self) -> impl Iterator<Item = StyledGrapheme<'_>> {
        let line_style = self.style;
        self.spans.iter().flat_map(move |span| {
            let style = line_style.patch(span.style);
            graphemes(&span.content).map(move |symbol| StyledGrapheme { symbol, style })
        })
    }
}

impl From<Vec<Span>> for Line {
    fn from(spans: Vec<Span>) -> Self {
        Self {
            spans,
            style: Style::default(),
            alignment: None,
        }
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Line::raw(s)
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Line::raw(s)
    }
}

/// Multi-line styled text. JSON accepts a plain string (split on `\n`),
/// an array of lines, or `{lines, style, alignment}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "TextRepr")]
pub struct Text {
    pub lines: Vec<Line>,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextRepr {
    Raw(String),
    Lines(Vec<Line>),
    Styled {
        lines: Vec<Line>,
        #[serde(default)]
        style: Style,
        #[serde(default)]
        alignment: Option<Alignment>,
    },
}

impl From<TextRepr> for Text {
    fn from(repr: TextRepr) -> Self {
        match repr {
            TextRepr::Raw(s) => Text::raw(s),
            TextRepr::Lines(lines) => Text::from(lines),
            TextRepr::Styled {
                lines,
                style,
                alignment,
            } => Text {
                lines,
                style,
                alignment,
            },
        }
    }
}

impl Text {
    pub fn raw(content: impl AsRef<str>) -> Self {
        let lines = content.as_ref().split('\n').map(Line::raw).collect();
        Self {
            lines,
            style: Style::default(),
            alignment: None,
        }
    }

    pub fn width(&self) -> usize {
        self.lines.iter().map(Line::width).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

impl From<Vec<Line>> for Text {
    fn from(lines: Vec<Line>) -> Self {
        Self {
            lines,
            style: Style::default(),
            alignment: None,
        }
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::raw(s)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::raw(s)
    }
}

// ============================================================================
// Wrapping
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledGrapheme<'a> {
    pub symbol: &'a str,
    pub style: Style,
}

impl StyledGrapheme<'_> {
    fn is_whitespace(&self) -> bool {
        self.symbol.chars().all(char::is_whitespace)
    }

    pub fn width(&self) -> usize {
        width(self.symbol)
    }
}

/// Word-wrap a sequence of graphemes into rows at most `max_width` wide.
///
/// Whitespace at a break point is dropped. Words wider than a row are split
/// by grapheme. With `trim`, leading whitespace of the input is dropped too.
pub fn wrap_graphemes<'a>(
    graphemes: impl IntoIterator<Item = StyledGrapheme<'a>>,
    max_width: usize,
    trim: bool,
) -> Vec<Vec<StyledGrapheme<'a>>> {
    let mut rows: Vec<Vec<StyledGrapheme<'a>>> = Vec::new();
    if max_width == 0 {
        return rows;
    }

    let mut row: Vec<StyledGrapheme<'a>> = Vec::new();
    let mut row_width = 0usize;
    let mut pending_ws: Vec<StyledGrapheme<'a>> = Vec::new();
    let mut word: Vec<StyledGrapheme<'a>> = Vec::new();
    let mut at_line_start = true;

    let flush_word = |row: &mut Vec<StyledGrapheme<'a>>,
                          row_width: &mut usize,
                          pending_ws: &mut Vec<StyledGrapheme<'a>>,
                          word: &mut Vec<StyledGrapheme<'a>>,
                          rows: &mut Vec<Vec<StyledGrapheme<'a>>>| {
        if word.is_empty() {
            return;
        }
        let ws_width: usize = pending_ws.iter().map(StyledGrapheme::width).sum();
        let word_width: usize = word.iter().map(StyledGrapheme::width).sum();

        if *row_width + ws_width + word_width <= max_width {
            row.append(pending_ws);
            *row_width += ws_width + word_width;
            row.append(word);
            return;
        }

        pending_ws.clear();
        if !row.is_empty() {
            rows.push(std::mem::take(row));
            *row_width = 0;
        }
        for g in word.drain(..) {
            let w = g.width();
            if *row_width + w > max_width && !row.is_empty() {
                rows.push(std::mem::take(row));
                *row_width = 0;
            }
            if w > max_width {
                // A grapheme wider than the row can never be shown.
                continue;
            }
            row.push(g);
            *row_width += w;
        }
    };

    for g in graphemes {
        if g.is_whitespace() {
            if !word.is_empty() {
                flush_word(&mut row, &mut row_width, &mut pending_ws, &mut word, &mut rows);
                at_line_start = false;
            }
            if at_line_start && trim {
                continue;
            }
            pending_ws.push(g);
        } else {
            word.push(g);
        }
    }
    flush_word(&mut row, &mut row_width, &mut pending_ws, &mut word, &mut rows);

    // Trailing whitespace survives only when it still fits.
    if !trim {
        for g in pending_ws {
            let w = g.width();
            if row_width + w > max_width {
                break;
            }
            row.push(g);
            row_width += w;
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }
    rows
}

/// Number of rows `text` occupies at `max_width`, wrapped or not.
pub fn line_count(text: &Text, max_width: u16, wrap: Option<bool>) -> usize {
    match wrap {
        None => text.height(),
        Some(trim) => text
            .lines
            .iter()
            .map(|line| wrap_graphemes(line.styled_graphemes(), max_width as usize, trim).len())
            .sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_as_strings(rows: &[Vec<StyledGrapheme<'_>>]) -> Vec<String> {
        rows.iter()
            .map(|r| r.iter().map(|g| g.symbol).collect())
            .collect()
    }

    #[test]
    fn test_width_ascii_cjk_emoji() {
        assert_eq!(width("Hello"), 5);
        assert_eq!(width("你好"), 4);
        assert_eq!(width("Hello 👍"), 8);
        assert_eq!(width(""), 0);
    }

    #[test]
    fn test_width_combining_mark() {
        assert_eq!(width("e\u{301}"), 1);
        assert_eq!(grapheme_count("e\u{301}"), 1);
    }

    #[test]
    fn test_truncate_respects_wide_graphemes() {
        assert_eq!(truncate("你好世界", 5), "你好");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn test_text_raw_splits_lines() {
        let t = Text::raw("one\ntwo\nthree");
        assert_eq!(t.height(), 3);
        assert_eq!(t.width(), 5);
    }

    #[test]
    fn test_text_json_forms() {
        let t: Text = serde_json::from_str(r#""a\nbc""#).unwrap();
        assert_eq!(t.height(), 2);

        let t: Text = serde_json::from_str(
            r#"[["x", {"content": "y", "style": {"fg": "red"}}], "z"]"#,
        )
        .unwrap();
        assert_eq!(t.lines[0].spans.len(), 2);
        assert_eq!(t.lines[0].spans[1].style.fg, Some(crate::style::Color::Red));
        assert_eq!(t.lines[1].width(), 1);
    }

    #[test]
    fn test_wrap_words() {
        let line = Line::raw("the quick brown fox");
        let rows = wrap_graphemes(line.styled_graphemes(), 10, true);
        assert_eq!(rows_as_strings(&rows), vec!["the quick", "brown fox"]);
    }

    #[test]
    fn test_wrap_breaks_long_word() {
        let line = Line::raw("abcdefghij");
        let rows = wrap_graphemes(line.styled_graphemes(), 4, true);
        assert_eq!(rows_as_strings(&rows), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_trim_controls_leading_whitespace() {
        let line = Line::raw("  hi");
        let trimmed = wrap_graphemes(line.styled_graphemes(), 10, true);
        assert_eq!(rows_as_strings(&trimmed), vec!["hi"]);
        let kept = wrap_graphemes(line.styled_graphemes(), 10, false);
        assert_eq!(rows_as_strings(&kept), vec!["  hi"]);
    }

    #[test]
    fn test_wrap_empty_line_is_one_row() {
        let line = Line::raw("");
        assert_eq!(wrap_graphemes(line.styled_graphemes(), 5, true).len(), 1);
    }

    #[test]
    fn test_line_count_wrapped_and_unwrapped() {
        let text = Text::raw("hello world\nok");
        assert_eq!(line_count(&text, 5, None), 2);
        assert_eq!(line_count(&text, 5, Some(true)), 3);
    }

    #[test]
    fn test_alignment_offset() {
        assert_eq!(Alignment::Left.offset(4, 10), 0);
        assert_eq!(Alignment::Center.offset(4, 10), 3);
        assert_eq!(Alignment::Right.offset(4, 10), 6);
        assert_eq!(Alignment::Right.offset(12, 10), 0);
    }
}
