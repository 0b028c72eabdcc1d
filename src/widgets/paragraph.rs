//! Paragraph: styled text with optional word wrapping and scrolling.

use serde::{Deserialize, Deserializer, Serialize};

use super::block::{self, Block};
use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::style::Style;
use crate::text::{self, Alignment, StyledGrapheme, Text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wrap {
    /// Drop leading whitespace of each source line.
    pub trim: bool,
}

/// `wrap` accepts `true`/`false`, `null`, or `{"trim": bool}`.
fn deserialize_wrap<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Wrap>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Flag(bool),
        Options(Wrap),
    }
    Ok(match Option::<Repr>::deserialize(d)? {
        None | Some(Repr::Flag(false)) => None,
        Some(Repr::Flag(true)) => Some(Wrap { trim: true }),
        Some(Repr::Options(wrap)) => Some(wrap),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub text: Text,
    pub style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
    #[serde(deserialize_with = "deserialize_wrap")]
    pub wrap: Option<Wrap>,
    pub alignment: Alignment,
    /// `(y, x)` offset into the text.
    pub scroll: (u16, u16),
}

impl Paragraph {
    pub fn new(text: impl Into<Text>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    pub fn wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = Some(wrap);
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn scroll(mut self, offset: (u16, u16)) -> Self {
        self.scroll = offset;
        self
    }

    /// Rows the paragraph needs at `width`, including block borders.
    pub fn line_count(&self, width: u16) -> usize {
        if width < 1 {
            return 0;
        }
        let (inner_width, extra_rows) = match &self.block {
            Some(block) => {
                let probe = Rect::new(0, 0, width, u16::MAX);
                let inner = block.inner(probe);
                (inner.width, (probe.height - inner.height) as usize)
            }
            None => (width, 0),
        };
        let rows = match self.wrap {
            Some(Wrap { trim }) => text::line_count(&self.text, inner_width, Some(trim)),
            None => self.text.height(),
        };
        rows + extra_rows
    }

    /// Width of the widest line, including block borders.
    pub fn line_width(&self) -> usize {
        let extra = self.block.as_ref().map_or(0, |block| {
            let probe = Rect::new(0, 0, u16::MAX, 1);
            (probe.width - block.inner(probe).width) as usize
        });
        self.text.width() + extra
    }

    /// Rows after wrapping or truncation, each with its alignment.
    fn rows<'a>(&'a self, width: u16) -> Vec<(Vec<StyledGrapheme<'a>>, Alignment)> {
        let text_style = self.text.style;
        let mut rows = Vec::new();
        for line in &self.text.lines {
            let alignment = line
                .alignment
                .or(self.text.alignment)
                .unwrap_or(self.alignment);
            let graphemes = line.styled_graphemes().map(move |g| StyledGrapheme {
                symbol: g.symbol,
                style: text_style.patch(g.style),
            });
            match self.wrap {
                Some(Wrap { trim }) => {
                    for row in text::wrap_graphemes(graphemes, width as usize, trim) {
                        rows.push((row, alignment));
                    }
                }
                None => rows.push((skip_columns(graphemes, self.scroll.1), alignment)),
            }
        }
        rows
    }
}

/// Drop graphemes covering the first `columns` cells.
fn skip_columns<'a>(
    graphemes: impl Iterator<Item = StyledGrapheme<'a>>,
    columns: u16,
) -> Vec<StyledGrapheme<'a>> {
    let mut skipped = 0usize;
    graphemes
        .skip_while(|g| {
            if skipped >= columns as usize {
                return false;
            }
            skipped += g.width();
            true
        })
        .collect()
}

impl Widget for Paragraph {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.style);
        let inner = block::render_optional(self.block.as_ref(), area, buf);
        if inner.is_empty() {
            return;
        }

        let rows = self.rows(inner.width);
        let visible = rows
            .into_iter()
            .skip(self.scroll.0 as usize)
            .take(inner.height as usize);
        for (dy, (row, alignment)) in visible.enumerate() {
            let y = inner.y + dy as u16;
            let row_width: usize = row.iter().map(StyledGrapheme::width).sum();
            let offset = alignment.offset(row_width.min(u16::MAX as usize) as u16, inner.width);
            let mut x = inner.x + offset;
            for g in row {
                if x >= inner.right() {
                    break;
                }
                let (next, _) =
                    buf.set_stringn(x, y, g.symbol, (inner.right() - x) as usize, g.style);
                if next == x && g.width() > 0 {
                    break;
                }
                x = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    fn rendered(p: &Paragraph, w: u16, h: u16) -> Vec<String> {
        let mut buf = Buffer::empty(Rect::new(0, 0, w, h));
        p.render(buf.area(), &mut buf);
        buf.content_lines()
    }

    #[test]
    fn test_plain_text_truncates() {
        let p = Paragraph::new("hello world\nsecond");
        assert_eq!(rendered(&p, 5, 3), vec!["hello", "secon", "     "]);
    }

    #[test]
    fn test_wrap_and_alignment() {
        let p = Paragraph::new("the quick brown fox")
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Right);
        assert_eq!(
            rendered(&p, 10, 2),
            vec![" the quick", " brown fox"]
        );
    }

    #[test]
    fn test_center_alignment() {
        let p = Paragraph::new("ab").alignment(Alignment::Center);
        assert_eq!(rendered(&p, 6, 1), vec!["  ab  "]);
    }

    #[test]
    fn test_scroll_offsets() {
        let p = Paragraph::new("one\ntwo\nthree").scroll((1, 1));
        assert_eq!(rendered(&p, 4, 2), vec!["wo  ", "hree"]);
    }

    #[test]
    fn test_block_and_style() {
        let p = Paragraph::new("hi")
            .block(Block::bordered())
            .style(Style::new().fg(Color::Red));
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 3));
        p.render(buf.area(), &mut buf);
        assert_eq!(buf.content_lines(), vec!["┌──┐", "│hi│", "└──┘"]);
        assert_eq!(buf.cell(1, 1).unwrap().fg, Color::Red);
    }

    #[test]
    fn test_wide_glyph_wrapping() {
        let p = Paragraph::new("你好世界").wrap(Wrap { trim: true });
        assert_eq!(rendered(&p, 5, 2), vec!["你好 ", "世界 "]);
    }

    #[test]
    fn test_line_count_and_width() {
        let p = Paragraph::new("hello world\nok").wrap(Wrap { trim: true });
        assert_eq!(p.line_count(5), 3);
        assert_eq!(p.clone().block(Block::bordered()).line_count(7), 5);
        assert_eq!(p.line_width(), 11);
        assert_eq!(Paragraph::new("abc").line_count(0), 0);
    }

    #[test]
    fn test_wrap_json_forms() {
        let p: Paragraph = serde_json::from_str(r#"{"text": "a", "wrap": true}"#).unwrap();
        assert_eq!(p.wrap, Some(Wrap { trim: true }));
        let p: Paragraph =
            serde_json::from_str(r#"{"text": "a", "wrap": {"trim": false}}"#).unwrap();
        assert_eq!(p.wrap, Some(Wrap { trim: false }));
        let p: Paragraph = serde_json::from_str(r#"{"text": "a"}"#).unwrap();
        assert_eq!(p.wrap, None);
    }
}
