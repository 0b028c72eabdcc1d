//! Calendar: a Sunday-first monthly grid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::block::{self, Block};
use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::style::Style;
use crate::text::{Alignment, Line, Span};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS_HEADER: &str = " Su Mo Tu We Th Fr Sa";

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Day of week for a proleptic Gregorian date, 0 = Sunday.
fn weekday(year: i32, month: u8, day: u8) -> u8 {
    const OFFSETS: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let y = if month < 3 { year - 1 } else { year };
    let index = usize::from(month.clamp(1, 12) - 1);
    let days = y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
        + OFFSETS[index]
        + i32::from(day);
    days.rem_euclid(7) as u8
}

fn previous_month(year: i32, month: u8) -> (i32, u8) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn next_month(year: i32, month: u8) -> (i32, u8) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn date_key(year: i32, month: u8, day: u8) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calendar {
    pub year: i32,
    /// 1-based.
    pub month: u8,
    pub show_month_header: bool,
    pub show_weekdays_header: bool,
    pub header_style: Style,
    pub day_style: Style,
    /// Days of the neighbouring months are drawn in this style when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_surrounding: Option<Style>,
    /// Styles keyed by `YYYY-MM-DD`.
    pub events: BTreeMap<String, Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            show_month_header: true,
            show_weekdays_header: true,
            header_style: Style::default(),
            day_style: Style::default(),
            show_surrounding: None,
            events: BTreeMap::new(),
            block: None,
        }
    }
}

impl Calendar {
    pub fn new(year: i32, month: u8) -> Self {
        Self {
            year,
            month,
            ..Self::default()
        }
    }

    pub fn show_month_header(mut self, show: bool) -> Self {
        self.show_month_header = show;
        self
    }

    pub fn show_weekdays_header(mut self, show: bool) -> Self {
        self.show_weekdays_header = show;
        self
    }

    pub fn header_style(mut self, style: Style) -> Self {
        self.header_style = style;
        self
    }

    pub fn day_style(mut self, style: Style) -> Self {
        self.day_style = style;
        self
    }

    pub fn show_surrounding(mut self, style: Style) -> Self {
        self.show_surrounding = Some(style);
        self
    }

    pub fn event(mut self, year: i32, month: u8, day: u8, style: Style) -> Self {
        self.events.insert(date_key(year, month, day), style);
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    fn event_style(&self, year: i32, month: u8, day: u8) -> Style {
        self.events
            .get(&date_key(year, month, day))
            .copied()
            .unwrap_or_default()
    }

    fn day_span(&self, index: i32) -> Span {
        let days = i32::from(days_in_month(self.year, self.month));
        let (year, month, day, base) = if index < 1 {
            let (y, m) = previous_month(self.year, self.month);
            let Some(style) = self.show_surrounding else {
                return Span::raw("  ");
            };
            (y, m, (i32::from(days_in_month(y, m)) + index) as u8, style)
        } else if index > days {
            let (y, m) = next_month(self.year, self.month);
            let Some(style) = self.show_surrounding else {
                return Span::raw("  ");
            };
            (y, m, (index - days) as u8, style)
        } else {
            (self.year, self.month, index as u8, self.day_style)
        };
        Span::styled(
            format!("{day:>2}"),
            base.patch(self.event_style(year, month, day)),
        )
    }
}

impl Widget for Calendar {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        let mut inner = block::render_optional(self.block.as_ref(), area, buf);
        if inner.is_empty() || !(1..=12).contains(&self.month) {
            return;
        }

        if self.show_month_header {
            let name = MONTH_NAMES[usize::from(self.month - 1)];
            let header = Line::styled(format!("{name} {}", self.year), self.header_style);
            let offset = Alignment::Center.offset(header.width() as u16, inner.width);
            buf.set_line(inner.x + offset, inner.y, &header, inner.width - offset);
            inner.y += 1;
            inner.height -= 1;
        }
        if self.show_weekdays_header && inner.height > 0 {
            buf.set_stringn(
                inner.x,
                inner.y,
                WEEKDAYS_HEADER,
                inner.width as usize,
                self.header_style,
            );
            inner.y += 1;
            inner.height -= 1;
        }

        let first = i32::from(weekday(self.year, self.month, 1));
        let days = i32::from(days_in_month(self.year, self.month));
        let weeks = (first + days + 6) / 7;
        for week in 0..weeks.min(i32::from(inner.height)) {
            let mut spans = Vec::with_capacity(14);
            for column in 0..7 {
                spans.push(Span::raw(" "));
                spans.push(self.day_span(week * 7 + column - first + 1));
            }
            let line = Line::from(spans);
            buf.set_line(inner.x, inner.y + week as u16, &line, inner.width);
        }
    }
}
