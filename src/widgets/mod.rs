//! Widgets Module — the render tree.
//!
//! Responsibilities:
//! - `Widget` / `StatefulWidget`: paint into a buffer area
//! - `WidgetNode`: the JSON-tagged node enum a frame is described with
//! - `render_node`: recursive dispatch, layout splitting, state lookup

pub mod barchart;
pub mod block;
pub mod calendar;
pub mod canvas;
pub mod chart;
pub mod clear;
pub mod compose;
pub mod gauge;
pub mod list;
pub mod paragraph;
pub mod scrollbar;
pub mod sparkline;
pub mod table;
pub mod tabs;

use serde::{Deserialize, Serialize};

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::geometry::{Position, Rect};
use crate::state::{StateStore, WidgetState};

pub use barchart::{Bar, BarChart, BarGroup};
pub use block::{Block, Borders, Padding, Title, TitlePosition};
pub use calendar::Calendar;
pub use canvas::{Canvas, Shape};
pub use chart::{Axis, Chart, Dataset, GraphType};
pub use clear::Clear;
pub use compose::{Center, CursorNode, Draw, DrawCommand, Overlay, Split, Stateful};
pub use gauge::{Gauge, LineGauge};
pub use list::{HighlightSpacing, List, ListDirection, ListItem};
pub use paragraph::{Paragraph, Wrap};
pub use scrollbar::{Scrollbar, ScrollbarOrientation};
pub use sparkline::{RenderDirection, Sparkline};
pub use table::{Row, Table, TableCell};
pub use tabs::Tabs;

// ============================================================================
// Traits
// ============================================================================

/// Paints itself into `area` of `buf`. A no-op on an empty area.
pub trait Widget {
    fn render(&self, area: Rect, buf: &mut Buffer);
}

/// A widget whose rendering reads and updates application-owned state.
pub trait StatefulWidget {
    type State;

    fn render(&self, area: Rect, buf: &mut Buffer, state: &mut Self::State);
}

// ============================================================================
// Node enum
// ============================================================================

/// One node of a frame description. JSON is tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetNode {
    Block(Block),
    Paragraph(Paragraph),
    List(List),
    Table(Table),
    Tabs(Tabs),
    Gauge(Gauge),
    LineGauge(LineGauge),
    Sparkline(Sparkline),
    #[serde(alias = "barchart")]
    BarChart(BarChart),
    #[serde(alias = "line_chart")]
    Chart(Chart),
    Canvas(Canvas),
    Scrollbar(Scrollbar),
    Calendar(Calendar),
    Clear(Clear),
    Center(Center),
    Overlay(Overlay),
    Layout(Split),
    Cursor(CursorNode),
    Stateful(Stateful),
    Draw(Draw),
}

impl WidgetNode {
    pub fn name(&self) -> &'static str {
        match self {
            WidgetNode::Block(_) => "Block",
            WidgetNode::Paragraph(_) => "Paragraph",
            WidgetNode::List(_) => "List",
            WidgetNode::Table(_) => "Table",
            WidgetNode::Tabs(_) => "Tabs",
            WidgetNode::Gauge(_) => "Gauge",
            WidgetNode::LineGauge(_) => "LineGauge",
            WidgetNode::Sparkline(_) => "Sparkline",
            WidgetNode::BarChart(_) => "BarChart",
            WidgetNode::Chart(_) => "Chart",
            WidgetNode::Canvas(_) => "Canvas",
            WidgetNode::Scrollbar(_) => "Scrollbar",
            WidgetNode::Calendar(_) => "Calendar",
            WidgetNode::Clear(_) => "Clear",
            WidgetNode::Center(_) => "Center",
            WidgetNode::Overlay(_) => "Overlay",
            WidgetNode::Layout(_) => "Layout",
            WidgetNode::Cursor(_) => "Cursor",
            WidgetNode::Stateful(_) => "Stateful",
            WidgetNode::Draw(_) => "Draw",
        }
    }
}

macro_rules! impl_into_node {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for WidgetNode {
                fn from(widget: $ty) -> Self {
                    WidgetNode::$variant(widget)
                }
            }
        )*
    };
}

impl_into_node!(
    Block => Block,
    Paragraph => Paragraph,
    List => List,
    Table => Table,
    Tabs => Tabs,
    Gauge => Gauge,
    LineGauge => LineGauge,
    Sparkline => Sparkline,
    BarChart => BarChart,
    Chart => Chart,
    Canvas => Canvas,
    Scrollbar => Scrollbar,
    Calendar => Calendar,
    Clear => Clear,
    Center => Center,
    Overlay => Overlay,
    Split => Layout,
    CursorNode => Cursor,
    Stateful => Stateful,
    Draw => Draw,
);

// ============================================================================
// Dispatch
// ============================================================================

/// Render `node` and its descendants into `area`.
///
/// `cursor` receives the position of the last cursor node visited.
/// Stateful nodes resolve their handle in `states` and write scroll offsets
/// back into it.
pub fn render_node(
    node: &WidgetNode,
    area: Rect,
    buf: &mut Buffer,
    cursor: &mut Option<Position>,
    states: &mut StateStore,
) -> Result<()> {
    match node {
        WidgetNode::Block(w) => w.render(area, buf),
        WidgetNode::Paragraph(w) => w.render(area, buf),
        WidgetNode::List(w) => Widget::render(w, area, buf),
        WidgetNode::Table(w) => Widget::render(w, area, buf),
        WidgetNode::Tabs(w) => w.render(area, buf),
        WidgetNode::Gauge(w) => w.render(area, buf),
        WidgetNode::LineGauge(w) => w.render(area, buf),
        WidgetNode::Sparkline(w) => w.render(area, buf),
        WidgetNode::BarChart(w) => w.render(area, buf),
        WidgetNode::Chart(w) => w.render(area, buf),
        WidgetNode::Canvas(w) => w.render(area, buf),
        WidgetNode::Scrollbar(w) => Widget::render(w, area, buf),
        WidgetNode::Calendar(w) => w.render(area, buf),
        WidgetNode::Clear(w) => w.render(area, buf),
        WidgetNode::Draw(w) => w.render(area, buf),
        WidgetNode::Cursor(c) => *cursor = Some(Position::new(c.x, c.y)),
        WidgetNode::Center(center) => {
            let inner = center.area(area);
            Clear::default().render(inner, buf);
            render_node(&center.child, inner, buf, cursor, states)?;
        }
        WidgetNode::Overlay(overlay) => {
            for layer in &overlay.layers {
                render_node(layer, area, buf, cursor, states)?;
            }
        }
        WidgetNode::Layout(split) => {
            let areas = split.areas(area)?;
            for (child, child_area) in split.children.iter().zip(areas) {
                render_node(child, child_area, buf, cursor, states)?;
            }
        }
        WidgetNode::Stateful(stateful) => {
            let state = states.get_mut(stateful.state)?;
            match (stateful.widget.as_ref(), state) {
                (WidgetNode::List(w), WidgetState::List(s)) => {
                    StatefulWidget::render(w, area, buf, s)
                }
                (WidgetNode::Table(w), WidgetState::Table(s)) => {
                    StatefulWidget::render(w, area, buf, s)
                }
                (WidgetNode::Scrollbar(w), WidgetState::Scrollbar(s)) => {
                    StatefulWidget::render(w, area, buf, s)
                }
                (widget, state) => {
                    return Err(Error::UnsupportedState {
                        widget: widget.name(),
                        state: state.name(),
                    })
                }
            }
        }
    }
    Ok(())
}
