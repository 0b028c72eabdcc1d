//! Layout Module — one-dimensional constraint solving.
//!
//! Responsibilities:
//! - Resolve a list of sizing constraints against an available span
//! - Round fractional targets with the largest-remainder method
//! - Scale oversubscribed targets down proportionally
//! - Turn leftover space into fill growth (legacy) or flex gaps
//! - Produce rects in constraint order along the split axis

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Margin, Rect};

// ============================================================================
// Constraint model
// ============================================================================

/// A sizing rule for one slot of a split.
///
/// JSON form is externally tagged: `{"length": 5}`, `{"percentage": 50}`,
/// `{"ratio": [1, 3]}`, `{"min": 2}`, `{"max": 10}`, `{"fill": 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    Length(u16),
    Percentage(u16),
    Ratio(u32, u32),
    Min(u16),
    Max(u16),
    Fill(u16),
}

impl Default for Constraint {
    fn default() -> Self {
        Constraint::Fill(1)
    }
}

impl Constraint {
    /// Reject constraints that cannot describe a real size.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Constraint::Percentage(p) if p > 100 => Err(Error::InvalidConstraint(format!(
                "percentage {p} exceeds 100"
            ))),
            Constraint::Ratio(_, 0) => Err(Error::InvalidConstraint(
                "ratio denominator must be non-zero".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn from_lengths(lengths: impl IntoIterator<Item = u16>) -> Vec<Constraint> {
        lengths.into_iter().map(Constraint::Length).collect()
    }

    pub fn from_percentages(percentages: impl IntoIterator<Item = u16>) -> Vec<Constraint> {
        percentages.into_iter().map(Constraint::Percentage).collect()
    }

    pub fn from_fills(weights: impl IntoIterator<Item = u16>) -> Vec<Constraint> {
        weights.into_iter().map(Constraint::Fill).collect()
    }

    /// Ideal size before leftover distribution.
    fn target(&self, available: u16) -> f64 {
        let available = available as f64;
        match *self {
            Constraint::Length(n) | Constraint::Min(n) | Constraint::Max(n) => n as f64,
            Constraint::Percentage(p) => available * p.min(100) as f64 / 100.0,
            Constraint::Ratio(_, 0) => 0.0,
            Constraint::Ratio(n, d) => available * n as f64 / d as f64,
            Constraint::Fill(_) => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Horizontal,
    #[default]
    Vertical,
}

/// Policy for space left over once every constraint is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flex {
    #[default]
    Legacy,
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

// ============================================================================
// Layout builder
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub direction: Direction,
    pub constraints: Vec<Constraint>,
    pub flex: Flex,
    pub margin: Margin,
    pub spacing: u16,
}

impl Layout {
    pub fn new(direction: Direction, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            direction,
            constraints: constraints.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn vertical(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self::new(Direction::Vertical, constraints)
    }

    pub fn horizontal(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self::new(Direction::Horizontal, constraints)
    }

    pub fn flex(mut self, flex: Flex) -> Self {
        self.flex = flex;
        self
    }

    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    pub fn spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn split(&self, area: Rect) -> Vec<Rect> {
        let inner = area.inner(self.margin);
        split_with_spacing(
            inner,
            self.direction,
            &self.constraints,
            self.flex,
            self.spacing,
        )
    }
}

/// Partition `area` along `direction` according to `constraints`.
pub fn split(
    area: Rect,
    direction: Direction,
    constraints: &[Constraint],
    flex: Flex,
) -> Vec<Rect> {
    split_with_spacing(area, direction, constraints, flex, 0)
}

fn split_with_spacing(
    area: Rect,
    direction: Direction,
    constraints: &[Constraint],
    flex: Flex,
    spacing: u16,
) -> Vec<Rect> {
    if constraints.is_empty() {
        return Vec::new();
    }

    let span = match direction {
        Direction::Horizontal => area.width,
        Direction::Vertical => area.height,
    };
    let spacing_total = (spacing as u32 * (constraints.len() as u32 - 1)).min(span as u32) as u16;
    let available = span - spacing_total;

    let sizes = solve(constraints, available, flex);
    let used: u32 = sizes.iter().map(|&s| s as u32).sum();
    let leftover = (available as u32).saturating_sub(used) as u16;
    let gaps = flex_gaps(flex, sizes.len(), leftover);

    tracing::trace!(
        ?direction,
        ?flex,
        available,
        leftover,
        ?sizes,
        "layout split"
    );

    let origin = match direction {
        Direction::Horizontal => area.x,
        Direction::Vertical => area.y,
    };
    let mut pos = origin.saturating_add(gaps[0]);
    let mut rects = Vec::with_capacity(sizes.len());
    for (i, &size) in sizes.iter().enumerate() {
        rects.push(match direction {
            Direction::Horizontal => Rect::new(pos, area.y, size, area.height),
            Direction::Vertical => Rect::new(area.x, pos, area.width, size),
        });
        pos = pos.saturating_add(size).saturating_add(gaps[i + 1]);
        if i + 1 < sizes.len() {
            pos = pos.saturating_add(spacing);
        }
    }
    rects
}

// ============================================================================
// Solver
// ============================================================================

/// Resolve constraints to lengths whose sum never exceeds `available`.
pub fn solve(constraints: &[Constraint], available: u16, flex: Flex) -> Vec<u16> {
    let mut targets: Vec<f64> = constraints.iter().map(|c| c.target(available)).collect();
    let requested: f64 = targets.iter().sum();

    let total = if requested > available as f64 {
        let scale = available as f64 / requested;
        for t in targets.iter_mut() {
            *t *= scale;
        }
        available
    } else {
        (requested.round() as u32).min(available as u32) as u16
    };

    let mut sizes = largest_remainder(&targets, total);
    let used: u32 = sizes.iter().map(|&s| s as u32).sum();
    let leftover = (available as u32).saturating_sub(used) as u16;

    if flex == Flex::Legacy && leftover > 0 {
        grow_legacy(constraints, &mut sizes, leftover);
    }
    sizes
}

/// Round `targets` so that the integers sum to `total`. Fractional parts
/// decide who gets the extra cells; ties resolve left to right.
fn largest_remainder(targets: &[f64], total: u16) -> Vec<u16> {
    let mut sizes: Vec<u16> = targets
        .iter()
        .map(|t| t.max(0.0).floor().min(u16::MAX as f64) as u16)
        .collect();
    let floor_sum: u32 = sizes.iter().map(|&s| s as u32).sum();
    let mut extra = (total as u32).saturating_sub(floor_sum);
    if extra == 0 || sizes.is_empty() {
        return sizes;
    }

    let mut order: Vec<usize> = (0..targets.len()).collect();
    // Stable sort keeps left-to-right order among equal remainders.
    order.sort_by(|&a, &b| {
        let ra = targets[a] - targets[a].floor();
        let rb = targets[b] - targets[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
    while extra > 0 {
        for &i in &order {
            if extra == 0 {
                break;
            }
            sizes[i] = sizes[i].saturating_add(1);
            extra -= 1;
        }
    }
    sizes
}

fn grow_legacy(constraints: &[Constraint], sizes: &mut [u16], leftover: u16) {
    let fills: Vec<(usize, u16)> = constraints
        .iter()
        .enumerate()
        .filter_map(|(i, c)| match c {
            Constraint::Fill(w) => Some((i, *w)),
            _ => None,
        })
        .collect();

    if !fills.is_empty() {
        let weight_total: u32 = fills.iter().map(|&(_, w)| w as u32).sum();
        let mut given = 0u32;
        for &(i, w) in &fills {
            let share = if weight_total == 0 {
                leftover as u32 / fills.len() as u32
            } else {
                leftover as u32 * w as u32 / weight_total
            };
            sizes[i] = sizes[i].saturating_add(share as u16);
            given += share;
        }
        let first = fills[0].0;
        sizes[first] = sizes[first].saturating_add((leftover as u32 - given) as u16);
        return;
    }

    let mins: Vec<usize> = constraints
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, Constraint::Min(_)))
        .map(|(i, _)| i)
        .collect();
    if !mins.is_empty() {
        let share = leftover / mins.len() as u16;
        let rem = leftover % mins.len() as u16;
        for &i in &mins {
            sizes[i] = sizes[i].saturating_add(share);
        }
        sizes[mins[0]] = sizes[mins[0]].saturating_add(rem);
        return;
    }

    if let Some(last) = constraints
        .iter()
        .rposition(|c| !matches!(c, Constraint::Max(_)))
    {
        sizes[last] = sizes[last].saturating_add(leftover);
    }
}

/// Gap before each element plus the trailing gap: `count + 1` entries.
fn flex_gaps(flex: Flex, count: usize, leftover: u16) -> Vec<u16> {
    let mut gaps = vec![0u16; count + 1];
    if leftover == 0 || count == 0 {
        return gaps;
    }

    match flex {
        Flex::Legacy | Flex::Start => gaps[count] = leftover,
        Flex::End => gaps[0] = leftover,
        Flex::Center => {
            gaps[0] = leftover / 2;
            gaps[count] = leftover - leftover / 2;
        }
        Flex::SpaceBetween => {
            if count == 1 {
                gaps[1] = leftover;
            } else {
                spread(&mut gaps[1..count], leftover);
            }
        }
        Flex::SpaceAround => {
            // Edges get one unit, interior gaps two.
            let units = 2 * count as u32;
            let unit = leftover as u32 / units;
            gaps[0] = unit as u16;
            gaps[count] = unit as u16;
            for gap in gaps.iter_mut().take(count).skip(1) {
                *gap = (unit * 2) as u16;
            }
            let mut rem = leftover as u32 - unit * units;
            let mut i = 0;
            while rem > 0 {
                gaps[i % (count + 1)] += 1;
                rem -= 1;
                i += 1;
            }
        }
        Flex::SpaceEvenly => spread(&mut gaps, leftover),
    }
    gaps
}

fn spread(slots: &mut [u16], amount: u16) {
    let n = slots.len() as u16;
    let base = amount / n;
    let rem = amount % n;
    for (i, slot) in slots.iter_mut().enumerate() {
        *slot = base + u16::from((i as u16) < rem);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn widths(rects: &[Rect]) -> Vec<u16> {
        rects.iter().map(|r| r.width).collect()
    }

    #[test]
    fn test_two_halves_horizontal() {
        let rects = split(
            Rect::new(0, 0, 20, 5),
            Direction::Horizontal,
            &[Constraint::Percentage(50), Constraint::Percentage(50)],
            Flex::Legacy,
        );
        assert_eq!(rects, vec![Rect::new(0, 0, 10, 5), Rect::new(10, 0, 10, 5)]);
    }

    #[test]
    fn test_empty_constraints() {
        assert!(split(Rect::new(0, 0, 10, 10), Direction::Vertical, &[], Flex::Legacy).is_empty());
    }

    #[test]
    fn test_zero_length_axis_yields_empty_rects() {
        let rects = split(
            Rect::new(3, 4, 0, 10),
            Direction::Horizontal,
            &[Constraint::Length(5), Constraint::Fill(1)],
            Flex::Legacy,
        );
        assert_eq!(rects.len(), 2);
        assert!(rects.iter().all(|r| r.width == 0 && r.x == 3));
    }

    #[test]
    fn test_largest_remainder_thirds() {
        let sizes = solve(
            &[
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ],
            10,
            Flex::Legacy,
        );
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn test_fill_weights() {
        let sizes = solve(
            &[Constraint::Length(4), Constraint::Fill(1), Constraint::Fill(3)],
            20,
            Flex::Legacy,
        );
        assert_eq!(sizes, vec![4, 4, 12]);
    }

    #[test]
    fn test_fill_remainder_goes_to_first_fill() {
        let sizes = solve(&[Constraint::Fill(1), Constraint::Fill(1)], 7, Flex::Legacy);
        assert_eq!(sizes, vec![4, 3]);
    }

    #[test]
    fn test_oversubscribed_scales_down() {
        let sizes = solve(&[Constraint::Length(30), Constraint::Length(10)], 20, Flex::Legacy);
        assert_eq!(sizes, vec![15, 5]);
        assert_eq!(sizes.iter().sum::<u16>(), 20);
    }

    #[test]
    fn test_min_grows_without_fill() {
        let sizes = solve(&[Constraint::Length(3), Constraint::Min(2)], 10, Flex::Legacy);
        assert_eq!(sizes, vec![3, 7]);
    }

    #[test]
    fn test_max_never_grows() {
        let sizes = solve(&[Constraint::Max(4), Constraint::Max(4)], 20, Flex::Legacy);
        assert_eq!(sizes, vec![4, 4]);
    }

    #[test]
    fn test_legacy_last_absorbs_leftover() {
        let sizes = solve(&[Constraint::Length(2), Constraint::Length(3)], 10, Flex::Legacy);
        assert_eq!(sizes, vec![2, 8]);
    }

    #[test]
    fn test_flex_start_leaves_trailing_space() {
        let rects = split(
            Rect::new(0, 0, 10, 1),
            Direction::Horizontal,
            &[Constraint::Length(2), Constraint::Length(2)],
            Flex::Start,
        );
        assert_eq!(rects[0].x, 0);
        assert_eq!(rects[1].x, 2);
    }

    #[test]
    fn test_flex_end_and_center() {
        let c = [Constraint::Length(2), Constraint::Length(2)];
        let area = Rect::new(0, 0, 10, 1);
        let end = split(area, Direction::Horizontal, &c, Flex::End);
        assert_eq!((end[0].x, end[1].x), (6, 8));
        let center = split(area, Direction::Horizontal, &c, Flex::Center);
        assert_eq!((center[0].x, center[1].x), (3, 5));
    }

    #[test]
    fn test_flex_space_between() {
        let rects = split(
            Rect::new(0, 0, 10, 1),
            Direction::Horizontal,
            &[Constraint::Length(2), Constraint::Length(2), Constraint::Length(2)],
            Flex::SpaceBetween,
        );
        assert_eq!(rects.iter().map(|r| r.x).collect::<Vec<_>>(), vec![0, 4, 8]);
    }

    #[test]
    fn test_flex_space_evenly() {
        let rects = split(
            Rect::new(0, 0, 10, 1),
            Direction::Horizontal,
            &[Constraint::Length(2), Constraint::Length(2)],
            Flex::SpaceEvenly,
        );
        // 6 cells of slack over 3 gaps.
        assert_eq!(rects.iter().map(|r| r.x).collect::<Vec<_>>(), vec![2, 6]);
    }

    #[test]
    fn test_flex_space_around() {
        let rects = split(
            Rect::new(0, 0, 12, 1),
            Direction::Horizontal,
            &[Constraint::Length(2), Constraint::Length(2)],
            Flex::SpaceAround,
        );
        // 8 slack: edges 2, middle 4.
        assert_eq!(rects.iter().map(|r| r.x).collect::<Vec<_>>(), vec![2, 8]);
    }

    #[test]
    fn test_non_legacy_does_not_grow_fill() {
        let sizes = solve(&[Constraint::Length(2), Constraint::Fill(1)], 10, Flex::Center);
        assert_eq!(sizes, vec![2, 0]);
    }

    #[test]
    fn test_layout_builder_margin_and_spacing() {
        let rects = Layout::vertical([Constraint::Fill(1), Constraint::Fill(1)])
            .margin(Margin::new(1, 1))
            .spacing(1)
            .split(Rect::new(0, 0, 10, 12));
        assert_eq!(rects[0], Rect::new(1, 1, 8, 5));
        assert_eq!(rects[1], Rect::new(1, 7, 8, 4));
    }

    #[test]
    fn test_constraint_json_forms() {
        let c: Vec<Constraint> =
            serde_json::from_str(r#"[{"length":5},{"ratio":[1,3]},{"fill":2},{"percentage":40}]"#)
                .unwrap();
        assert_eq!(
            c,
            vec![
                Constraint::Length(5),
                Constraint::Ratio(1, 3),
                Constraint::Fill(2),
                Constraint::Percentage(40)
            ]
        );
    }

    #[test]
    fn test_validate_rejects_bad_constraints() {
        assert!(Constraint::Ratio(1, 0).validate().is_err());
        assert!(Constraint::Percentage(101).validate().is_err());
        assert!(Constraint::Percentage(100).validate().is_ok());
    }

    #[test]
    fn test_vertical_rects_full_width() {
        let rects = split(
            Rect::new(2, 1, 8, 6),
            Direction::Vertical,
            &[Constraint::Length(1), Constraint::Min(0)],
            Flex::Legacy,
        );
        assert_eq!(widths(&rects), vec![8, 8]);
        assert_eq!(rects[1], Rect::new(2, 2, 8, 5));
    }

    fn constraint_strategy() -> impl Strategy<Value = Constraint> {
        prop_oneof![
            (0u16..50).prop_map(Constraint::Length),
            (0u16..=100).prop_map(Constraint::Percentage),
            (0u32..5, 1u32..5).prop_map(|(n, d)| Constraint::Ratio(n, d)),
            (0u16..30).prop_map(Constraint::Min),
            (0u16..30).prop_map(Constraint::Max),
            (0u16..4).prop_map(Constraint::Fill),
        ]
    }

    fn flex_strategy() -> impl Strategy<Value = Flex> {
        prop_oneof![
            Just(Flex::Legacy),
            Just(Flex::Start),
            Just(Flex::Center),
            Just(Flex::End),
            Just(Flex::SpaceBetween),
            Just(Flex::SpaceAround),
            Just(Flex::SpaceEvenly),
        ]
    }

    proptest! {
        #[test]
        fn prop_rects_stay_inside_and_ordered(
            constraints in prop::collection::vec(constraint_strategy(), 1..8),
            width in 0u16..200,
            flex in flex_strategy(),
        ) {
            let area = Rect::new(5, 0, width, 3);
            let rects = split(area, Direction::Horizontal, &constraints, flex);
            prop_assert_eq!(rects.len(), constraints.len());
            let mut prev_end = area.x;
            for r in &rects {
                prop_assert!(r.x >= prev_end);
                prop_assert!(r.right() <= area.right());
                prop_assert_eq!(r.height, 3);
                prev_end = r.right();
            }
        }

        #[test]
        fn prop_legacy_covers_area_when_not_all_max(
            constraints in prop::collection::vec(constraint_strategy(), 1..8),
            width in 0u16..200,
        ) {
            prop_assume!(constraints.iter().any(|c| !matches!(c, Constraint::Max(_))));
            let sizes = solve(&constraints, width, Flex::Legacy);
            prop_assert_eq!(sizes.iter().map(|&s| s as u32).sum::<u32>(), width as u32);
        }

        #[test]
        fn prop_total_never_exceeds_available(
            constraints in prop::collection::vec(constraint_strategy(), 0..8),
            width in 0u16..200,
            flex in flex_strategy(),
        ) {
            let sizes = solve(&constraints, width, flex);
            prop_assert!(sizes.iter().map(|&s| s as u32).sum::<u32>() <= width as u32);
        }
    }
}
