//! Scroll Module — viewport selection for scrolling item widgets.
//!
//! Responsibilities:
//! - Clamp a stored offset to the item count
//! - Move the viewport the least amount that keeps the selection, plus
//!   `scroll_padding` neighbours where they fit, on screen
//! - Report the visible item range so List and Table can write the
//!   resulting offset back to their state

/// Visible `first..last` item range for items of the given heights.
///
/// `offset` is the first item shown last frame. The returned `first` is the
/// offset to persist.
pub(crate) fn visible_bounds(
    heights: &[u16],
    selected: Option<usize>,
    offset: usize,
    max_height: u16,
    scroll_padding: usize,
) -> (usize, usize) {
    if heights.is_empty() {
        return (0, 0);
    }
    let max_height = max_height as usize;
    let height = |i: usize| heights[i] as usize;

    let offset = offset.min(heights.len() - 1);
    let mut first = offset;
    let mut last = offset;
    let mut used = 0usize;
    for i in offset..heights.len() {
        if used + height(i) > max_height {
            break;
        }
        used += height(i);
        last += 1;
    }

    let target = padded_target(heights, selected, max_height, scroll_padding, first, last)
        .unwrap_or(offset);

    while target >= last {
        used += height(last);
        last += 1;
        while used > max_height {
            used -= height(first);
            first += 1;
        }
    }
    while target < first {
        first -= 1;
        used += height(first);
        while used > max_height {
            last -= 1;
            used -= height(last);
        }
    }
    if first == last {
        // The target alone is taller than the viewport; show its top part.
        return (target, target + 1);
    }
    (first, last)
}

/// The item that must become visible: the selection, pushed outwards by as
/// much padding as fits in the viewport.
fn padded_target(
    heights: &[u16],
    selected: Option<usize>,
    max_height: usize,
    scroll_padding: usize,
    first: usize,
    last: usize,
) -> Option<usize> {
    let last_valid = heights.len() - 1;
    let selected = selected?.min(last_valid);

    let mut padding = scroll_padding;
    while padding > 0 {
        let lo = selected.saturating_sub(padding);
        let hi = selected.saturating_add(padding).min(last_valid);
        let around: usize = heights[lo..=hi].iter().map(|&h| h as usize).sum();
        if around <= max_height {
            break;
        }
        padding -= 1;
    }

    let target = if selected.saturating_add(padding).min(last_valid) >= last {
        selected.saturating_add(padding)
    } else if selected.saturating_sub(padding) < first {
        selected.saturating_sub(padding)
    } else {
        selected
    };
    Some(target.min(last_valid))
}
