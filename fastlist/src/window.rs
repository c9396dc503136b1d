use alloc::string::String;
use alloc::vec::Vec;
use core::cmp;

use crate::{Geometry, IndexRange, SectionLayout, Window};

/// Computes the critical and prerender windows for the current geometry.
///
/// The prerender margin (`max_item_count - critical_len`) is split asymmetrically:
/// `switch_window` slots behind the direction of travel, the remainder ahead of it.
///
/// Returns `None` for an empty list.
pub fn compute_window(layout: &SectionLayout, geo: &Geometry) -> Option<Window> {
    let last = layout.last_index()?;
    let top = geo.top_position;
    let c_start = layout.index_at_position(top);
    let c_end = layout
        .index_at_position(top.saturating_add(geo.viewport_height as u64))
        .max(c_start);
    let critical = IndexRange::new(c_start, c_end);

    let can_prerender = geo.max_item_count.saturating_sub(critical.count());
    let behind = cmp::min(geo.switch_window, can_prerender);
    let ahead = can_prerender - behind;

    let (before, after) = if geo.forward {
        (behind, ahead)
    } else {
        (ahead, behind)
    };
    let start = c_start.saturating_sub(before);
    let end = cmp::min(last, c_end.saturating_add(after));

    Some(Window {
        critical,
        prerender: IndexRange::new(start, end),
    })
}

/// The very first full render mounts a whole budget's worth of items from the window start.
pub fn initial_range(window: &Window, geo: &Geometry, last: usize) -> IndexRange {
    let start = window.prerender.first;
    let budget = geo.max_item_count.max(1);
    let end = cmp::min(last, start.saturating_add(budget).saturating_sub(1));
    IndexRange::new(start, end.max(window.prerender.last.min(last)))
}

/// Index where new demand appears: the end of the range when moving forward, the start
/// otherwise.
pub fn leading_edge(range: &IndexRange, forward: bool) -> usize {
    if forward { range.last } else { range.first }
}

/// Orders mounted indexes outside `keep` for reuse.
///
/// The returned stack is sorted by distance to `edge`, ascending, so that `pop()` hands out
/// the element furthest from where new items are needed (the ones scrolled past) first.
/// Equal distances pop the higher index first.
pub fn recyclable(
    mounted: impl IntoIterator<Item = usize>,
    keep: &IndexRange,
    edge: usize,
) -> Vec<usize> {
    let mut out: Vec<usize> = mounted
        .into_iter()
        .filter(|&i| !keep.contains(i))
        .collect();
    out.sort_unstable_by_key(|&i| (i.abs_diff(edge), i));
    out
}

/// ASCII rendering of the pool against the windows, for trace logs.
///
/// `[v]` / `[^]` marks the direction, `|` the prerender bounds, `[` `]` the critical bounds,
/// `x` a mounted index and `-` a hole.
pub fn viewport_diagram(
    is_mounted: impl Fn(usize) -> bool,
    upto: usize,
    forward: bool,
    window: &Window,
) -> String {
    let mut s = String::from(if forward { "[v]" } else { "[^]" });
    for i in 0..upto {
        if i == window.prerender.first {
            s.push('|');
        }
        if i == window.critical.first {
            s.push('[');
        }
        s.push(if is_mounted(i) { 'x' } else { '-' });
        if i == window.critical.last {
            s.push(']');
        }
        if i == window.prerender.last {
            s.push('|');
        }
    }
    s
}
