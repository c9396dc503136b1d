use alloc::vec::Vec;

use crate::ScrollDirection;

/// Maps scroll offsets to logical indexes and back.
///
/// The layout is a snapshot of the data source's shape: one span per section (in display
/// order), every section preceded by a header of `header_height`, every item `item_height`
/// tall. An unsectioned list is a single span without header.
///
/// An item at index `i` occupies `[position_for_index(i), position_for_index(i) + item_height)`;
/// a header belongs to the first item of its section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionLayout {
    item_height: u32,
    header_height: u32,
    spans: Vec<usize>,
    len: usize,
}

impl SectionLayout {
    /// A list without sections.
    pub fn flat(len: usize, item_height: u32) -> Self {
        Self {
            item_height,
            header_height: 0,
            spans: if len == 0 {
                Vec::new()
            } else {
                alloc::vec![len]
            },
            len,
        }
    }

    /// A sectioned list; `spans` holds the item count of each section in display order.
    pub fn sectioned(
        spans: impl IntoIterator<Item = usize>,
        item_height: u32,
        header_height: u32,
    ) -> Self {
        let spans: Vec<usize> = spans.into_iter().collect();
        debug_assert!(
            spans.iter().all(|&n| n > 0),
            "SectionLayout: data source emitted an empty section"
        );
        let len = spans.iter().sum();
        Self {
            item_height,
            header_height,
            spans,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    pub fn header_height(&self) -> u32 {
        self.header_height
    }

    pub fn section_count(&self) -> usize {
        self.spans.len()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    /// Number of items in the section at `ordinal`.
    pub fn section_len(&self, ordinal: usize) -> usize {
        self.spans.get(ordinal).copied().unwrap_or(0)
    }

    /// Height of the items of a section, header excluded.
    pub fn section_extent(&self, ordinal: usize) -> u64 {
        self.section_len(ordinal) as u64 * self.item_height as u64
    }

    /// Height of a section, header included.
    pub fn section_height(&self, ordinal: usize) -> u64 {
        if ordinal >= self.spans.len() {
            return 0;
        }
        self.header_height as u64 + self.section_extent(ordinal)
    }

    /// Offset of a section's header.
    pub fn section_top(&self, ordinal: usize) -> u64 {
        (0..ordinal.min(self.spans.len()))
            .map(|o| self.section_height(o))
            .sum()
    }

    /// Ordinal of the section owning `index`.
    pub fn section_of(&self, index: usize) -> Option<usize> {
        let mut base = 0usize;
        for (ordinal, &span) in self.spans.iter().enumerate() {
            if index < base + span {
                return Some(ordinal);
            }
            base += span;
        }
        None
    }

    /// First logical index of the section at `ordinal`.
    pub fn section_start(&self, ordinal: usize) -> usize {
        self.spans[..ordinal.min(self.spans.len())].iter().sum()
    }

    pub fn full_height(&self) -> u64 {
        let headers = self.spans.len() as u64 * self.header_height as u64;
        headers + self.len as u64 * self.item_height as u64
    }

    /// Returns the index of the item occupying `pos`.
    ///
    /// Offsets past the end clamp to the last index; an empty list yields 0.
    pub fn index_at_position(&self, pos: u64) -> usize {
        let Some(last) = self.last_index() else {
            return 0;
        };
        let header = self.header_height as u64;
        let item = self.item_height as u64;

        let mut pos = pos;
        let mut base = 0usize;
        for &span in &self.spans {
            if pos < header {
                return base;
            }
            pos -= header;

            let extent = span as u64 * item;
            if pos < extent {
                // `extent > 0` implies `item > 0`.
                let within = (pos / item) as usize;
                return base + within.min(span - 1);
            }
            pos -= extent;
            base += span;
        }
        last
    }

    /// Offset of the item at `index`; the inverse of [`Self::index_at_position`].
    ///
    /// Indexes past the end map to the end of the content.
    pub fn position_for_index(&self, index: usize) -> u64 {
        let header = self.header_height as u64;
        let item = self.item_height as u64;

        let mut top = 0u64;
        let mut index = index;
        for &span in &self.spans {
            top += header;
            if index < span {
                return top + index as u64 * item;
            }
            index -= span;
            top += span as u64 * item;
        }
        top
    }
}

/// Viewport and budget state, updated by the controller on every scroll/resize tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub top_position: u64,
    /// Direction of the last scroll movement.
    pub forward: bool,
    pub viewport_height: u32,
    pub item_height: u32,
    pub header_height: u32,
    /// Prerender budget: the pool never holds more elements than this.
    pub max_item_count: usize,
    /// Slots kept behind the direction of travel.
    pub switch_window: usize,
}

impl Geometry {
    pub fn new(item_height: u32, header_height: u32) -> Self {
        Self {
            forward: true,
            item_height,
            header_height,
            ..Self::default()
        }
    }

    pub fn direction(&self) -> ScrollDirection {
        if self.forward {
            ScrollDirection::Forward
        } else {
            ScrollDirection::Backward
        }
    }

    pub fn items_per_screen(&self) -> f32 {
        if self.item_height == 0 {
            return 0.0;
        }
        self.viewport_height as f32 / self.item_height as f32
    }

    /// Recomputes the prerender budget after the viewport changed.
    pub fn update_container(&mut self, viewport_height: u32, multiplier: f32, divisor: u32) {
        self.viewport_height = viewport_height;
        let per_screen = self.items_per_screen();
        // One viewport plus a partially visible item on each edge is the floor.
        let whole = per_screen as usize;
        let floor = whole + usize::from((whole as f32) < per_screen) + 1;
        self.max_item_count = floor_lenient(per_screen * multiplier).max(floor);
        self.switch_window =
            floor_lenient(per_screen / divisor.max(1) as f32).min(self.max_item_count);
        fldebug!(
            viewport_height,
            max_item_count = self.max_item_count,
            switch_window = self.switch_window,
            "update_container"
        );
    }
}

// `7.5 * 2.8` must floor to 21, not 20.
fn floor_lenient(v: f32) -> usize {
    (v + 1e-4).max(0.0) as usize
}
