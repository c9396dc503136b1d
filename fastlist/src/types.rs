use crate::tween::Easing;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// An inclusive range of logical indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub first: usize,
    pub last: usize, // inclusive
}

impl IndexRange {
    pub fn new(first: usize, last: usize) -> Self {
        debug_assert!(first <= last, "IndexRange: first={first} > last={last}");
        Self { first, last }
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.first && index <= self.last
    }

    /// Number of indexes in the range (never zero).
    pub fn count(&self) -> usize {
        self.last - self.first + 1
    }
}

/// The indexes a render pass wants mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    /// Indexes exactly covering the viewport.
    pub critical: IndexRange,
    /// `critical` plus the look-ahead/behind margin, bounded by `max_item_count`.
    pub prerender: IndexRange,
}

/// Identifies a slot of the mounted item pool. Stable for the lifetime of the element it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotId(pub u32);

impl SlotId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Tag handed to [`crate::DataSource::populate_item`].
///
/// When population is deferred, the data source keeps the stamp and hands it back through
/// [`crate::FastList::complete_population`]. Stamps issued for an element that has since been
/// recycled for another index are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulateStamp {
    pub slot: SlotId,
    pub index: usize,
    pub generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Population {
    /// The element content is final.
    Ready,
    /// Content arrives later; the element shows placeholder content until then.
    Pending,
}

/// Something a completion event can be observed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Container,
    Item(SlotId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompletionEvent {
    TransitionEnd,
    AnimationEnd,
}

/// High-frequency event streams that are bound through the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    Scroll,
    PointerMove,
}

impl Channel {
    pub(crate) const COUNT: usize = 2;

    pub(crate) fn idx(self) -> usize {
        match self {
            Self::Scroll => 0,
            Self::PointerMove => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// What the pointer hit, as resolved by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerTarget {
    /// The drag handle of a mounted item.
    DragHandle(SlotId),
    /// Anywhere else on a mounted item.
    Item(SlotId),
    Container,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub target: PointerTarget,
    /// Page-space vertical coordinate.
    pub y: i64,
    /// Touch identifier; `None` for mouse input.
    pub id: Option<u64>,
    /// Number of active touches (0 for mouse input).
    pub touches: u8,
}

impl PointerEvent {
    pub fn mouse(kind: PointerKind, target: PointerTarget, y: i64) -> Self {
        Self {
            kind,
            target,
            y,
            id: None,
            touches: 0,
        }
    }

    pub fn touch(kind: PointerKind, target: PointerTarget, y: i64, id: u64) -> Self {
        Self {
            kind,
            target,
            y,
            id: Some(id),
            touches: 1,
        }
    }

    pub fn is_multi_touch(&self) -> bool {
        self.touches > 1
    }
}

/// Notifications for the host, drained with [`crate::FastList::drain_events`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListEvent {
    /// The critical window is visible.
    Rendered,
    /// The full prerender window is populated.
    Complete,
    /// Scroll position returned to exactly 0.
    TopReached,
    /// A click on an item outside of edit mode.
    ItemSelected { index: usize, pointer: PointerEvent },
    /// A record was inserted at the top while the top was scrolled out of view.
    HiddenNewContent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Activity {
    Scrolling,
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifecycle {
    Constructing,
    /// Phase 1 done: the critical window is mounted.
    InitialRender,
    /// Phase 2 done: the full prerender window is mounted.
    Prerendered,
    Steady(Activity),
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionProperty {
    Transform,
    Opacity,
}

/// An inline transition declared on an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub property: TransitionProperty,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Transition {
    pub fn transform(duration_ms: u64, easing: Easing) -> Self {
        Self {
            property: TransitionProperty::Transform,
            duration_ms,
            easing,
        }
    }

    pub fn opacity(duration_ms: u64, easing: Easing) -> Self {
        Self {
            property: TransitionProperty::Opacity,
            duration_ms,
            easing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayAnim {
    Reveal,
    Hide,
}

/// Visual state of a mounted item that the host mirrors onto its element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStyle {
    pub transition: Option<Transition>,
    /// Raised z-order plus drop shadow while dragged.
    pub elevated: bool,
    /// Edit mode affordances are shown.
    pub editing: bool,
    /// Newly inserted item, kept hidden until revealed.
    pub fresh: bool,
    pub overlay: Option<OverlayAnim>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    Visible,
    Hidden,
    Scroll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerStyle {
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    /// Height of the scrollable list, so the container can scroll natively.
    pub list_height: u64,
    /// A reorder or insert animation is running.
    pub reordering: bool,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self {
            overflow_x: Overflow::Visible,
            overflow_y: Overflow::Visible,
            list_height: 0,
            reordering: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum InsertOutcome {
    /// Visible items slide down, then the new item is revealed.
    Animated,
    /// Indexes shift without animation; the scroll offset keeps the same content in view.
    Silent,
    /// Only insertion at index 0 is supported.
    Unsupported,
}
