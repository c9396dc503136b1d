//! A headless virtualized list with element recycling.
//!
//! For drag-to-reorder, see the `fastlist-reorder` crate.
//!
//! The list keeps a bounded pool of item elements (about 2.8 viewports worth) and reassigns
//! them to logical indexes as the viewport moves, so rendering cost follows the viewport rather
//! than the record count. Work is split into phases by a [`Scheduler`]: state writes
//! (mutations), animated changes that wait for a completion event (transitions), and rate-limited
//! input channels (scroll, pointer move).
//!
//! It is UI-agnostic. The host is expected to provide:
//! - a [`DataSource`] that owns the records and creates/populates elements
//! - viewport height and scroll offset changes
//! - completion events (`transitionend` / `animationend`) and a clock
//!
//! and to mirror the exposed item offsets and styles onto its elements.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod extension;
mod geometry;
mod list;
mod options;
mod pool;
mod scheduler;
mod source;
mod tween;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use engine::SectionHeader;
pub use extension::{Extension, ExtensionId, ListContext};
pub use geometry::{Geometry, SectionLayout};
pub use list::FastList;
pub use options::FastListOptions;
pub use pool::{MountedItem, MountedPool};
pub use scheduler::{Scheduler, SchedulerMode, Ticket};
pub use source::{DataSource, layout_of};
pub use tween::{Easing, Tween};
pub use types::{
    Activity, Channel, CompletionEvent, ContainerStyle, IndexRange, InsertOutcome, ItemStyle,
    Lifecycle, ListEvent, Overflow, OverlayAnim, PointerEvent, PointerKind, PointerTarget,
    PopulateStamp, Population, ScrollDirection, SlotId, Target, Transition, TransitionProperty,
    Window,
};
pub use window::{compute_window, recyclable, viewport_diagram};
