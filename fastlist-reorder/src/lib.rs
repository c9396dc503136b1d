//! Drag-to-reorder for the `fastlist` crate.
//!
//! [`Reorder`] is a [`fastlist::Extension`]: install it with `list.plugin(Reorder::new())`. It
//! reacts to pointer presses on drag handles while the list is in edit mode, moves items through
//! their transient offsets (`MountedItem::tweak`) while the gesture runs, and commits the new
//! order through the data source once every displaced item settled.
//!
//! The swap computation is exposed separately ([`compute_changes`]) for hosts that want to draw
//! a drop indicator or test their own gestures against it.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod reorder;
mod swap;


pub use reorder::{Reorder, ReorderState};
pub use swap::{Candidate, SwapSet, compute_changes};
