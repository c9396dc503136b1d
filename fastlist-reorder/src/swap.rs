use alloc::collections::BTreeSet;

use fastlist::SlotId;

/// A mounted item as seen by the swap computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub slot: SlotId,
    pub section: Option<usize>,
    /// Committed position of the item's index.
    pub position: u64,
    /// Current transient offset.
    pub tweak: i64,
}

/// Items displaced by a drag in progress.
///
/// `up` holds items below the dragged one that make room by moving up one item height, `down`
/// items above it that move down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapSet {
    pub up: BTreeSet<SlotId>,
    pub down: BTreeSet<SlotId>,
}

impl SwapSet {
    /// Set sizes; membership is only re-applied when these change.
    pub fn sizes(&self) -> (usize, usize) {
        (self.up.len(), self.down.len())
    }

    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        self.up.contains(&slot) || self.down.contains(&slot)
    }

    /// Net index shift of the dragged item.
    pub fn shift(&self) -> i64 {
        self.up.len() as i64 - self.down.len() as i64
    }
}

/// Updates `swaps` for the dragged item moved by `delta` pixels.
///
/// An item joins `down` once the dragged item's tweaked position passed above its original
/// position, and leaves it once the dragged item is back below the item's tweaked position.
/// `up` mirrors this downwards. Items of another section never take part.
///
/// `items` should come in index order; ties then resolve towards the lower index.
pub fn compute_changes<'a>(
    swaps: &mut SwapSet,
    dragged: &Candidate,
    delta: i64,
    items: impl IntoIterator<Item = &'a Candidate>,
) {
    let dragged_original = dragged.position as i64;
    let dragged_tweaked = dragged_original + delta;

    for item in items {
        if item.slot == dragged.slot || item.section != dragged.section {
            continue;
        }
        let original = item.position as i64;
        let tweaked = original + item.tweak;

        if original < dragged_original && dragged_tweaked < original {
            swaps.down.insert(item.slot);
        } else if dragged_tweaked > tweaked {
            swaps.down.remove(&item.slot);
        }

        if original > dragged_original && dragged_tweaked > original {
            swaps.up.insert(item.slot);
        } else if dragged_tweaked < tweaked {
            swaps.up.remove(&item.slot);
        }
    }
}
