use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::{ItemStyle, SlotId, Tween};

/// A mounted item element and the state the controller keeps for it.
#[derive(Clone, Debug)]
pub struct MountedItem<E> {
    pub(crate) element: E,
    pub(crate) index: Option<usize>,
    /// Index the element was last placed for; placement is skipped while it matches.
    pub(crate) placed: Option<usize>,
    pub(crate) position: u64,
    pub(crate) tweak: i64,
    pub(crate) section: Option<usize>,
    pub(crate) generation: u32,
    pub(crate) populated: bool,
    pub(crate) detail: bool,
    pub(crate) style: ItemStyle,
    pub(crate) motion: Option<Tween>,
}

impl<E> MountedItem<E> {
    fn new(element: E) -> Self {
        Self {
            element,
            index: None,
            placed: None,
            position: 0,
            tweak: 0,
            section: None,
            generation: 0,
            populated: false,
            detail: false,
            style: ItemStyle::default(),
            motion: None,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// Logical index, `None` while the element waits for reuse.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Committed position of the element's index.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Transient offset on top of [`Self::position`].
    pub fn tweak(&self) -> i64 {
        self.tweak
    }

    /// The translate offset the host applies: position plus tweak.
    pub fn offset(&self) -> i64 {
        self.position as i64 + self.tweak
    }

    /// Ordinal of the section the element was placed in.
    pub fn section(&self) -> Option<usize> {
        self.section
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn is_detail_populated(&self) -> bool {
        self.detail
    }

    pub fn style(&self) -> &ItemStyle {
        &self.style
    }

    pub fn motion(&self) -> Option<&Tween> {
        self.motion.as_ref()
    }

    pub(crate) fn set_tweak(&mut self, tweak: i64) {
        self.tweak = tweak;
    }
}

/// Arena of attached item elements plus the logical index → slot mapping.
///
/// Every attached element lives in a slot; a slot is either mapped to exactly one logical index
/// or index-less (recycled, still attached, waiting for reuse). Slots freed by
/// [`MountedPool::release`] are reused through a free list so [`SlotId`]s stay small.
#[derive(Clone, Debug)]
pub struct MountedPool<E> {
    slots: Vec<Option<MountedItem<E>>>,
    by_index: BTreeMap<usize, SlotId>,
    free: Vec<SlotId>,
    attached: usize,
}

impl<E> Default for MountedPool<E> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            by_index: BTreeMap::new(),
            free: Vec::new(),
            attached: 0,
        }
    }
}

impl<E> MountedPool<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached elements, mapped or not.
    pub fn len(&self) -> usize {
        self.attached
    }

    pub fn is_empty(&self) -> bool {
        self.attached == 0
    }

    /// Number of elements currently mapped to a logical index.
    pub fn mapped_len(&self) -> usize {
        self.by_index.len()
    }

    pub fn get(&self, slot: SlotId) -> Option<&MountedItem<E>> {
        self.slots.get(slot.idx())?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, slot: SlotId) -> Option<&mut MountedItem<E>> {
        self.slots.get_mut(slot.idx())?.as_mut()
    }

    pub fn slot_for(&self, index: usize) -> Option<SlotId> {
        self.by_index.get(&index).copied()
    }

    pub fn item_at(&self, index: usize) -> Option<&MountedItem<E>> {
        self.get(self.slot_for(index)?)
    }

    pub fn contains_index(&self, index: usize) -> bool {
        self.by_index.contains_key(&index)
    }

    /// All attached elements, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &MountedItem<E>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|item| (SlotId(i as u32), item)))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut MountedItem<E>)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|item| (SlotId(i as u32), item)))
    }

    /// Mapped `(index, slot)` pairs in ascending index order.
    pub fn mapped(&self) -> impl Iterator<Item = (usize, SlotId)> + '_ {
        self.by_index.iter().map(|(&i, &s)| (i, s))
    }

    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.iter().map(|(slot, _)| slot).collect()
    }

    /// Adds a new element, index-less.
    pub(crate) fn attach(&mut self, element: E) -> SlotId {
        self.attached += 1;
        let item = MountedItem::new(element);
        if let Some(slot) = self.free.pop() {
            self.slots[slot.idx()] = Some(item);
            return slot;
        }
        self.slots.push(Some(item));
        SlotId((self.slots.len() - 1) as u32)
    }

    /// Maps `slot` to `index`, dropping its previous index.
    ///
    /// The generation is bumped so that population stamps issued for the previous index become
    /// stale.
    pub(crate) fn assign(&mut self, slot: SlotId, index: usize) {
        debug_assert!(
            self.slot_for(index).is_none_or(|s| s == slot),
            "MountedPool: index {index} already mapped"
        );
        let Some(item) = self.slots.get_mut(slot.idx()).and_then(Option::as_mut) else {
            return;
        };
        if let Some(prev) = item.index.replace(index) {
            self.by_index.remove(&prev);
        }
        item.generation = item.generation.wrapping_add(1);
        item.populated = false;
        self.by_index.insert(index, slot);
    }

    /// Removes the index of the element mapped to `index`, keeping it attached.
    pub(crate) fn unmap(&mut self, index: usize) -> Option<SlotId> {
        let slot = self.by_index.remove(&index)?;
        if let Some(item) = self.get_mut(slot) {
            item.index = None;
        }
        Some(slot)
    }

    /// Detaches the element held by `slot`.
    pub(crate) fn release(&mut self, slot: SlotId) -> Option<E> {
        let item = self.slots.get_mut(slot.idx())?.take()?;
        if let Some(index) = item.index {
            self.by_index.remove(&index);
        }
        self.attached -= 1;
        self.free.push(slot);
        Some(item.element)
    }

    /// Releases index-less elements until at most `limit` remain attached.
    pub(crate) fn shrink_to(&mut self, limit: usize) -> Vec<E> {
        let mut out = Vec::new();
        let idle: Vec<SlotId> = self
            .iter()
            .filter(|(_, item)| item.index.is_none())
            .map(|(slot, _)| slot)
            .collect();
        for slot in idle {
            if self.attached <= limit {
                break;
            }
            if let Some(el) = self.release(slot) {
                out.push(el);
            }
        }
        out
    }

    /// Rewrites every mapped index through `f`; indexes mapped to `None` become index-less.
    ///
    /// Used when the data source shifts records (insertion, reorder commit). Placement is
    /// invalidated for moved elements so the next render repositions them.
    pub(crate) fn remap(&mut self, mut f: impl FnMut(usize) -> Option<usize>) {
        let old = core::mem::take(&mut self.by_index);
        for (index, slot) in old {
            let Some(item) = self.slots.get_mut(slot.idx()).and_then(Option::as_mut) else {
                continue;
            };
            match f(index) {
                Some(new_index) => {
                    debug_assert!(
                        !self.by_index.contains_key(&new_index),
                        "MountedPool: remap collision at {new_index}"
                    );
                    if new_index != index {
                        item.placed = None;
                    }
                    item.index = Some(new_index);
                    self.by_index.insert(new_index, slot);
                }
                None => {
                    item.index = None;
                }
            }
        }
    }

    pub(crate) fn replace_element(&mut self, slot: SlotId, element: E) -> Option<E> {
        let item = self.get_mut(slot)?;
        Some(core::mem::replace(&mut item.element, element))
    }

    pub(crate) fn clear(&mut self) -> Vec<E> {
        self.by_index.clear();
        self.free.clear();
        self.attached = 0;
        self.slots
            .drain(..)
            .flatten()
            .map(|item| item.element)
            .collect()
    }
}
