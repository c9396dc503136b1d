use alloc::vec::Vec;
use core::any::Any;

use fastlist::{
    CompletionEvent, DataSource, Easing, Extension, ListContext, OverlayAnim, PointerEvent,
    PointerKind, PointerTarget, SlotId, Target, Ticket, Transition,
};

use crate::swap::{Candidate, SwapSet, compute_changes};

// Steps scheduled through the list context.
const ELEVATE: u32 = 0;
const LISTEN: u32 = 1;
const HIDE_OVERLAY: u32 = 2;
const COMMIT: u32 = 3;
const REVEAL_OVERLAY: u32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReorderState {
    #[default]
    Idle,
    /// Following the pointer.
    Dragging,
    /// Released; displaced items settle before the new order is committed.
    Committing,
}

/// State of the gesture in progress.
#[derive(Clone, Debug)]
struct Drag {
    slot: SlotId,
    initial_y: i64,
    pointer: Option<u64>,
    swaps: SwapSet,
}

/// Drag-to-reorder for a [`fastlist::FastList`] in edit mode.
///
/// A press on an item's drag handle lifts the item; it then follows the pointer while the items
/// it passes make room, one item height at a time. On release everything settles into place and
/// the record is moved through the data source (`remove_at_index` then `insert_at_index`, within
/// the dragged item's section).
///
/// Only one gesture is tracked at a time; a second press while busy is ignored.
#[derive(Clone, Debug)]
pub struct Reorder {
    state: ReorderState,
    drag: Option<Drag>,
    /// Element whose overlay is revealed after the commit.
    settling: Option<SlotId>,
    step_ms: u64,
}

impl Default for Reorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Reorder {
    pub fn new() -> Self {
        Self {
            state: ReorderState::Idle,
            drag: None,
            settling: None,
            step_ms: 150,
        }
    }

    /// Duration of a one item-height move. The drop animation scales with its distance.
    pub fn with_step_ms(mut self, step_ms: u64) -> Self {
        self.step_ms = step_ms;
        self
    }

    pub fn state(&self) -> ReorderState {
        self.state
    }

    /// The item being dragged, until the commit.
    pub fn dragged(&self) -> Option<SlotId> {
        self.drag.as_ref().map(|drag| drag.slot)
    }

    /// Items currently moved up to make room (the dragged item went down past them).
    pub fn displaced_up(&self) -> usize {
        self.drag.as_ref().map_or(0, |drag| drag.swaps.up.len())
    }

    /// Items currently moved down to make room.
    pub fn displaced_down(&self) -> usize {
        self.drag.as_ref().map_or(0, |drag| drag.swaps.down.len())
    }

    fn start<S: DataSource>(
        &mut self,
        cx: &mut ListContext<'_, S>,
        slot: SlotId,
        event: &PointerEvent,
    ) -> bool {
        if self.state != ReorderState::Idle {
            rotrace!(?slot, "already reordering");
            return true;
        }
        if cx.pool().get(slot).and_then(|item| item.index()).is_none() {
            return false;
        }

        self.drag = Some(Drag {
            slot,
            initial_y: event.y,
            pointer: event.id,
            swaps: SwapSet::default(),
        });
        self.state = ReorderState::Dragging;

        // Moves are only listened to once the item is lifted.
        let lifted = cx.mutation(ELEVATE);
        let listening = cx.join(&[lifted], LISTEN);
        cx.feedback_after(
            &[listening],
            HIDE_OVERLAY,
            Target::Item(slot),
            CompletionEvent::AnimationEnd,
        );
        rodebug!(?slot, y = event.y, "reorder start");
        true
    }

    fn drag_move<S: DataSource>(
        &mut self,
        cx: &mut ListContext<'_, S>,
        event: &PointerEvent,
    ) -> bool {
        if self.state != ReorderState::Dragging {
            return false;
        }
        if event.is_multi_touch() {
            return true;
        }
        let step_ms = self.step_ms;
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let delta = event.y - drag.initial_y;

        let before = drag.swaps.sizes();
        if refresh_swaps(cx, drag, delta) && drag.swaps.sizes() != before {
            apply_changes(cx, &drag.swaps, drag.slot, step_ms);
        }
        cx.set_tweak(drag.slot, delta);
        rotrace!(
            delta,
            up = drag.swaps.up.len(),
            down = drag.swaps.down.len(),
            "reorder move"
        );
        true
    }

    fn end<S: DataSource>(&mut self, cx: &mut ListContext<'_, S>, event: &PointerEvent) -> bool {
        if self.state != ReorderState::Dragging {
            return false;
        }
        let step_ms = self.step_ms;
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        cx.detach_pointer_move();

        if event.id == drag.pointer {
            refresh_swaps(cx, drag, event.y - drag.initial_y);
        }
        self.state = ReorderState::Committing;

        let mut settled = apply_changes(cx, &drag.swaps, drag.slot, step_ms);
        settled.extend(move_in_place(cx, drag, step_ms));
        cx.join(&settled, COMMIT);
        rodebug!(
            up = drag.swaps.up.len(),
            down = drag.swaps.down.len(),
            waiting = settled.len(),
            "reorder end"
        );
        true
    }

    fn commit<S: DataSource>(&mut self, cx: &mut ListContext<'_, S>) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.state = ReorderState::Idle;

        let from = cx.pool().get(drag.slot).and_then(|item| item.index());
        let committed = from.is_some_and(|from| {
            let to = (from as i64 + drag.swaps.shift()).max(0) as usize;
            rodebug!(from, to, "reorder commit");
            cx.commit_move(from, to)
        });
        if !committed {
            // The dragged element was recycled away: only undo the offsets.
            for slot in cx.pool().slot_ids() {
                cx.set_tweak(slot, 0);
                if let Some(style) = cx.style_mut(slot) {
                    style.transition = None;
                }
            }
        }

        if let Some(style) = cx.style_mut(drag.slot) {
            style.elevated = false;
        }
        cx.set_reordering(false);

        self.settling = Some(drag.slot);
        cx.feedback_after(
            &[],
            REVEAL_OVERLAY,
            Target::Item(drag.slot),
            CompletionEvent::AnimationEnd,
        );
    }
}

fn candidates<S: DataSource>(cx: &ListContext<'_, S>) -> Vec<Candidate> {
    let pool = cx.pool();
    pool.mapped()
        .filter_map(|(_, slot)| {
            let item = pool.get(slot)?;
            Some(Candidate {
                slot,
                section: item.section(),
                position: item.position(),
                tweak: item.tweak(),
            })
        })
        .collect()
}

/// Recomputes the swap sets for `delta`. Returns `false` when the dragged item is not mounted.
fn refresh_swaps<S: DataSource>(cx: &ListContext<'_, S>, drag: &mut Drag, delta: i64) -> bool {
    let items = candidates(cx);
    let Some(&dragged) = items.iter().find(|c| c.slot == drag.slot) else {
        return false;
    };
    compute_changes(&mut drag.swaps, &dragged, delta, &items);
    true
}

/// Animates every mounted item to the offset its swap-set membership asks for.
fn apply_changes<S: DataSource>(
    cx: &mut ListContext<'_, S>,
    swaps: &SwapSet,
    dragged: SlotId,
    step_ms: u64,
) -> Vec<Ticket> {
    let height = cx.geometry().item_height as i64;
    let transition = Transition::transform(step_ms, Easing::Ease);
    let offsets: Vec<(SlotId, i64)> = cx
        .pool()
        .mapped()
        .filter(|&(_, slot)| slot != dragged)
        .filter_map(|(_, slot)| Some((slot, cx.pool().get(slot)?.tweak())))
        .collect();

    let mut tickets = Vec::new();
    for (slot, tweak) in offsets {
        let target = if swaps.down.contains(&slot) {
            height
        } else if swaps.up.contains(&slot) {
            -height
        } else {
            0
        };
        if tweak != target {
            tickets.push(cx.animate_tweak(slot, target, transition));
        }
    }
    tickets
}

/// Drops the dragged item onto its resting offset. `None` when it is already there.
fn move_in_place<S: DataSource>(
    cx: &mut ListContext<'_, S>,
    drag: &Drag,
    step_ms: u64,
) -> Option<Ticket> {
    let height = cx.geometry().item_height as i64;
    let current = cx.pool().get(drag.slot)?.tweak();
    let resting = drag.swaps.shift() * height;
    if current == 0 || current == resting || height == 0 {
        cx.set_tweak(drag.slot, resting);
        return None;
    }
    let duration = current.abs_diff(resting) * step_ms / height as u64;
    Some(cx.animate_tweak(
        drag.slot,
        resting,
        Transition::transform(duration, Easing::Linear),
    ))
}

impl<S: DataSource> Extension<S> for Reorder {
    fn pointer(&mut self, cx: &mut ListContext<'_, S>, event: &PointerEvent) -> bool {
        match (event.kind, event.target) {
            (PointerKind::Down, PointerTarget::DragHandle(slot)) => {
                if !cx.editing() || event.is_multi_touch() {
                    return false;
                }
                self.start(cx, slot, event)
            }
            (PointerKind::Down, _) => false,
            (PointerKind::Move, _) => self.drag_move(cx, event),
            (PointerKind::Up, _) => self.end(cx, event),
        }
    }

    fn resume(&mut self, cx: &mut ListContext<'_, S>, step: u32) {
        match step {
            ELEVATE => {
                if let Some(style) = self.dragged().and_then(|slot| cx.style_mut(slot)) {
                    style.elevated = true;
                }
                cx.set_reordering(true);
            }
            LISTEN => {
                if self.state == ReorderState::Dragging {
                    cx.attach_pointer_move();
                }
            }
            HIDE_OVERLAY => {
                if let Some(style) = self.dragged().and_then(|slot| cx.style_mut(slot)) {
                    style.overlay = Some(OverlayAnim::Hide);
                }
            }
            COMMIT => self.commit(cx),
            REVEAL_OVERLAY => {
                if let Some(style) = self.settling.take().and_then(|slot| cx.style_mut(slot)) {
                    style.overlay = Some(OverlayAnim::Reveal);
                }
            }
            _ => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
