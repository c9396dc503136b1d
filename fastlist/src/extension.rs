use core::any::Any;

use crate::engine::{ListCore, ListTask};
use crate::scheduler::{Await, Task};
use crate::{
    Channel, CompletionEvent, DataSource, Geometry, ItemStyle, MountedPool, PointerEvent,
    SectionLayout, SlotId, Target, Ticket, Transition,
};

/// Handle of an installed extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtensionId(pub(crate) usize);

/// Behavior composed over a [`crate::FastList`] with [`crate::FastList::plugin`].
///
/// Extensions never own list state. They get a [`ListContext`] for the duration of each call,
/// and they continue scheduled work in [`Extension::resume`] with the `step` they scheduled.
pub trait Extension<S: DataSource>: Any {
    fn install(&mut self, _cx: &mut ListContext<'_, S>) {}

    /// Pointer input routed by the list. Returns whether the event was consumed.
    fn pointer(&mut self, cx: &mut ListContext<'_, S>, event: &PointerEvent) -> bool;

    /// Runs a step previously scheduled through the context.
    fn resume(&mut self, cx: &mut ListContext<'_, S>, step: u32);

    fn edit_mode_changed(&mut self, _cx: &mut ListContext<'_, S>, _editing: bool) {}

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The capability surface extensions get: the mounted pool, geometry, the scheduler and the
/// commit hook.
pub struct ListContext<'a, S: DataSource> {
    pub(crate) core: &'a mut ListCore<S>,
    pub(crate) id: ExtensionId,
}

impl<S: DataSource> ListContext<'_, S> {
    pub fn id(&self) -> ExtensionId {
        self.id
    }

    pub fn pool(&self) -> &MountedPool<S::Element> {
        &self.core.pool
    }

    pub fn geometry(&self) -> &Geometry {
        &self.core.geometry
    }

    pub fn layout(&self) -> &SectionLayout {
        &self.core.layout
    }

    pub fn editing(&self) -> bool {
        self.core.editing
    }

    pub fn now_ms(&self) -> u64 {
        self.core.now_ms
    }

    pub fn source(&self) -> &S {
        &self.core.source
    }

    /// Moves an item by `tweak` relative to its committed position, without animation.
    pub fn set_tweak(&mut self, slot: SlotId, tweak: i64) {
        if let Some(item) = self.core.pool.get_mut(slot) {
            item.set_tweak(tweak);
            item.motion = None;
        }
    }

    pub fn style_mut(&mut self, slot: SlotId) -> Option<&mut ItemStyle> {
        self.core.pool.get_mut(slot).map(|item| &mut item.style)
    }

    pub fn set_reordering(&mut self, on: bool) {
        self.core.container.reordering = on;
    }

    /// Animates an item to `tweak` with `transition`.
    ///
    /// The returned ticket resolves once the transition ended (or timed out) and the inline
    /// transition was cleared again.
    pub fn animate_tweak(&mut self, slot: SlotId, tweak: i64, transition: Transition) -> Ticket {
        let moved = self.core.scheduler.feedback(
            Task::List(ListTask::Tweak {
                slot,
                tweak,
                transition,
            }),
            Target::Item(slot),
            CompletionEvent::TransitionEnd,
        );
        self.core
            .scheduler
            .join(&[moved], Task::List(ListTask::ClearTransition { slot }))
    }

    /// Schedules [`Extension::resume`] with `step` as a mutation.
    pub fn mutation(&mut self, step: u32) -> Ticket {
        let task = self.task(step);
        self.core.scheduler.mutation(task)
    }

    /// Schedules `step` after `after`, then waits for `event` on `target`.
    pub fn feedback_after(
        &mut self,
        after: &[Ticket],
        step: u32,
        target: Target,
        event: CompletionEvent,
    ) -> Ticket {
        let task = self.task(step);
        self.core
            .scheduler
            .schedule(after, task, Some(Await { target, event }))
    }

    /// Schedules `step` once every ticket in `after` resolved.
    pub fn join(&mut self, after: &[Ticket], step: u32) -> Ticket {
        let task = self.task(step);
        self.core.scheduler.join(after, task)
    }

    pub fn is_resolved(&self, ticket: Ticket) -> bool {
        self.core.scheduler.is_resolved(ticket)
    }

    pub fn attach_pointer_move(&mut self) {
        self.core.scheduler.attach_direct(Channel::PointerMove);
    }

    pub fn detach_pointer_move(&mut self) {
        self.core.scheduler.detach_direct(Channel::PointerMove);
    }

    /// Moves the record at `from` to `to` within its section and re-renders.
    ///
    /// The data source sees `remove_at_index(from)` then `insert_at_index(to, ..)`. Every
    /// transient offset and inline transition is reset. Returns `false` when the source had no
    /// record at `from`.
    pub fn commit_move(&mut self, from: usize, to: usize) -> bool {
        self.core.commit_move(from, to)
    }

    fn task(&self, step: u32) -> Task {
        Task::Extension { ext: self.id, step }
    }
}
