use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::engine::{ListCore, ListTask, RenderScope, SectionHeader, Settle};
use crate::extension::{Extension, ExtensionId, ListContext};
use crate::scheduler::{DirectEvent, Task};
use crate::{
    Activity, Channel, CompletionEvent, ContainerStyle, DataSource, FastListOptions, Geometry,
    InsertOutcome, Lifecycle, ListEvent, MountedPool, PointerEvent, PointerKind, PopulateStamp,
    Scheduler, SectionLayout, SlotId, Target, Ticket, Window,
};

/// A virtualized list over a [`DataSource`].
///
/// The list keeps at most [`Geometry::max_item_count`] item elements mounted and recycles them
/// as the viewport moves. It owns no platform objects: the host forwards input (`on_scroll`,
/// `on_resize`, `pointer`, `click`), completion events (`transition_end`, `animation_end`) and
/// time (`frame`, `tick`), and mirrors the exposed state onto its elements.
///
/// Construction schedules two phases: the critical window first ([`ListEvent::Rendered`]), then
/// the whole prerender window ([`ListEvent::Complete`]). With the default immediate scheduler
/// both run before `new` returns; a frame-aligned scheduler runs them on the next
/// [`FastList::frame`].
pub struct FastList<S: DataSource> {
    core: ListCore<S>,
    extensions: Vec<Box<dyn Extension<S>>>,
    rendered: Ticket,
    complete: Ticket,
}

impl<S: DataSource + 'static> core::fmt::Debug for FastList<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FastList")
            .field("lifecycle", &self.core.lifecycle)
            .field("scroll_top", &self.core.scroll_top)
            .field("geometry", &self.core.geometry)
            .field("mounted", &self.core.pool.len())
            .field("editing", &self.core.editing)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

impl<S: DataSource + 'static> FastList<S> {
    /// A list driven by the immediate (fallback) scheduler.
    pub fn new(source: S, options: FastListOptions) -> Self {
        Self::with_scheduler(source, options, Scheduler::immediate())
    }

    pub fn with_scheduler(source: S, options: FastListOptions, scheduler: Scheduler) -> Self {
        Self::with_elements(source, options, scheduler, Vec::new())
    }

    /// Like [`Self::with_scheduler`], seeding the pool with host-created item elements.
    ///
    /// The elements are reused before any [`DataSource::create_item`] call.
    pub fn with_elements(
        source: S,
        options: FastListOptions,
        scheduler: Scheduler,
        elements: Vec<S::Element>,
    ) -> Self {
        let mut core = ListCore::new(source, options, scheduler);
        for element in elements {
            core.pool.attach(element);
        }
        let rendered = core.scheduler.mutation(Task::List(ListTask::Phase1));
        let complete = core
            .scheduler
            .join(&[rendered], Task::List(ListTask::Phase2));
        fldebug!(
            mode = ?core.scheduler.mode(),
            seeded = core.pool.len(),
            "FastList::new"
        );

        let mut list = Self {
            core,
            extensions: Vec::new(),
            rendered,
            complete,
        };
        list.pump(false);
        list
    }

    /// Installs an extension and returns its handle.
    pub fn plugin<E: Extension<S>>(&mut self, extension: E) -> ExtensionId {
        let id = ExtensionId(self.extensions.len());
        self.extensions.push(Box::new(extension));
        let (core, extensions) = (&mut self.core, &mut self.extensions);
        let mut cx = ListContext { core, id };
        extensions[id.0].install(&mut cx);
        fldebug!(id = id.0, "extension installed");
        self.pump(false);
        id
    }

    pub fn extension<E: Extension<S>>(&self) -> Option<&E> {
        self.extensions
            .iter()
            .find_map(|ext| ext.as_any().downcast_ref::<E>())
    }

    pub fn extension_mut<E: Extension<S>>(&mut self) -> Option<&mut E> {
        self.extensions
            .iter_mut()
            .find_map(|ext| ext.as_any_mut().downcast_mut::<E>())
    }

    /// Runs every job the scheduler allows right now.
    fn pump(&mut self, in_frame: bool) {
        while let Some(job) = self.core.scheduler.next_job(in_frame) {
            let settle = match job.task {
                Task::List(task) => self.core.run(task),
                Task::Extension { ext, step } => {
                    let (core, extensions) = (&mut self.core, &mut self.extensions);
                    if let Some(extension) = extensions.get_mut(ext.0) {
                        let mut cx = ListContext { core, id: ext };
                        extension.resume(&mut cx, step);
                    }
                    Settle::AsScheduled
                }
            };
            let mut job = job;
            match settle {
                Settle::AsScheduled => {}
                Settle::Now => job.wait = None,
                Settle::Wait(on) => job.wait = Some(on),
            }
            let timeout = self.core.options.transition_timeout_ms;
            self.core.scheduler.finish(job, self.core.now_ms, timeout);
        }
    }

    fn dispatch_pointer(&mut self, event: &PointerEvent) -> bool {
        let (core, extensions) = (&mut self.core, &mut self.extensions);
        for (i, extension) in extensions.iter_mut().enumerate() {
            let mut cx = ListContext {
                core: &mut *core,
                id: ExtensionId(i),
            };
            if extension.pointer(&mut cx, event) {
                return true;
            }
        }
        false
    }

    fn deliver(&mut self, event: DirectEvent) {
        match event {
            DirectEvent::Scroll(offset) => self.core.handle_scroll(offset),
            DirectEvent::PointerMove(pointer) => {
                self.dispatch_pointer(&pointer);
            }
        }
    }

    /// The host's scroll position changed.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) {
        if self.core.is_destroyed() {
            return;
        }
        self.core.now_ms = now_ms;
        let event = DirectEvent::Scroll(offset);
        if let Some(event) = self.core.scheduler.push_direct(Channel::Scroll, event) {
            self.deliver(event);
        }
        self.pump(false);
    }

    /// The container was resized.
    pub fn on_resize(&mut self, viewport_height: u32) {
        if self.core.is_destroyed() {
            return;
        }
        self.core.options.viewport_height = viewport_height;
        self.core.resize();
        self.pump(false);
    }

    /// A paint frame: delivers coalesced direct events, then runs queued mutations.
    pub fn frame(&mut self, now_ms: u64) {
        if self.core.is_destroyed() {
            return;
        }
        self.core.now_ms = now_ms;
        self.tick_timeouts(now_ms);
        for channel in [Channel::Scroll, Channel::PointerMove] {
            if let Some(event) = self.core.scheduler.take_direct(channel) {
                self.deliver(event);
            }
        }
        self.pump(true);
    }

    /// Advances time: fires completion timeouts and settles scrolling into idle.
    pub fn tick(&mut self, now_ms: u64) {
        if self.core.is_destroyed() {
            return;
        }
        self.core.now_ms = now_ms;
        self.tick_timeouts(now_ms);
        if self.core.lifecycle == Lifecycle::Steady(Activity::Scrolling)
            && now_ms.saturating_sub(self.core.last_scroll_ms) >= self.core.options.idle_delay_ms
        {
            self.core.lifecycle = Lifecycle::Steady(Activity::Idle);
            fltrace!(now_ms, "idle");
        }
        self.pump(false);
    }

    fn tick_timeouts(&mut self, now_ms: u64) {
        let expired = self.core.scheduler.expire(now_ms);
        if expired > 0 {
            fldebug!(expired, now_ms, "completion waits timed out");
        }
    }

    /// The host observed a `transitionend` on `target`.
    pub fn transition_end(&mut self, target: Target) {
        self.complete_event(target, CompletionEvent::TransitionEnd);
    }

    /// The host observed an `animationend` on `target`.
    pub fn animation_end(&mut self, target: Target) {
        self.complete_event(target, CompletionEvent::AnimationEnd);
    }

    fn complete_event(&mut self, target: Target, event: CompletionEvent) {
        if self.core.is_destroyed() {
            return;
        }
        if self.core.scheduler.complete(target, event) {
            self.pump(false);
        }
    }

    /// Renders the prerender window for the current geometry.
    pub fn render(&mut self) {
        if self.core.is_destroyed() {
            return;
        }
        self.core.render(RenderScope::Prerender, false, None, true);
    }

    /// Re-reads the data source (the record sequence changed) and re-populates in place.
    ///
    /// The scroll offset is kept, clamped to the new content height.
    pub fn reload_data(&mut self) -> Ticket {
        if self.core.is_destroyed() {
            return self.core.scheduler.resolved();
        }
        let ticket = self
            .core
            .scheduler
            .mutation(Task::List(ListTask::ReloadData));
        self.rendered = ticket;
        self.pump(false);
        ticket
    }

    /// Scrolls by `by` pixels and re-renders synchronously, bypassing the scroll channel.
    ///
    /// The host applies [`Self::scroll_top`] to its container afterwards.
    pub fn scroll_instantly(&mut self, by: i64) {
        if self.core.is_destroyed() {
            return;
        }
        self.core.scroll_instantly(by);
    }

    /// The data source gained a record at `index`.
    ///
    /// Only index 0 is supported. Near the top, visible items slide down and the new item is
    /// revealed; scrolled down (or in edit mode) indexes shift silently and the scroll offset
    /// moves by one item so the visible content stays put.
    pub fn inserted_at_index(&mut self, index: usize) -> InsertOutcome {
        if self.core.is_destroyed() {
            return InsertOutcome::Unsupported;
        }
        if index != 0 {
            fldebug!(index, "inserted_at_index: only index 0 is supported");
            return InsertOutcome::Unsupported;
        }

        let scheduler = &mut self.core.scheduler;
        if self.core.geometry.top_position > self.core.geometry.item_height as u64
            || self.core.editing
        {
            scheduler.mutation(Task::List(ListTask::InsertOnTop { keep_scroll: true }));
            self.pump(false);
            return InsertOutcome::Silent;
        }

        self.core.container.reordering = true;
        let pushed = scheduler.mutation(Task::List(ListTask::PushDown));
        let inserted = scheduler.join(
            &[pushed],
            Task::List(ListTask::InsertOnTop { keep_scroll: false }),
        );
        let cleaned = scheduler.join(&[inserted], Task::List(ListTask::CleanInlineStyles));
        let revealed = scheduler.join(&[cleaned], Task::List(ListTask::RevealNew));
        scheduler.join(&[revealed], Task::List(ListTask::FinishInsert));
        self.pump(false);
        InsertOutcome::Animated
    }

    /// Flips edit mode. The ticket resolves once the container's edit animation ended.
    pub fn toggle_edit_mode(&mut self) -> Ticket {
        if self.core.is_destroyed() {
            return self.core.scheduler.resolved();
        }
        let editing = !self.core.editing;
        self.core.editing = editing;
        fldebug!(editing, "toggle_edit_mode");

        let (core, extensions) = (&mut self.core, &mut self.extensions);
        for (i, extension) in extensions.iter_mut().enumerate() {
            let mut cx = ListContext {
                core: &mut *core,
                id: ExtensionId(i),
            };
            extension.edit_mode_changed(&mut cx, editing);
        }

        if self.core.pool.is_empty() {
            return self.core.scheduler.resolved();
        }
        let ticket = self.core.scheduler.feedback(
            Task::List(ListTask::EditStyles { editing }),
            Target::Container,
            CompletionEvent::AnimationEnd,
        );
        self.pump(false);
        ticket
    }

    /// A click on a mounted item. Emits [`ListEvent::ItemSelected`] outside of edit mode.
    pub fn click(&mut self, slot: SlotId, pointer: PointerEvent) -> bool {
        if self.core.is_destroyed() || self.core.editing {
            return false;
        }
        let Some(index) = self.core.pool.get(slot).and_then(|item| item.index()) else {
            return false;
        };
        self.core
            .events
            .push(ListEvent::ItemSelected { index, pointer });
        true
    }

    /// Pointer input. Moves go through the pointer-move channel; presses and releases reach
    /// the extensions directly. Returns whether an extension consumed the event.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        if self.core.is_destroyed() {
            return false;
        }
        let consumed = match event.kind {
            PointerKind::Move => {
                let direct = DirectEvent::PointerMove(event);
                let channel = Channel::PointerMove;
                match self.core.scheduler.push_direct(channel, direct) {
                    Some(DirectEvent::PointerMove(pointer)) => self.dispatch_pointer(&pointer),
                    _ => false,
                }
            }
            PointerKind::Down | PointerKind::Up => self.dispatch_pointer(&event),
        };
        self.pump(false);
        consumed
    }

    /// Resolves a population that returned [`crate::Population::Pending`].
    ///
    /// Stale stamps (the element was reused since) are discarded and `false` is returned.
    pub fn complete_population(&mut self, stamp: PopulateStamp) -> bool {
        if self.core.is_destroyed() {
            return false;
        }
        let applied = self.core.complete_population(stamp);
        self.pump(false);
        applied
    }

    /// Swaps the element held by `slot`, returning the previous one.
    pub fn replace_child(&mut self, slot: SlotId, replacement: S::Element) -> Option<S::Element> {
        self.core.pool.replace_element(slot, replacement)
    }

    /// Drops every listener and pending task and releases all elements. Terminal.
    pub fn destroy(&mut self) {
        if self.core.is_destroyed() {
            return;
        }
        self.core.destroy();
    }

    /// Animated offset of an item at `now_ms`, for hosts that paint without native transitions.
    pub fn item_offset_at(&self, slot: SlotId, now_ms: u64) -> Option<i64> {
        let item = self.core.pool.get(slot)?;
        Some(ListCore::<S>::visual_offset(item, now_ms))
    }

    pub fn drain_events(&mut self) -> Vec<ListEvent> {
        core::mem::take(&mut self.core.events)
    }

    /// Elements the list let go of (resize trimming, section changes, destroy).
    pub fn drain_released(&mut self) -> Vec<S::Element> {
        core::mem::take(&mut self.core.released)
    }

    /// Resolves once the critical window is visible; replaced by [`Self::reload_data`].
    pub fn rendered(&self) -> Ticket {
        self.rendered
    }

    /// Resolves once the first full prerender window is populated.
    pub fn complete(&self) -> Ticket {
        self.complete
    }

    pub fn is_resolved(&self, ticket: Ticket) -> bool {
        self.core.scheduler.is_resolved(ticket)
    }

    pub fn source(&self) -> &S {
        &self.core.source
    }

    /// Mutable access for the host to update records before notifying the list
    /// (`reload_data`, `inserted_at_index`).
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.core.source
    }

    pub fn options(&self) -> &FastListOptions {
        &self.core.options
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.core.scheduler
    }

    pub fn geometry(&self) -> &Geometry {
        &self.core.geometry
    }

    pub fn layout(&self) -> &SectionLayout {
        &self.core.layout
    }

    pub fn pool(&self) -> &MountedPool<S::Element> {
        &self.core.pool
    }

    pub fn sections(&self) -> &[SectionHeader<S::Element, S::Section>] {
        &self.core.headers
    }

    pub fn container(&self) -> &ContainerStyle {
        &self.core.container
    }

    /// The window of the last render pass.
    pub fn window(&self) -> Option<Window> {
        self.core.window
    }

    pub fn scroll_top(&self) -> u64 {
        self.core.scroll_top
    }

    pub fn editing(&self) -> bool {
        self.core.editing
    }

    pub fn is_fast_scrolling(&self) -> bool {
        self.core.fast
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.core.lifecycle
    }
}
