use alloc::vec::Vec;

use crate::scheduler::{Await, Task};
use crate::source::layout_of;
#[cfg(feature = "tracing")]
use crate::window::viewport_diagram;
use crate::window::{compute_window, initial_range, leading_edge, recyclable};
use crate::{
    Activity, Channel, CompletionEvent, ContainerStyle, DataSource, Easing, FastListOptions,
    Geometry, Lifecycle, ListEvent, MountedItem, MountedPool, Overflow, OverlayAnim, PopulateStamp,
    Population, Scheduler, SectionLayout, SlotId, Target, Transition, TransitionProperty, Tween,
    Window,
};

/// Work the controller schedules on itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ListTask {
    /// Container geometry, sections, critical window.
    Phase1,
    /// The full prerender window.
    Phase2,
    ReloadData,
    InsertOnTop { keep_scroll: bool },
    PushDown,
    CleanInlineStyles,
    RevealNew,
    FinishInsert,
    EditStyles { editing: bool },
    RevealPopulated { slot: SlotId, generation: u32 },
    Tweak {
        slot: SlotId,
        tweak: i64,
        transition: Transition,
    },
    ClearTransition { slot: SlotId },
}

/// How a finished task settles its ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Settle {
    /// Whatever the task was scheduled with.
    AsScheduled,
    Now,
    Wait(Await),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenderScope {
    Critical,
    /// First full pass: a whole budget from the window start.
    Initial,
    Prerender,
}

/// A mounted section header.
#[derive(Clone, Debug)]
pub struct SectionHeader<E, K> {
    pub(crate) element: E,
    pub(crate) key: K,
    pub(crate) ordinal: usize,
    pub(crate) top: u64,
    pub(crate) height: u64,
}

impl<E, K> SectionHeader<E, K> {
    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Offset of the header.
    pub fn top(&self) -> u64 {
        self.top
    }

    /// Header plus the section's items.
    pub fn height(&self) -> u64 {
        self.height
    }
}

pub(crate) struct ListCore<S: DataSource> {
    pub(crate) source: S,
    pub(crate) options: FastListOptions,
    pub(crate) scheduler: Scheduler,
    pub(crate) geometry: Geometry,
    pub(crate) layout: SectionLayout,
    pub(crate) pool: MountedPool<S::Element>,
    pub(crate) headers: Vec<SectionHeader<S::Element, S::Section>>,
    pub(crate) container: ContainerStyle,
    pub(crate) window: Option<Window>,
    pub(crate) scroll_top: u64,
    /// A scroll position was sampled; the first one carries no velocity.
    pub(crate) sampled: bool,
    pub(crate) fast: bool,
    pub(crate) editing: bool,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) events: Vec<ListEvent>,
    pub(crate) released: Vec<S::Element>,
    pub(crate) now_ms: u64,
    pub(crate) last_scroll_ms: u64,
}

impl<S: DataSource> ListCore<S> {
    pub(crate) fn new(source: S, options: FastListOptions, scheduler: Scheduler) -> Self {
        let geometry = Geometry::new(source.item_height(), source.section_header_height());
        Self {
            source,
            options,
            scheduler,
            geometry,
            layout: SectionLayout::default(),
            pool: MountedPool::new(),
            headers: Vec::new(),
            container: ContainerStyle {
                overflow_x: Overflow::Hidden,
                overflow_y: Overflow::Scroll,
                ..ContainerStyle::default()
            },
            window: None,
            scroll_top: 0,
            sampled: false,
            fast: false,
            editing: false,
            lifecycle: Lifecycle::Constructing,
            events: Vec::new(),
            released: Vec::new(),
            now_ms: 0,
            last_scroll_ms: 0,
        }
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    pub(crate) fn max_scroll(&self) -> u64 {
        self.layout
            .full_height()
            .saturating_sub(self.geometry.viewport_height as u64)
    }

    pub(crate) fn update_container_geometry(&mut self) {
        let viewport = self
            .source
            .viewport_height()
            .unwrap_or(self.options.viewport_height);
        self.geometry.update_container(
            viewport,
            self.options.prerender_multiplier,
            self.options.switch_window_divisor,
        );
    }

    pub(crate) fn update_list_height(&mut self) {
        self.container.list_height = self.layout.full_height();
    }

    /// Re-snapshots the source shape and re-populates the section headers.
    pub(crate) fn update_sections(&mut self) {
        self.layout = layout_of(&self.source);
        self.geometry.item_height = self.layout.item_height();
        self.geometry.header_height = self.layout.header_height();

        let keys = self.source.sections();
        while self.headers.len() > keys.len() {
            if let Some(header) = self.headers.pop() {
                self.released.push(header.element);
            }
        }
        for (ordinal, key) in keys.into_iter().enumerate() {
            let height = self.layout.header_height() as u64 + self.source.full_section_height(&key);
            let top = self.layout.section_top(ordinal);
            if ordinal == self.headers.len() {
                let element = self.source.create_section();
                self.headers.push(SectionHeader {
                    element,
                    key,
                    ordinal,
                    top,
                    height,
                });
            } else {
                let header = &mut self.headers[ordinal];
                header.key = key;
                header.top = top;
                header.height = height;
            }
            let header = &mut self.headers[ordinal];
            self.source
                .populate_section(&mut header.element, &header.key, ordinal);
        }
        fldebug!(
            len = self.layout.len(),
            sections = self.headers.len(),
            "update_sections"
        );
    }

    /// Samples `scroll_top` into the geometry. Returns whether this tick counts as fast.
    ///
    /// Direction and the top-reached boundary are tracked on every sample; the fast-scroll
    /// hysteresis only when `hysteresis` is set.
    pub(crate) fn update_viewport_geometry(&mut self, hysteresis: bool) -> bool {
        let position = self.scroll_top;
        if !self.sampled {
            self.sampled = true;
            self.geometry.top_position = position;
        }
        let previous = self.geometry.top_position;
        self.geometry.top_position = position;

        let distance = position as i64 - previous as i64;
        if distance > 0 {
            self.geometry.forward = true;
        } else if distance < 0 {
            self.geometry.forward = false;
        }

        if position == 0 && previous != 0 {
            self.events.push(ListEvent::TopReached);
        }

        if !hysteresis {
            return false;
        }

        let moved = distance.unsigned_abs() as f32;
        let viewport = self.geometry.viewport_height as f32;
        let mut fast = self.fast;
        if !fast && moved > viewport * self.options.fast_enter_viewports {
            fast = true;
        }
        if fast && moved > 0.0 && moved < viewport * self.options.fast_exit_viewports {
            fast = false;
        }
        if fast != self.fast {
            fldebug!(fast, position, "fast scroll");
        }
        self.fast = fast;

        let on_top = position == 0;
        let at_bottom = position >= self.max_scroll();
        fast && !on_top && !at_bottom
    }

    pub(crate) fn handle_scroll(&mut self, offset: u64) {
        self.scroll_top = offset;
        let fast = self.update_viewport_geometry(true);
        self.render(RenderScope::Prerender, false, None, !fast);
        self.last_scroll_ms = self.now_ms;
        if let Lifecycle::Prerendered | Lifecycle::Steady(_) = self.lifecycle {
            self.lifecycle = Lifecycle::Steady(Activity::Scrolling);
        }
    }

    pub(crate) fn scroll_instantly(&mut self, by: i64) {
        let max = self.max_scroll() as i64;
        self.scroll_top = (self.scroll_top as i64).saturating_add(by).clamp(0, max) as u64;
        self.update_viewport_geometry(false);
        self.render(RenderScope::Prerender, false, None, true);
    }

    /// Mounts the window for the current geometry.
    ///
    /// `reload` re-populates elements that stay on their index; `changed` marks the element of
    /// that index as freshly inserted; `detail` populates secondary content.
    pub(crate) fn render(
        &mut self,
        scope: RenderScope,
        reload: bool,
        changed: Option<usize>,
        detail: bool,
    ) {
        let (Some(window), Some(last)) = (
            compute_window(&self.layout, &self.geometry),
            self.layout.last_index(),
        ) else {
            self.window = None;
            self.unmap_where(|_| true);
            return;
        };
        // Records removed since the last pass.
        self.unmap_where(|i| i > last);

        let range = match scope {
            RenderScope::Critical => window.critical,
            RenderScope::Initial => initial_range(&window, &self.geometry, last),
            RenderScope::Prerender => window.prerender,
        };
        self.window = Some(window);

        let edge = leading_edge(&range, self.geometry.forward);
        let mut spare = recyclable(self.pool.mapped().map(|(i, _)| i), &range, edge);

        if self.geometry.forward {
            for i in range.first..=range.last {
                self.render_item(i, &mut spare, reload, changed, detail);
            }
        } else {
            for i in (range.first..=range.last).rev() {
                self.render_item(i, &mut spare, reload, changed, detail);
            }
        }

        // Leftovers outside the range still follow their (possibly shifted) index.
        let unplaced: Vec<(usize, SlotId)> = self
            .pool
            .mapped()
            .filter(|&(i, slot)| {
                self.pool
                    .get(slot)
                    .is_some_and(|item| item.placed != Some(i))
            })
            .collect();
        for (index, slot) in unplaced {
            self.place_item(slot, index, false);
        }

        #[cfg(feature = "tracing")]
        self.trace_viewport(&window, &range);
    }

    #[cfg(feature = "tracing")]
    fn trace_viewport(&self, window: &Window, range: &crate::IndexRange) {
        if !fltrace_enabled!() {
            return;
        }
        let upto = self
            .pool
            .mapped()
            .last()
            .map_or(0, |(i, _)| i + 1)
            .max(range.last + 1);
        let diagram = viewport_diagram(
            |i| self.pool.contains_index(i),
            upto,
            self.geometry.forward,
            &Window {
                critical: window.critical,
                prerender: *range,
            },
        );
        fltrace!(
            top = self.geometry.top_position,
            mounted = self.pool.len(),
            %diagram,
            "render"
        );
    }

    fn render_item(
        &mut self,
        index: usize,
        spare: &mut Vec<usize>,
        reload: bool,
        changed: Option<usize>,
        detail: bool,
    ) {
        let slot = match self.pool.slot_for(index) {
            Some(slot) => {
                if reload {
                    self.drop_detail(slot);
                    self.populate(slot, index);
                }
                slot
            }
            None => {
                let Some(slot) = self.find_item_for(index, spare) else {
                    return;
                };
                self.populate(slot, index);
                if let Some(item) = self.pool.get_mut(slot) {
                    item.style.fresh = changed == Some(index);
                }
                slot
            }
        };

        self.place_item(slot, index, reload);
        if detail {
            self.populate_detail(slot, index);
        }
    }

    fn find_item_for(&mut self, index: usize, spare: &mut Vec<usize>) -> Option<SlotId> {
        while let Some(old) = spare.pop() {
            if let Some(slot) = self.pool.unmap(old) {
                self.drop_detail(slot);
                self.pool.assign(slot, index);
                return Some(slot);
            }
        }

        let idle = self
            .pool
            .iter()
            .find(|(_, item)| item.index.is_none())
            .map(|(slot, _)| slot);
        if let Some(slot) = idle {
            self.pool.assign(slot, index);
            return Some(slot);
        }

        if self.pool.len() < self.geometry.max_item_count {
            let element = self.source.create_item();
            let slot = self.pool.attach(element);
            if let Some(item) = self.pool.get_mut(slot) {
                item.style.editing = self.editing;
            }
            self.pool.assign(slot, index);
            return Some(slot);
        }

        flwarn!(
            index,
            max_item_count = self.geometry.max_item_count,
            "missing a cell: pool saturated and nothing recyclable"
        );
        None
    }

    fn populate(&mut self, slot: SlotId, index: usize) {
        let Some(item) = self.pool.get_mut(slot) else {
            return;
        };
        let stamp = PopulateStamp {
            slot,
            index,
            generation: item.generation,
        };
        let result = self.source.populate_item(&mut item.element, index, stamp);
        item.populated = result == Population::Ready;
    }

    fn populate_detail(&mut self, slot: SlotId, index: usize) {
        let Some(item) = self.pool.get_mut(slot) else {
            return;
        };
        if !item.detail {
            self.source.populate_item_detail(&mut item.element, index);
            item.detail = true;
        }
    }

    fn drop_detail(&mut self, slot: SlotId) {
        let Some(item) = self.pool.get_mut(slot) else {
            return;
        };
        if item.detail {
            self.source.unpopulate_item_detail(&mut item.element);
            item.detail = false;
        }
    }

    fn place_item(&mut self, slot: SlotId, index: usize, reload: bool) {
        let position = self.layout.position_for_index(index);
        let section = self.layout.section_of(index);
        let Some(item) = self.pool.get_mut(slot) else {
            return;
        };
        if item.placed == Some(index) && !reload {
            return;
        }
        item.position = position;
        item.placed = Some(index);
        item.section = section;
        if item.tweak == 0 {
            item.motion = None;
        }
    }

    fn unmap_where(&mut self, mut pred: impl FnMut(usize) -> bool) {
        let doomed: Vec<usize> = self
            .pool
            .mapped()
            .map(|(i, _)| i)
            .filter(|&i| pred(i))
            .collect();
        for index in doomed {
            if let Some(slot) = self.pool.unmap(index) {
                self.drop_detail(slot);
                if let Some(item) = self.pool.get_mut(slot) {
                    item.placed = None;
                }
            }
        }
    }

    /// Recomputes the budget for a new viewport height and trims the pool to it.
    pub(crate) fn resize(&mut self) {
        self.update_container_geometry();
        self.render(RenderScope::Prerender, false, None, !self.fast);
        if let Some(window) = self.window {
            let keep = window.prerender;
            self.unmap_where(|i| !keep.contains(i));
        }
        let surplus = self.pool.shrink_to(self.geometry.max_item_count);
        if !surplus.is_empty() {
            fldebug!(released = surplus.len(), "resize: pool trimmed");
        }
        self.released.extend(surplus);
    }

    /// Re-runs population for a stamp handed out earlier.
    ///
    /// Returns `false` when the element was reused since the stamp was issued.
    pub(crate) fn complete_population(&mut self, stamp: PopulateStamp) -> bool {
        let current = self.pool.get(stamp.slot).and_then(|item| {
            let valid = item.generation == stamp.generation && !item.populated;
            valid.then_some(item.index).flatten()
        });
        let Some(index) = current else {
            fldebug!(?stamp, "stale population discarded");
            return false;
        };

        self.populate(stamp.slot, index);
        let populated = self.pool.get(stamp.slot).is_some_and(|item| item.populated);
        if populated {
            // Shown as unpopulated until the reveal runs.
            if let Some(item) = self.pool.get_mut(stamp.slot) {
                item.populated = false;
            }
            let reveal = self.scheduler.transition(
                Task::List(ListTask::RevealPopulated {
                    slot: stamp.slot,
                    generation: stamp.generation,
                }),
                Target::Item(stamp.slot),
                CompletionEvent::TransitionEnd,
            );
            self.scheduler.join(
                &[reveal],
                Task::List(ListTask::ClearTransition { slot: stamp.slot }),
            );
        }
        true
    }

    /// Moves the record at `from` to `to` through the data source and re-renders.
    pub(crate) fn commit_move(&mut self, from: usize, to: usize) -> bool {
        let section = self.source.section_for(from);
        let Some(record) = self.source.remove_at_index(from) else {
            fldebug!(from, "commit_move: no record");
            return false;
        };
        self.source.insert_at_index(to, record, section.as_ref());

        self.pool.remap(|i| {
            Some(if i == from {
                to
            } else if from < to && i > from && i <= to {
                i - 1
            } else if to < from && i >= to && i < from {
                i + 1
            } else {
                i
            })
        });
        for (_, item) in self.pool.iter_mut() {
            item.set_tweak(0);
            item.style.transition = None;
            item.motion = None;
        }

        self.update_sections();
        self.update_list_height();
        self.render(RenderScope::Prerender, false, None, true);
        fldebug!(from, to, "commit_move");
        true
    }

    pub(crate) fn visual_offset(item: &MountedItem<S::Element>, now_ms: u64) -> i64 {
        match item.motion {
            Some(tween) if !tween.is_done(now_ms) => tween.sample(now_ms),
            _ => item.offset(),
        }
    }

    fn start_motion(&mut self, slot: SlotId, tweak: i64, transition: Transition) {
        let now = self.now_ms;
        let Some(item) = self.pool.get_mut(slot) else {
            return;
        };
        let from = Self::visual_offset(item, now);
        item.set_tweak(tweak);
        item.style.transition = Some(transition);
        item.motion = Some(Tween::new(
            from,
            item.offset(),
            now,
            transition.duration_ms,
            transition.easing,
        ));
    }

    pub(crate) fn run(&mut self, task: ListTask) -> Settle {
        match task {
            ListTask::Phase1 => {
                self.update_container_geometry();
                let surplus = self.pool.shrink_to(self.geometry.max_item_count);
                if !surplus.is_empty() {
                    fldebug!(
                        released = surplus.len(),
                        "phase 1: seeded elements over budget"
                    );
                }
                self.released.extend(surplus);
                self.update_sections();
                self.update_list_height();
                // Restored before the scroll channel is attached: no self-triggered event.
                self.scroll_top = self.options.initial_scroll_top.min(self.max_scroll());
                self.geometry.top_position = self.scroll_top;
                self.render(RenderScope::Critical, false, None, true);
                self.events.push(ListEvent::Rendered);
                self.lifecycle = Lifecycle::InitialRender;
                self.scheduler.attach_direct(Channel::Scroll);
                fldebug!(
                    scroll_top = self.scroll_top,
                    mounted = self.pool.len(),
                    "phase 1: critical window rendered"
                );
            }
            ListTask::Phase2 => {
                self.render(RenderScope::Initial, false, None, true);
                self.events.push(ListEvent::Complete);
                self.lifecycle = Lifecycle::Prerendered;
                fldebug!(mounted = self.pool.len(), "phase 2: prerender complete");
            }
            ListTask::ReloadData => {
                self.update_sections();
                self.update_list_height();
                self.scroll_top = self.scroll_top.min(self.max_scroll());
                self.geometry.top_position = self.scroll_top;
                self.render(RenderScope::Prerender, true, None, true);
            }
            ListTask::InsertOnTop { keep_scroll } => {
                self.pool.remap(|i| Some(i + 1));
                self.update_sections();
                self.update_list_height();
                if keep_scroll {
                    self.scroll_instantly(self.geometry.item_height as i64);
                    self.events.push(ListEvent::HiddenNewContent);
                } else {
                    self.render(RenderScope::Prerender, false, Some(0), true);
                }
            }
            ListTask::PushDown => {
                let slots = self.pool.slot_ids();
                let Some(&first) = slots.first() else {
                    return Settle::Now;
                };
                let transition = Transition::transform(self.options.push_down_ms, Easing::EaseIn);
                let shift = self.geometry.item_height as i64;
                for slot in slots {
                    self.start_motion(slot, shift, transition);
                }
                return Settle::Wait(Await {
                    target: Target::Item(first),
                    event: CompletionEvent::TransitionEnd,
                });
            }
            ListTask::CleanInlineStyles => {
                for (_, item) in self.pool.iter_mut() {
                    item.style.transition = None;
                    item.set_tweak(0);
                    item.motion = None;
                }
            }
            ListTask::RevealNew => {
                let transition =
                    Transition::opacity(self.options.new_item_reveal_ms, Easing::EaseOut);
                let fresh = self
                    .pool
                    .iter_mut()
                    .find(|(_, item)| item.style.fresh)
                    .map(|(slot, item)| {
                        item.style.transition = Some(transition);
                        item.style.fresh = false;
                        slot
                    });
                return match fresh {
                    Some(slot) => Settle::Wait(Await {
                        target: Target::Item(slot),
                        event: CompletionEvent::TransitionEnd,
                    }),
                    None => Settle::Now,
                };
            }
            ListTask::FinishInsert => {
                self.container.reordering = false;
                for (_, item) in self.pool.iter_mut() {
                    if item
                        .style
                        .transition
                        .is_some_and(|t| t.property == TransitionProperty::Opacity)
                    {
                        item.style.transition = None;
                    }
                }
            }
            ListTask::EditStyles { editing } => {
                let overlay = if editing {
                    OverlayAnim::Reveal
                } else {
                    OverlayAnim::Hide
                };
                for (_, item) in self.pool.iter_mut() {
                    item.style.editing = editing;
                    item.style.overlay = Some(overlay);
                }
            }
            ListTask::RevealPopulated { slot, generation } => {
                let transition = Transition::opacity(self.options.reveal_ms, Easing::Linear);
                let Some(item) = self
                    .pool
                    .get_mut(slot)
                    .filter(|item| item.generation == generation)
                else {
                    return Settle::Now;
                };
                item.style.transition = Some(transition);
                item.populated = true;
            }
            ListTask::Tweak {
                slot,
                tweak,
                transition,
            } => {
                self.start_motion(slot, tweak, transition);
            }
            ListTask::ClearTransition { slot } => {
                if let Some(item) = self.pool.get_mut(slot) {
                    item.style.transition = None;
                    item.motion = None;
                }
            }
        }
        Settle::AsScheduled
    }

    pub(crate) fn destroy(&mut self) {
        self.scheduler.clear();
        let items = self.pool.clear();
        self.released.extend(items);
        self.released
            .extend(self.headers.drain(..).map(|header| header.element));
        self.window = None;
        self.lifecycle = Lifecycle::Destroyed;
        fldebug!("destroyed");
    }
}
