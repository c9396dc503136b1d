use crate::*;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Cell {
    id: u32,
    content: Option<u32>,
    detail: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Populate(usize),
    Detail(usize),
    Undetail,
    Remove(usize),
    Insert(usize, Option<&'static str>),
}

/// In-memory data source that records what the list asks of it.
#[derive(Debug)]
struct TestSource {
    records: Vec<(&'static str, u32)>,
    sectioned: bool,
    item_height: u32,
    header_height: u32,
    viewport: Option<u32>,
    pending: bool,
    created: u32,
    sections_created: u32,
    stamps: Vec<PopulateStamp>,
    calls: Vec<Call>,
}

impl TestSource {
    fn flat(len: usize) -> Self {
        Self {
            records: (0..len as u32).map(|id| ("", id)).collect(),
            sectioned: false,
            item_height: 64,
            header_height: 0,
            viewport: None,
            pending: false,
            created: 0,
            sections_created: 0,
            stamps: Vec::new(),
            calls: Vec::new(),
        }
    }

    fn sectioned(spans: &[(&'static str, usize)], header_height: u32) -> Self {
        let mut records = Vec::new();
        let mut id = 0;
        for &(key, n) in spans {
            for _ in 0..n {
                records.push((key, id));
                id += 1;
            }
        }
        Self {
            records,
            sectioned: true,
            header_height,
            ..Self::flat(0)
        }
    }

    fn id_at(&self, index: usize) -> u32 {
        self.records[index].1
    }
}

impl DataSource for TestSource {
    type Element = Cell;
    type Section = &'static str;
    type Record = (&'static str, u32);

    fn full_length(&self) -> usize {
        self.records.len()
    }

    fn item_height(&self) -> u32 {
        self.item_height
    }

    fn section_header_height(&self) -> u32 {
        self.header_height
    }

    fn sections(&self) -> Vec<&'static str> {
        if !self.sectioned {
            return Vec::new();
        }
        let mut keys: Vec<&'static str> = Vec::new();
        for &(key, _) in &self.records {
            if keys.last() != Some(&key) {
                keys.push(key);
            }
        }
        keys
    }

    fn section_length(&self, section: &&'static str) -> usize {
        self.records.iter().filter(|(k, _)| k == section).count()
    }

    fn section_for(&self, index: usize) -> Option<&'static str> {
        if !self.sectioned {
            return None;
        }
        self.records.get(index).map(|&(k, _)| k)
    }

    fn record_at(&self, index: usize) -> Option<&(&'static str, u32)> {
        self.records.get(index)
    }

    fn viewport_height(&self) -> Option<u32> {
        self.viewport
    }

    fn create_item(&mut self) -> Cell {
        self.created += 1;
        Cell {
            id: self.created,
            content: None,
            detail: None,
        }
    }

    fn create_section(&mut self) -> Cell {
        self.sections_created += 1;
        Cell {
            id: 10_000 + self.sections_created,
            content: None,
            detail: None,
        }
    }

    fn populate_item(
        &mut self,
        element: &mut Cell,
        index: usize,
        stamp: PopulateStamp,
    ) -> Population {
        self.calls.push(Call::Populate(index));
        if self.pending {
            self.stamps.push(stamp);
            element.content = None;
            return Population::Pending;
        }
        element.content = Some(self.id_at(index));
        Population::Ready
    }

    fn populate_section(&mut self, element: &mut Cell, _section: &&'static str, ordinal: usize) {
        element.content = Some(ordinal as u32);
    }

    fn populate_item_detail(&mut self, element: &mut Cell, index: usize) {
        self.calls.push(Call::Detail(index));
        element.detail = Some(index);
    }

    fn unpopulate_item_detail(&mut self, element: &mut Cell) {
        self.calls.push(Call::Undetail);
        element.detail = None;
    }

    fn insert_at_index(
        &mut self,
        index: usize,
        record: (&'static str, u32),
        section: Option<&&'static str>,
    ) {
        self.calls.push(Call::Insert(index, section.copied()));
        let key = section.copied().unwrap_or(record.0);
        self.records.insert(index, (key, record.1));
    }

    fn replace_at_index(
        &mut self,
        index: usize,
        record: (&'static str, u32),
    ) -> Option<(&'static str, u32)> {
        let slot = self.records.get_mut(index)?;
        Some(core::mem::replace(slot, record))
    }

    fn remove_at_index(&mut self, index: usize) -> Option<(&'static str, u32)> {
        self.calls.push(Call::Remove(index));
        (index < self.records.len()).then(|| self.records.remove(index))
    }
}

// 1000 records, 64px items, 480px viewport: 7.5 items per screen, a 21 item budget.
fn list_1000() -> FastList<TestSource> {
    FastList::new(TestSource::flat(1000), FastListOptions::new(480))
}

fn mapped(list: &FastList<TestSource>) -> Vec<usize> {
    list.pool().mapped().map(|(i, _)| i).collect()
}

fn assert_rendered(list: &FastList<TestSource>, first: usize, last: usize) {
    assert_eq!(mapped(list), (first..=last).collect::<Vec<_>>());
    for i in first..=last {
        let item = list.pool().item_at(i).unwrap();
        let position = list.layout().position_for_index(i);
        assert_eq!(item.position(), position, "index {i}");
        let id = list.source().id_at(i);
        assert_eq!(item.element().content, Some(id), "index {i}");
    }
}

fn assert_pool_invariants(list: &FastList<TestSource>) {
    let pool = list.pool();
    assert!(pool.len() <= list.geometry().max_item_count);
    assert!(pool.mapped_len() <= pool.len());
    for (index, slot) in pool.mapped() {
        assert_eq!(pool.get(slot).unwrap().index(), Some(index));
    }
    let mut slots: Vec<SlotId> = pool.mapped().map(|(_, s)| s).collect();
    slots.sort();
    slots.dedup();
    assert_eq!(slots.len(), pool.mapped_len());
}

#[test]
fn budget_follows_items_per_screen() {
    let mut geo = Geometry::new(64, 0);
    geo.update_container(480, 2.8, 2);
    assert_eq!(geo.max_item_count, 21);
    assert_eq!(geo.switch_window, 3);

    geo.update_container(240, 2.8, 2);
    assert_eq!(geo.max_item_count, 10);
    assert_eq!(geo.switch_window, 1);

    // A tiny multiplier still covers one viewport plus both partial edges.
    geo.update_container(480, 0.5, 2);
    assert_eq!(geo.max_item_count, 9);
}

#[test]
fn layout_round_trips_flat_and_sectioned() {
    let flat = SectionLayout::flat(1000, 64);
    assert_eq!(flat.full_height(), 64_000);
    assert_eq!(flat.index_at_position(1200), 18);
    assert_eq!(flat.index_at_position(1_000_000), 999);
    for i in 0..1000 {
        assert_eq!(flat.index_at_position(flat.position_for_index(i)), i);
    }

    let mut rng = Lcg::new(0x5eed);
    for _ in 0..50 {
        let sections = rng.gen_range_usize(1, 8);
        let spans: Vec<usize> = (0..sections).map(|_| rng.gen_range_usize(1, 40)).collect();
        let item = rng.gen_range_u64(1, 100) as u32;
        let header = rng.gen_range_u64(0, 50) as u32;
        let layout = SectionLayout::sectioned(spans.clone(), item, header);

        let expected: u64 = spans
            .iter()
            .map(|&n| header as u64 + n as u64 * item as u64)
            .sum();
        assert_eq!(layout.full_height(), expected);

        for i in 0..layout.len() {
            let pos = layout.position_for_index(i);
            assert_eq!(layout.index_at_position(pos), i);
            assert_eq!(layout.index_at_position(pos + item as u64 - 1), i);
        }
        for ordinal in 0..sections {
            // A header belongs to the first item of its section.
            let top = layout.section_top(ordinal);
            assert_eq!(layout.index_at_position(top), layout.section_start(ordinal));
        }
    }
}

#[test]
fn empty_layout_is_harmless() {
    let layout = SectionLayout::flat(0, 64);
    assert_eq!(layout.full_height(), 0);
    assert_eq!(layout.index_at_position(500), 0);
    assert_eq!(layout.last_index(), None);

    let list = FastList::new(TestSource::flat(0), FastListOptions::new(480));
    assert!(list.pool().is_empty());
    assert_eq!(list.window(), None);
    assert_eq!(list.lifecycle(), Lifecycle::Prerendered);
}

#[test]
fn recyclable_pops_furthest_from_demand_first() {
    let keep = IndexRange::new(15, 35);
    let mut spare = recyclable(0..21, &keep, 35);
    assert_eq!(spare.len(), 15);
    assert_eq!(spare.pop(), Some(0));
    assert_eq!(spare.pop(), Some(1));
    assert_eq!(spare.first(), Some(&14));

    let mut spare = recyclable([27, 28, 29, 30, 31, 5], &IndexRange::new(6, 26), 6);
    assert_eq!(spare.pop(), Some(31));
    assert_eq!(spare.first(), Some(&5));
}

#[test]
fn viewport_diagram_marks_windows() {
    let window = Window {
        critical: IndexRange::new(2, 3),
        prerender: IndexRange::new(1, 4),
    };
    let s = viewport_diagram(|i| (1..=4).contains(&i), 6, true, &window);
    assert_eq!(s, String::from("[v]-|x[xx]x|-"));
}

#[test]
fn initial_render_mounts_a_whole_budget() {
    let mut list = list_1000();

    assert_eq!(list.geometry().max_item_count, 21);
    assert_eq!(list.pool().len(), 21);
    assert_eq!(list.source().created, 21);
    assert_rendered(&list, 0, 20);

    assert_eq!(list.lifecycle(), Lifecycle::Prerendered);
    assert!(list.is_resolved(list.rendered()));
    assert!(list.is_resolved(list.complete()));
    assert_eq!(
        list.drain_events(),
        vec![ListEvent::Rendered, ListEvent::Complete]
    );

    let container = list.container();
    assert_eq!(container.overflow_x, Overflow::Hidden);
    assert_eq!(container.overflow_y, Overflow::Scroll);
    assert_eq!(container.list_height, 64_000);
    assert!(list.scheduler().is_attached(Channel::Scroll));
}

#[test]
fn scrolling_renders_ahead_then_behind() {
    let mut list = list_1000();

    list.on_scroll(1200, 0);
    assert!(!list.is_fast_scrolling());
    assert_rendered(&list, 15, 35);
    assert_eq!(list.pool().len(), 21);
    assert_eq!(list.source().created, 21);

    list.on_scroll(1024, 16);
    assert_eq!(list.geometry().direction(), ScrollDirection::Backward);
    assert_rendered(&list, 6, 26);
    assert_eq!(list.source().created, 21);
}

#[test]
fn fast_scroll_defers_detail_until_it_slows_down() {
    let mut list = list_1000();
    list.on_scroll(1200, 0);
    for i in 15..=35 {
        assert!(list.pool().item_at(i).unwrap().is_detail_populated());
    }

    list.on_scroll(2400, 16);
    assert!(list.is_fast_scrolling());
    assert_eq!(mapped(&list), (34..=54).collect::<Vec<_>>());
    for i in 36..=54 {
        let item = list.pool().item_at(i).unwrap();
        assert!(!item.is_detail_populated(), "index {i}");
        assert_eq!(item.position(), i as u64 * 64);
    }

    list.on_scroll(2880, 32);
    assert!(list.is_fast_scrolling());

    list.on_scroll(3119, 48);
    assert!(!list.is_fast_scrolling());
    assert_rendered(&list, 45, 65);
    for i in 45..=65 {
        let item = list.pool().item_at(i).unwrap();
        assert!(item.is_detail_populated(), "index {i}");
        assert_eq!(item.element().detail, Some(i));
    }
}

#[test]
fn fast_scroll_is_ignored_at_the_boundaries() {
    let mut list = list_1000();
    list.on_scroll(3000, 0);
    list.on_scroll(0, 16);
    // Classified fast, but on top: full render.
    assert!(list.is_fast_scrolling());
    let window = list.window().unwrap().prerender;
    assert_eq!(window, IndexRange::new(0, 10));
    for i in window.first..=window.last {
        let item = list.pool().item_at(i).unwrap();
        assert!(item.is_detail_populated(), "index {i}");
    }
}

#[test]
fn returning_to_top_emits_once() {
    let mut list = list_1000();
    list.drain_events();

    list.on_scroll(300, 0);
    list.on_scroll(0, 16);
    list.on_scroll(0, 32);
    assert_eq!(list.drain_events(), vec![ListEvent::TopReached]);
}

#[test]
fn round_trip_scroll_restores_the_critical_window() {
    let mut list = list_1000();
    list.on_scroll(1200, 0);
    let before = list.window().unwrap().critical;

    list.on_scroll(1500, 16);
    list.on_scroll(1200, 32);

    let after = list.window().unwrap().critical;
    assert_eq!(before, after);
    for i in after.first..=after.last {
        let item = list.pool().item_at(i).unwrap();
        assert_eq!(item.position(), i as u64 * 64);
        assert_eq!(item.tweak(), 0);
    }
}

#[test]
fn scroll_instantly_bypasses_hysteresis() {
    let mut list = list_1000();
    list.on_scroll(1200, 0);

    list.scroll_instantly(-176);
    assert_eq!(list.scroll_top(), 1024);
    assert_rendered(&list, 6, 26);

    list.scroll_instantly(10_000);
    assert_eq!(list.scroll_top(), 10_000 + 1024);
    assert!(!list.is_fast_scrolling());

    list.scroll_instantly(i64::MAX);
    assert_eq!(list.scroll_top(), 64_000 - 480);
}

#[test]
fn random_scrolling_keeps_the_pool_bounded() {
    let mut rng = Lcg::new(42);
    let source = TestSource::sectioned(&[("a", 7), ("b", 130), ("c", 1), ("d", 400)], 24);
    let mut list = FastList::new(source, FastListOptions::new(480));
    let max = list.layout().full_height() - 480;

    let mut now = 0;
    for _ in 0..400 {
        let offset = match rng.gen_range_usize(0, 4) {
            0 => rng.gen_range_u64(0, max + 1),
            1 => list.scroll_top().saturating_add(rng.gen_range_u64(0, 200)).min(max),
            2 => list.scroll_top().saturating_sub(rng.gen_range_u64(0, 200)),
            _ => 0,
        };
        now += 16;
        list.on_scroll(offset, now);
        assert_pool_invariants(&list);

        let critical = list.window().unwrap().critical;
        for i in critical.first..=critical.last {
            let item = list.pool().item_at(i).unwrap();
            assert_eq!(item.position(), list.layout().position_for_index(i));
            assert_eq!(item.element().content, Some(list.source().id_at(i)));
        }
    }
}

#[test]
fn sections_are_rendered_with_their_heights() {
    let source = TestSource::sectioned(&[("a", 3), ("b", 5), ("c", 200)], 20);
    let list = FastList::new(source, FastListOptions::new(480));

    let headers = list.sections();
    assert_eq!(headers.len(), 3);
    assert_eq!(*headers[1].key(), "b");
    assert_eq!(headers[1].top(), 20 + 3 * 64);
    assert_eq!(headers[1].height(), 20 + 5 * 64);
    assert_eq!(headers[2].element().content, Some(2));

    let item = list.pool().item_at(3).unwrap();
    assert_eq!(item.position(), 20 + 3 * 64 + 20);
    assert_eq!(item.section(), Some(1));
    assert_eq!(list.container().list_height, 3 * 20 + 208 * 64);
}

#[test]
fn reload_keeps_the_offset_and_repopulates() {
    let mut list = list_1000();
    list.on_scroll(1200, 0);

    for record in list.source_mut().records.iter_mut() {
        record.1 += 5000;
    }
    list.source_mut().records.truncate(800);
    let ticket = list.reload_data();

    assert!(list.is_resolved(ticket));
    assert_eq!(list.rendered(), ticket);
    assert_eq!(list.scroll_top(), 1200);
    assert_eq!(list.container().list_height, 800 * 64);
    assert_rendered(&list, 15, 35);
    let item = list.pool().item_at(20).unwrap();
    assert_eq!(item.element().content, Some(5020));
}

#[test]
fn reload_after_shrinking_drops_stale_indexes() {
    let mut list = list_1000();
    list.on_scroll(1200, 0);

    list.source_mut().records.truncate(20);
    list.reload_data();

    assert_eq!(list.scroll_top(), 20 * 64 - 480);
    assert!(mapped(&list).iter().all(|&i| i < 20));
    assert_pool_invariants(&list);
}

#[test]
fn insert_on_top_pushes_down_then_reveals() {
    let mut list = list_1000();
    list.drain_events();

    list.source_mut().records.insert(0, ("", 7777));
    assert_eq!(list.inserted_at_index(0), InsertOutcome::Animated);

    assert!(list.container().reordering);
    for (_, item) in list.pool().iter() {
        assert_eq!(item.tweak(), 64);
        assert_eq!(
            item.style().transition,
            Some(Transition::transform(150, Easing::EaseIn))
        );
    }
    // Nothing shifted yet.
    assert_eq!(list.pool().item_at(0).unwrap().element().content, Some(0));

    let first = list.pool().slot_ids()[0];
    list.transition_end(Target::Item(first));

    let fresh = list.pool().slot_for(0).unwrap();
    let item = list.pool().get(fresh).unwrap();
    assert_eq!(item.element().content, Some(7777));
    assert_eq!(
        item.style().transition,
        Some(Transition::opacity(250, Easing::EaseOut))
    );
    assert!(!item.style().fresh);
    assert!(list.pool().iter().all(|(_, item)| item.tweak() == 0));
    assert_rendered(&list, 0, 20);
    assert!(list.container().reordering);

    list.transition_end(Target::Item(fresh));
    assert!(!list.container().reordering);
    assert_eq!(list.pool().get(fresh).unwrap().style().transition, None);
    assert!(list.drain_events().is_empty());
}

#[test]
fn insert_on_top_survives_dropped_transition_events() {
    let mut list = list_1000();
    list.source_mut().records.insert(0, ("", 7777));
    assert_eq!(list.inserted_at_index(0), InsertOutcome::Animated);

    list.tick(499);
    assert!(list.container().reordering);
    assert_eq!(list.pool().item_at(0).unwrap().element().content, Some(0));

    list.tick(500);
    let top = list.pool().item_at(0).unwrap();
    assert_eq!(top.element().content, Some(7777));
    list.tick(1000);
    assert!(!list.container().reordering);
    assert_eq!(list.scheduler().outstanding(), 0);
}

#[test]
fn insert_while_scrolled_is_silent() {
    let mut list = list_1000();
    list.on_scroll(1200, 0);
    list.drain_events();

    list.source_mut().records.insert(0, ("", 7777));
    assert_eq!(list.inserted_at_index(0), InsertOutcome::Silent);

    assert_eq!(list.scroll_top(), 1264);
    assert_eq!(list.drain_events(), vec![ListEvent::HiddenNewContent]);
    assert_eq!(list.container().list_height, 1001 * 64);
    assert_rendered(&list, 16, 36);
    for (_, item) in list.pool().iter() {
        assert!(item.style().transition.is_none());
    }
}

#[test]
fn insert_in_edit_mode_is_silent() {
    let mut list = list_1000();
    list.toggle_edit_mode();
    list.source_mut().records.insert(0, ("", 7777));
    assert_eq!(list.inserted_at_index(0), InsertOutcome::Silent);
    assert_eq!(list.scroll_top(), 64);
}

#[test]
fn insert_elsewhere_is_unsupported() {
    let mut list = list_1000();
    assert_eq!(list.inserted_at_index(3), InsertOutcome::Unsupported);
    assert_rendered(&list, 0, 20);
}

#[test]
fn pending_population_is_revealed_or_discarded() {
    let mut source = TestSource::flat(1000);
    source.pending = true;
    let mut list = FastList::new(source, FastListOptions::new(480));

    assert_eq!(list.source().stamps.len(), 21);
    assert!(list.pool().iter().all(|(_, item)| !item.is_populated()));

    list.source_mut().pending = false;
    let stamp = list.source().stamps[3];
    assert_eq!(stamp.index, 3);
    assert!(list.complete_population(stamp));

    let item = list.pool().get(stamp.slot).unwrap();
    assert!(item.is_populated());
    assert_eq!(item.element().content, Some(3));
    assert_eq!(
        item.style().transition,
        Some(Transition::opacity(200, Easing::Linear))
    );
    list.transition_end(Target::Item(stamp.slot));
    let item = list.pool().get(stamp.slot).unwrap();
    assert_eq!(item.style().transition, None);

    // Already populated.
    assert!(!list.complete_population(stamp));

    // The element of index 5 is reused far away: its stamp is stale.
    let stale = list.source().stamps[5];
    list.on_scroll(3000, 0);
    let reused = list.pool().get(stale.slot).unwrap();
    assert_ne!(reused.index(), Some(5));
    let shown = reused.element().content;
    assert!(!list.complete_population(stale));
    let item = list.pool().get(stale.slot).unwrap();
    assert_eq!(item.element().content, shown);
}

#[test]
fn edit_mode_toggles_item_styles() {
    let mut list = list_1000();

    let ticket = list.toggle_edit_mode();
    assert!(list.editing());
    assert!(!list.is_resolved(ticket));
    for (_, item) in list.pool().iter() {
        assert!(item.style().editing);
        assert_eq!(item.style().overlay, Some(OverlayAnim::Reveal));
    }
    list.animation_end(Target::Container);
    assert!(list.is_resolved(ticket));

    list.toggle_edit_mode();
    assert!(!list.editing());
    for (_, item) in list.pool().iter() {
        assert!(!item.style().editing);
        assert_eq!(item.style().overlay, Some(OverlayAnim::Hide));
    }
}

#[test]
fn click_selects_outside_of_edit_mode() {
    let mut list = list_1000();
    list.drain_events();
    let slot = list.pool().slot_for(4).unwrap();
    let pointer = PointerEvent::mouse(PointerKind::Up, PointerTarget::Item(slot), 300);

    assert!(list.click(slot, pointer));
    assert_eq!(
        list.drain_events(),
        vec![ListEvent::ItemSelected { index: 4, pointer }]
    );

    list.toggle_edit_mode();
    assert!(!list.click(slot, pointer));
    assert!(list.drain_events().is_empty());
}

#[test]
fn frame_aligned_scheduler_defers_and_coalesces() {
    let mut list = FastList::with_scheduler(
        TestSource::flat(1000),
        FastListOptions::new(480),
        Scheduler::frame_aligned(),
    );
    assert_eq!(list.lifecycle(), Lifecycle::Constructing);
    assert!(list.pool().is_empty());

    // The scroll channel is not attached before the first frame.
    list.on_scroll(500, 0);
    list.frame(16);
    assert_eq!(list.scroll_top(), 0);
    assert_rendered(&list, 0, 20);
    assert_eq!(
        list.drain_events(),
        vec![ListEvent::Rendered, ListEvent::Complete]
    );

    list.on_scroll(100, 20);
    list.on_scroll(1200, 24);
    assert_rendered(&list, 0, 20);

    list.frame(32);
    assert_eq!(list.scroll_top(), 1200);
    assert_rendered(&list, 15, 35);
}

#[test]
fn initial_scroll_top_is_restored_without_a_scroll_event() {
    let options = FastListOptions::new(480).with_initial_scroll_top(1200);
    let mut list = FastList::new(TestSource::flat(1000), options);

    assert_eq!(list.scroll_top(), 1200);
    assert_eq!(list.window().unwrap().critical, IndexRange::new(18, 26));
    assert_eq!(list.pool().len(), 21);
    assert!(list.pool().contains_index(18));

    // The first sample carries no velocity.
    list.on_scroll(1200, 0);
    assert!(!list.is_fast_scrolling());
}

#[test]
fn source_viewport_height_wins() {
    let mut source = TestSource::flat(1000);
    source.viewport = Some(240);
    let list = FastList::new(source, FastListOptions::new(480));
    assert_eq!(list.geometry().viewport_height, 240);
    assert_eq!(list.geometry().max_item_count, 10);
}

#[test]
fn seeded_elements_are_used_before_creating() {
    let elements = (0..21)
        .map(|id| Cell {
            id: 500 + id,
            content: None,
            detail: None,
        })
        .collect();
    let list = FastList::with_elements(
        TestSource::flat(1000),
        FastListOptions::new(480),
        Scheduler::immediate(),
        elements,
    );
    assert_eq!(list.source().created, 0);
    assert_rendered(&list, 0, 20);
}

#[test]
fn seeded_elements_over_budget_are_released() {
    let elements = (0..40)
        .map(|id| Cell {
            id: 500 + id,
            content: None,
            detail: None,
        })
        .collect();
    let mut list = FastList::with_elements(
        TestSource::flat(1000),
        FastListOptions::new(480),
        Scheduler::immediate(),
        elements,
    );
    assert_eq!(list.geometry().max_item_count, 21);
    assert_eq!(list.pool().len(), 21);
    assert_eq!(list.drain_released().len(), 19);
    assert_eq!(list.source().created, 0);
    assert_rendered(&list, 0, 20);

    list.on_scroll(1200, 0);
    assert!(list.pool().len() <= list.geometry().max_item_count);
    assert_eq!(list.source().created, 0);
    assert_pool_invariants(&list);
}

#[test]
fn resize_trims_the_pool() {
    let mut list = list_1000();
    list.on_resize(240);

    assert_eq!(list.geometry().max_item_count, 10);
    assert!(list.pool().len() <= 10);
    assert_eq!(list.drain_released().len(), 11);
    assert_pool_invariants(&list);
    assert!(list.pool().contains_index(0));
    assert!(list.pool().contains_index(3));

    list.on_resize(960);
    assert_eq!(list.geometry().max_item_count, 42);
    assert_pool_invariants(&list);
}

#[test]
fn activity_settles_into_idle() {
    let mut list = list_1000();
    list.on_scroll(100, 1000);
    assert_eq!(list.lifecycle(), Lifecycle::Steady(Activity::Scrolling));

    list.tick(1149);
    assert_eq!(list.lifecycle(), Lifecycle::Steady(Activity::Scrolling));
    list.tick(1150);
    assert_eq!(list.lifecycle(), Lifecycle::Steady(Activity::Idle));
}

#[test]
fn replace_child_swaps_the_element() {
    let mut list = list_1000();
    let slot = list.pool().slot_for(2).unwrap();
    let replacement = Cell {
        id: 999,
        content: Some(2),
        detail: None,
    };

    let old = list.replace_child(slot, replacement).unwrap();
    assert_eq!(old.content, Some(2));
    assert_eq!(list.pool().item_at(2).unwrap().element().id, 999);
}

#[test]
fn destroy_is_terminal() {
    let mut list = list_1000();
    list.destroy();

    assert_eq!(list.lifecycle(), Lifecycle::Destroyed);
    assert!(list.pool().is_empty());
    assert_eq!(list.drain_released().len(), 21);
    assert!(!list.scheduler().is_attached(Channel::Scroll));

    list.on_scroll(1200, 0);
    list.render();
    assert_eq!(list.scroll_top(), 0);
    assert!(list.pool().is_empty());
    assert_eq!(list.inserted_at_index(0), InsertOutcome::Unsupported);
}

#[test]
fn tween_samples_offsets() {
    let tween = Tween::new(0, 100, 1000, 200, Easing::Linear);
    assert_eq!(tween.sample(900), 0);
    assert_eq!(tween.sample(1100), 50);
    assert_eq!(tween.sample(1200), 100);
    assert!(tween.is_done(1200));

    let down = Tween::new(0, -64, 0, 150, Easing::EaseIn);
    assert!(down.sample(75) > -64 / 2);
    assert_eq!(down.sample(150), -64);
}

#[test]
fn scheduler_joins_and_times_out() {
    use crate::scheduler::Task;
    use crate::engine::ListTask;

    let mut s = Scheduler::immediate();
    let a = s.transition(
        Task::List(ListTask::CleanInlineStyles),
        Target::Container,
        CompletionEvent::AnimationEnd,
    );
    let b = s.feedback(
        Task::List(ListTask::CleanInlineStyles),
        Target::Item(SlotId(1)),
        CompletionEvent::TransitionEnd,
    );
    let joined = s.join(&[a, b], Task::List(ListTask::FinishInsert));

    let job = s.next_job(false).unwrap();
    s.finish(job, 0, 500);
    let job = s.next_job(false).unwrap();
    s.finish(job, 0, 500);
    assert!(s.next_job(false).is_none());
    assert_eq!(s.waiting(), 2);

    let ended = CompletionEvent::AnimationEnd;
    assert!(s.complete(Target::Container, ended));
    assert!(!s.complete(Target::Container, ended));
    assert!(s.is_resolved(a));
    assert!(s.next_job(false).is_none());

    assert_eq!(s.expire(499), 0);
    assert_eq!(s.expire(500), 1);
    let job = s.next_job(false).unwrap();
    assert_eq!(job.ticket, joined);
    s.finish(job, 500, 500);
    assert!(s.is_resolved(joined));
    assert_eq!(s.outstanding(), 0);
}

#[test]
fn detached_channels_drop_events() {
    use crate::scheduler::DirectEvent;

    let scroll = Channel::Scroll;
    let mut s = Scheduler::frame_aligned();
    assert_eq!(s.push_direct(scroll, DirectEvent::Scroll(10)), None);
    assert_eq!(s.take_direct(scroll), None);

    s.attach_direct(scroll);
    assert_eq!(s.push_direct(scroll, DirectEvent::Scroll(10)), None);
    assert_eq!(s.push_direct(scroll, DirectEvent::Scroll(20)), None);
    assert_eq!(s.take_direct(scroll), Some(DirectEvent::Scroll(20)));

    s.detach_direct(Channel::Scroll);
    s.push_direct(Channel::Scroll, DirectEvent::Scroll(30));
    assert_eq!(s.take_direct(Channel::Scroll), None);
}

/// Counts pointer input and arms the pointer-move channel on press.
#[derive(Default)]
struct Recorder {
    downs: usize,
    moves: Vec<i64>,
    resumed: Vec<u32>,
}

impl<S: DataSource> Extension<S> for Recorder {
    fn pointer(&mut self, cx: &mut ListContext<'_, S>, event: &PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down => {
                self.downs += 1;
                let t = cx.mutation(1);
                cx.join(&[t], 2);
                cx.attach_pointer_move();
            }
            PointerKind::Move => self.moves.push(event.y),
            PointerKind::Up => cx.detach_pointer_move(),
        }
        true
    }

    fn resume(&mut self, _cx: &mut ListContext<'_, S>, step: u32) {
        self.resumed.push(step);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn extensions_receive_pointer_input_and_resume_steps() {
    let mut list = list_1000();
    list.plugin(Recorder::default());
    let slot = list.pool().slot_for(1).unwrap();
    let at = |kind, y| PointerEvent::mouse(kind, PointerTarget::Item(slot), y);

    assert!(!list.pointer(at(PointerKind::Move, 10)));
    assert!(list.pointer(at(PointerKind::Down, 10)));
    list.pointer(at(PointerKind::Move, 20));
    list.pointer(at(PointerKind::Move, 30));
    list.pointer(at(PointerKind::Up, 30));
    list.pointer(at(PointerKind::Move, 40));

    let recorder = list.extension::<Recorder>().unwrap();
    assert_eq!(recorder.downs, 1);
    assert_eq!(recorder.moves, vec![20, 30]);
    assert_eq!(recorder.resumed, vec![1, 2]);
}

/// Commits a single move as soon as it is installed.
struct Mover {
    from: usize,
    to: usize,
    done: bool,
}

impl<S: DataSource> Extension<S> for Mover {
    fn install(&mut self, cx: &mut ListContext<'_, S>) {
        self.done = cx.commit_move(self.from, self.to);
    }

    fn pointer(&mut self, _cx: &mut ListContext<'_, S>, _event: &PointerEvent) -> bool {
        false
    }

    fn resume(&mut self, _cx: &mut ListContext<'_, S>, _step: u32) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn commit_move_goes_through_the_source() {
    let mut list = list_1000();
    let moved = list.pool().slot_for(5).unwrap();
    list.source_mut().calls.clear();

    list.plugin(Mover {
        from: 5,
        to: 2,
        done: false,
    });

    assert!(list.extension::<Mover>().unwrap().done);
    let calls = &list.source().calls;
    assert_eq!(calls[0], Call::Remove(5));
    assert_eq!(calls[1], Call::Insert(2, None));
    assert_eq!(list.source().id_at(2), 5);
    assert_eq!(list.source().id_at(3), 2);

    assert_eq!(list.pool().slot_for(2), Some(moved));
    // Moved elements keep their content, only their index changes.
    assert!(!calls.contains(&Call::Populate(2)));
    assert_rendered(&list, 0, 20);
}

#[test]
fn commit_move_without_a_record_is_refused() {
    let mut list = list_1000();
    list.plugin(Mover {
        from: 5000,
        to: 0,
        done: true,
    });
    assert!(!list.extension_mut::<Mover>().unwrap().done);
    assert_eq!(list.source().full_length(), 1000);
    assert_rendered(&list, 0, 20);
}

#[test]
fn recycled_elements_drop_their_detail() {
    let mut list = list_1000();
    list.source_mut().calls.clear();
    list.on_scroll(3000, 0);

    let calls = &list.source().calls;
    let undetails = calls.iter().filter(|c| **c == Call::Undetail).count();
    assert_eq!(undetails, 21);
    assert!(calls.contains(&Call::Detail(46)));
}
