// Example: an edit-mode list where the host forwards a drag on an item's handle.
use fastlist::{
    DataSource, FastList, FastListOptions, PointerEvent, PointerKind, PointerTarget,
    PopulateStamp, Population, Target,
};
use fastlist_reorder::{Reorder, ReorderState};

struct Playlist {
    tracks: Vec<&'static str>,
}

impl DataSource for Playlist {
    type Element = &'static str;
    type Section = ();
    type Record = &'static str;

    fn full_length(&self) -> usize {
        self.tracks.len()
    }

    fn item_height(&self) -> u32 {
        64
    }

    fn section_header_height(&self) -> u32 {
        0
    }

    fn sections(&self) -> Vec<()> {
        Vec::new()
    }

    fn section_length(&self, _section: &()) -> usize {
        0
    }

    fn section_for(&self, _index: usize) -> Option<()> {
        None
    }

    fn record_at(&self, index: usize) -> Option<&&'static str> {
        self.tracks.get(index)
    }

    fn create_item(&mut self) -> &'static str {
        ""
    }

    fn create_section(&mut self) -> &'static str {
        ""
    }

    fn populate_item(
        &mut self,
        element: &mut &'static str,
        index: usize,
        _stamp: PopulateStamp,
    ) -> Population {
        *element = self.tracks[index];
        Population::Ready
    }

    fn populate_section(&mut self, _element: &mut &'static str, _section: &(), _ordinal: usize) {}

    fn insert_at_index(&mut self, index: usize, record: &'static str, _section: Option<&()>) {
        self.tracks.insert(index, record);
    }

    fn replace_at_index(&mut self, index: usize, record: &'static str) -> Option<&'static str> {
        let slot = self.tracks.get_mut(index)?;
        Some(std::mem::replace(slot, record))
    }

    fn remove_at_index(&mut self, index: usize) -> Option<&'static str> {
        (index < self.tracks.len()).then(|| self.tracks.remove(index))
    }
}

fn main() {
    let playlist = Playlist {
        tracks: vec![
            "Intro", "Blue", "Green", "Red", "Yellow", "Outro", "Bonus", "Hidden",
        ],
    };
    let mut list = FastList::new(playlist, FastListOptions::new(480));
    list.plugin(Reorder::new());
    list.toggle_edit_mode();
    list.animation_end(Target::Container);

    // Drag "Outro" (index 5) three rows up.
    let slot = list.pool().slot_for(5).expect("mounted");
    let at = |kind, y| PointerEvent::mouse(kind, PointerTarget::DragHandle(slot), y);
    list.pointer(at(PointerKind::Down, 350));
    for y in (150..350).rev().step_by(25) {
        list.pointer(at(PointerKind::Move, y));
        let reorder = list.extension::<Reorder>().expect("installed");
        println!(
            "y={y} displaced_down={} offset={:?}",
            reorder.displaced_down(),
            list.item_offset_at(slot, 0)
        );
    }
    list.pointer(at(PointerKind::Up, 150));

    // Report transitionend until the commit ran.
    while list.extension::<Reorder>().map(Reorder::state) != Some(ReorderState::Idle) {
        let moving: Vec<_> = list
            .pool()
            .iter()
            .filter(|(_, item)| item.style().transition.is_some())
            .map(|(slot, _)| slot)
            .collect();
        if moving.is_empty() {
            break;
        }
        for slot in moving {
            list.transition_end(Target::Item(slot));
        }
    }

    println!("order={:?}", list.source().tracks);
}
