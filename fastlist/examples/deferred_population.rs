// Example: frame-aligned scheduling with thumbnails that load after the item is mounted.
use fastlist::{
    DataSource, FastList, FastListOptions, PopulateStamp, Population, Scheduler, Target,
};

#[derive(Debug, Default)]
struct Tile {
    title: String,
    thumbnail: Option<u32>,
}

#[derive(Default)]
struct Gallery {
    len: usize,
    pending: Vec<PopulateStamp>,
}

impl DataSource for Gallery {
    type Element = Tile;
    type Section = ();
    type Record = usize;

    fn full_length(&self) -> usize {
        self.len
    }

    fn item_height(&self) -> u32 {
        120
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

    fn record_at(&self, _index: usize) -> Option<&usize> {
        None
    }

    fn create_item(&mut self) -> Tile {
        Tile::default()
    }

    fn create_section(&mut self) -> Tile {
        Tile::default()
    }

    fn populate_item(
        &mut self,
        element: &mut Tile,
        index: usize,
        stamp: PopulateStamp,
    ) -> Population {
        element.title = format!("Photo {index}");
        element.thumbnail = None;
        if index % 3 == 0 {
            element.thumbnail = Some(index as u32);
            return Population::Ready;
        }
        self.pending.push(stamp);
        Population::Pending
    }

    fn populate_section(&mut self, _element: &mut Tile, _section: &(), _ordinal: usize) {}

    fn populate_item_detail(&mut self, element: &mut Tile, index: usize) {
        if element.thumbnail.is_none() {
            element.thumbnail = Some(index as u32);
        }
    }

    fn unpopulate_item_detail(&mut self, element: &mut Tile) {
        element.thumbnail = None;
    }

    fn insert_at_index(&mut self, _index: usize, _record: usize, _section: Option<&()>) {
        self.len += 1;
    }

    fn replace_at_index(&mut self, _index: usize, record: usize) -> Option<usize> {
        Some(record)
    }

    fn remove_at_index(&mut self, index: usize) -> Option<usize> {
        (index < self.len).then(|| {
            self.len -= 1;
            index
        })
    }
}

fn main() {
    let gallery = Gallery {
        len: 5_000,
        ..Gallery::default()
    };
    let mut list = FastList::with_scheduler(
        gallery,
        FastListOptions::new(800),
        Scheduler::frame_aligned(),
    );
    println!("before first frame: mounted={}", list.pool().len());

    list.frame(16);
    println!(
        "after first frame: mounted={} pending={}",
        list.pool().len(),
        list.source().pending.len()
    );

    // Several scroll events in one frame collapse into the latest.
    list.on_scroll(1_000, 20);
    list.on_scroll(2_400, 24);
    list.frame(32);

    // Loads finish: stamps of elements recycled meanwhile are discarded.
    let stamps = std::mem::take(&mut list.source_mut().pending);
    let (mut applied, mut stale) = (0, 0);
    for stamp in stamps {
        if list.complete_population(stamp) {
            applied += 1;
        } else {
            stale += 1;
        }
    }
    list.frame(48);
    println!("applied={applied} stale={stale}");

    let revealing: Vec<_> = list
        .pool()
        .iter()
        .filter(|(_, item)| item.style().transition.is_some())
        .map(|(slot, _)| slot)
        .collect();
    for slot in &revealing {
        list.transition_end(Target::Item(*slot));
    }
    println!("revealed={}", revealing.len());
}
