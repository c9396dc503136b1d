// Example: a flat list of 10k records scrolled by a host, slowly then fast.
use fastlist::{DataSource, FastList, FastListOptions, PopulateStamp, Population};

struct Rows {
    titles: Vec<String>,
}

impl DataSource for Rows {
    type Element = String;
    type Section = ();
    type Record = String;

    fn full_length(&self) -> usize {
        self.titles.len()
    }

    fn item_height(&self) -> u32 {
        60
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

    fn record_at(&self, index: usize) -> Option<&String> {
        self.titles.get(index)
    }

    fn create_item(&mut self) -> String {
        String::new()
    }

    fn create_section(&mut self) -> String {
        String::new()
    }

    fn populate_item(
        &mut self,
        element: &mut String,
        index: usize,
        _stamp: PopulateStamp,
    ) -> Population {
        element.clone_from(&self.titles[index]);
        Population::Ready
    }

    fn populate_section(&mut self, _element: &mut String, _section: &(), _ordinal: usize) {}

    fn insert_at_index(&mut self, index: usize, record: String, _section: Option<&()>) {
        self.titles.insert(index, record);
    }

    fn replace_at_index(&mut self, index: usize, record: String) -> Option<String> {
        let slot = self.titles.get_mut(index)?;
        Some(std::mem::replace(slot, record))
    }

    fn remove_at_index(&mut self, index: usize) -> Option<String> {
        (index < self.titles.len()).then(|| self.titles.remove(index))
    }
}

fn main() {
    let rows = Rows {
        titles: (0..10_000).map(|i| format!("Song #{i}")).collect(),
    };
    let mut list = FastList::new(rows, FastListOptions::new(600));
    let events = list.drain_events();
    println!(
        "max_item_count={} mounted={} events={events:?}",
        list.geometry().max_item_count,
        list.pool().len(),
    );

    let mut now_ms = 0;
    for offset in [300u64, 600, 900, 4_000, 9_000, 9_100, 9_150] {
        now_ms += 16;
        list.on_scroll(offset, now_ms);
        let window = list.window().expect("non-empty list");
        let first = list.pool().item_at(window.critical.first);
        let first = first.map(|it| it.element().as_str());
        println!(
            "offset={offset} fast={} critical={:?} prerender={:?} first={first:?}",
            list.is_fast_scrolling(),
            window.critical,
            window.prerender,
        );
    }

    list.tick(now_ms + 200);
    println!("lifecycle={:?}", list.lifecycle());
}
