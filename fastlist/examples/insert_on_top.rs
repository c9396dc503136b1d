// Example: a record arrives at the top while the host plays the slide-down/reveal animation.
use fastlist::{
    DataSource, FastList, FastListOptions, InsertOutcome, PopulateStamp, Population, Target,
};

#[derive(Default)]
struct Inbox {
    subjects: Vec<String>,
}

impl DataSource for Inbox {
    type Element = String;
    type Section = ();
    type Record = String;

    fn full_length(&self) -> usize {
        self.subjects.len()
    }

    fn item_height(&self) -> u32 {
        72
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
        self.subjects.get(index)
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
        element.clone_from(&self.subjects[index]);
        Population::Ready
    }

    fn populate_section(&mut self, _element: &mut String, _section: &(), _ordinal: usize) {}

    fn insert_at_index(&mut self, index: usize, record: String, _section: Option<&()>) {
        self.subjects.insert(index, record);
    }

    fn replace_at_index(&mut self, index: usize, record: String) -> Option<String> {
        let slot = self.subjects.get_mut(index)?;
        Some(std::mem::replace(slot, record))
    }

    fn remove_at_index(&mut self, index: usize) -> Option<String> {
        (index < self.subjects.len()).then(|| self.subjects.remove(index))
    }
}

fn main() {
    let inbox = Inbox {
        subjects: (0..200).map(|i| format!("Message {i}")).collect(),
    };
    let mut list = FastList::new(inbox, FastListOptions::new(720));
    list.drain_events();

    list.source_mut().subjects.insert(0, "Fresh message".into());
    let outcome = list.inserted_at_index(0);
    assert_eq!(outcome, InsertOutcome::Animated);

    // The host paints offsets and reports transitionend for each awaited element.
    let mut now_ms = 0;
    while list.container().reordering {
        now_ms += 50;
        let awaited: Vec<_> = list
            .pool()
            .iter()
            .filter(|(_, item)| item.style().transition.is_some())
            .map(|(slot, _)| slot)
            .collect();
        if let Some(&slot) = awaited.first() {
            println!(
                "t={now_ms} animating={} offset_of_first={:?}",
                awaited.len(),
                list.item_offset_at(slot, now_ms)
            );
            list.transition_end(Target::Item(slot));
        }
        list.tick(now_ms);
    }

    let top = list.pool().item_at(0).map(|it| it.element().clone());
    println!("top={top:?} events={:?}", list.drain_events());

    // Scrolled away from the top, insertions are silent and keep the content in place.
    list.on_scroll(3_000, now_ms);
    list.source_mut().subjects.insert(0, "Another one".into());
    println!(
        "outcome={:?} scroll_top={} events={:?}",
        list.inserted_at_index(0),
        list.scroll_top(),
        list.drain_events()
    );
}
