use alloc::vec::Vec;

use crate::{PopulateStamp, Population, SectionLayout};

/// The model behind a [`crate::FastList`].
///
/// The data source owns the ordered records and the platform elements. The list only indexes
/// into it: it asks for counts and heights, creates and populates elements through it, and
/// forwards record moves back to it.
///
/// Sections are reported in display order and are never empty. A source without sections
/// returns an empty `sections()` and renders as a single headerless run.
pub trait DataSource {
    /// A platform element (DOM node, widget handle, ...).
    type Element;
    /// Section key, compared to detect which section an item belongs to.
    type Section: Clone + PartialEq + core::fmt::Debug;
    /// A record moved through the mutation hooks.
    type Record;

    fn full_length(&self) -> usize;
    fn item_height(&self) -> u32;
    fn section_header_height(&self) -> u32;

    /// Section keys in display order; empty for an unsectioned list.
    fn sections(&self) -> Vec<Self::Section>;
    fn section_length(&self, section: &Self::Section) -> usize;

    /// Height of a section's items, header excluded.
    fn full_section_height(&self, section: &Self::Section) -> u64 {
        self.section_length(section) as u64 * self.item_height() as u64
    }

    fn section_for(&self, index: usize) -> Option<Self::Section>;
    fn record_at(&self, index: usize) -> Option<&Self::Record>;

    /// Container height, when the source knows it better than the host layout.
    fn viewport_height(&self) -> Option<u32> {
        None
    }

    fn create_item(&mut self) -> Self::Element;
    fn create_section(&mut self) -> Self::Element;

    /// Fills `element` with the record at `index`.
    ///
    /// Returning [`Population::Pending`] leaves the element with placeholder content; the source
    /// keeps `stamp` and reports completion through [`crate::FastList::complete_population`].
    fn populate_item(
        &mut self,
        element: &mut Self::Element,
        index: usize,
        stamp: PopulateStamp,
    ) -> Population;

    fn populate_section(
        &mut self,
        element: &mut Self::Element,
        section: &Self::Section,
        ordinal: usize,
    );

    /// Secondary content (images, ...), skipped while fast scrolling.
    fn populate_item_detail(&mut self, _element: &mut Self::Element, _index: usize) {}

    /// Called before an element with detail content is reused for another index.
    fn unpopulate_item_detail(&mut self, _element: &mut Self::Element) {}

    fn insert_at_index(
        &mut self,
        index: usize,
        record: Self::Record,
        section: Option<&Self::Section>,
    );
    fn replace_at_index(&mut self, index: usize, record: Self::Record) -> Option<Self::Record>;
    fn remove_at_index(&mut self, index: usize) -> Option<Self::Record>;
}

/// Snapshots the shape of `source` into a [`SectionLayout`].
pub fn layout_of<S: DataSource + ?Sized>(source: &S) -> SectionLayout {
    let item_height = source.item_height();
    let sections = source.sections();
    if sections.is_empty() {
        return SectionLayout::flat(source.full_length(), item_height);
    }
    let layout = SectionLayout::sectioned(
        sections.iter().map(|s| source.section_length(s)),
        item_height,
        source.section_header_height(),
    );
    debug_assert_eq!(
        layout.len(),
        source.full_length(),
        "DataSource: section lengths disagree with full_length"
    );
    layout
}
