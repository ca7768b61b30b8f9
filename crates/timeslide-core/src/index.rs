#![forbid(unsafe_code)]

//! Marker index.
//!
//! A [`MarkerIndex`] is built once, when the slider attaches to its map, from
//! the host's (possibly nested) item collection:
//!
//! 1. groups are flattened depth-first, preserving relative order;
//! 2. when ordering is requested, items are stably sorted by their ordering
//!    instant and, if descending, the result is reversed;
//! 3. positions `0..N-1` are assigned;
//! 4. pre-existing popups are stashed in a side table keyed by [`ItemId`].
//!
//! Each entry caches its raw time value, ordering instant, and equality key
//! for the lifetime of the index. Membership and order never change after
//! the build: the control shows and hides items, it never removes them.
//!
//! # Unknown instants
//!
//! An item whose time cannot be interpreted compares equal to every other
//! item. Such items keep their input slots; the items with known instants
//! are stably sorted into the remaining slots (see [`stable_sort_pinned`]).
//!
//! # Descending order
//!
//! Descending order is the *reverse of the stable ascending sort*. With ties
//! this is not a stable descending sort: tied items come out in reverse
//! input order.

use crate::extract::{DEFAULT_TIME_FIELD, extract};
use crate::item::{ItemId, Node, Popup, TimedItem, flatten};
use crate::time::{self, Instant, LabelFormat};
use crate::value::MetaValue;
use ahash::AHashMap;

/// Build-time options for a [`MarkerIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    /// Metadata field holding the time value.
    pub time_field: String,
    /// Numbers are epochs (seconds or milliseconds) for display and grouping.
    pub is_epoch: bool,
    /// Sort items by time.
    pub order: bool,
    /// Reverse the ascending order. Ignored unless `order` is set.
    pub descending: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            time_field: DEFAULT_TIME_FIELD.to_owned(),
            is_epoch: false,
            order: true,
            descending: false,
        }
    }
}

/// One indexed item with its cached time data.
#[derive(Debug, Clone)]
pub struct IndexEntry<I> {
    item: I,
    raw: Option<MetaValue>,
    instant: Option<Instant>,
    equality_key: String,
}

impl<I> IndexEntry<I> {
    #[inline]
    pub fn item(&self) -> &I {
        &self.item
    }

    /// Raw time value as extracted from the item.
    #[inline]
    pub fn raw_time(&self) -> Option<&MetaValue> {
        self.raw.as_ref()
    }

    /// Ordering instant, `None` when unknown.
    #[inline]
    pub fn instant(&self) -> Option<Instant> {
        self.instant
    }

    /// Key used by same-instant grouping.
    #[inline]
    pub fn equality_key(&self) -> &str {
        &self.equality_key
    }
}

/// Ordered, positionally addressable collection of items.
#[derive(Debug, Clone)]
pub struct MarkerIndex<I> {
    entries: Vec<IndexEntry<I>>,
    stashed_popups: AHashMap<ItemId, Popup>,
    positions: AHashMap<ItemId, usize>,
    options: IndexOptions,
}

impl<I> Default for MarkerIndex<I> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            stashed_popups: AHashMap::new(),
            positions: AHashMap::new(),
            options: IndexOptions::default(),
        }
    }
}

impl<I: TimedItem> MarkerIndex<I> {
    /// Build the index from the host's item collection.
    pub fn build(nodes: impl IntoIterator<Item = Node<I>>, options: IndexOptions) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "index.build",
            ordered = options.order,
            descending = options.descending
        )
        .entered();

        let mut entries: Vec<IndexEntry<I>> = flatten(nodes)
            .into_iter()
            .map(|item| {
                let raw = extract(&item, &options.time_field).cloned();
                let instant = raw.as_ref().and_then(time::ordering_instant);
                let equality_key = time::equality_key_of(raw.as_ref(), options.is_epoch);
                IndexEntry {
                    item,
                    raw,
                    instant,
                    equality_key,
                }
            })
            .collect();

        if options.order {
            stable_sort_pinned(&mut entries, |e| e.instant);
            if options.descending {
                entries.reverse();
            }
        }

        let mut stashed_popups = AHashMap::new();
        let mut positions = AHashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            let id = entry.item.item_id();
            positions.entry(id).or_insert(pos);
            if let Some(popup) = entry.item.popup() {
                stashed_popups.insert(id, popup.clone());
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "index.built",
            item_count = entries.len(),
            unknown_count = entries.iter().filter(|e| e.instant.is_none()).count(),
            stashed_popups = stashed_popups.len()
        );

        Self {
            entries,
            stashed_popups,
            positions,
            options,
        }
    }
}

impl<I> MarkerIndex<I> {
    /// Number of indexed items.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest position, or `-1` for an empty index.
    #[inline]
    pub fn max_value(&self) -> isize {
        self.entries.len() as isize - 1
    }

    /// Highest position, or `None` for an empty index.
    #[inline]
    pub fn last_position(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    /// Item at `pos`.
    #[inline]
    pub fn get(&self, pos: usize) -> Option<&I> {
        self.entries.get(pos).map(|e| &e.item)
    }

    /// Entry (item plus cached time data) at `pos`.
    #[inline]
    pub fn entry(&self, pos: usize) -> Option<&IndexEntry<I>> {
        self.entries.get(pos)
    }

    /// Entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry<I>> {
        self.entries.iter()
    }

    /// Items in index order.
    pub fn items(&self) -> impl Iterator<Item = &I> {
        self.entries.iter().map(|e| &e.item)
    }

    /// Position of the item with identity `id` (first occurrence).
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Popup the item carried before it was indexed.
    pub fn stashed_popup(&self, id: ItemId) -> Option<&Popup> {
        self.stashed_popups.get(&id)
    }

    /// Options the index was built with.
    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Display label for the item at `pos`.
    ///
    /// `None` when there is no item there or it carries no time value; an
    /// unparseable value yields `Some("")`.
    pub fn label_at(&self, pos: usize, format: LabelFormat) -> Option<String> {
        let raw = self.entries.get(pos)?.raw.as_ref()?;
        Some(time::to_display_label(raw, self.options.is_epoch, format))
    }
}

/// Stable sort where items without a key stay in their slots.
///
/// Keyed items are sorted (stably, by key) into the slots keyed items
/// occupied before; unkeyed items do not move. This is the well-defined
/// reading of a comparator that reports "equal" whenever either side is
/// unknown, and it never panics regardless of the input.
pub fn stable_sort_pinned<T, K: Ord>(items: &mut Vec<T>, key: impl Fn(&T) -> Option<K>) {
    let keys: Vec<Option<K>> = items.iter().map(&key).collect();
    let slots: Vec<usize> = keys
        .iter()
        .enumerate()
        .filter_map(|(i, k)| k.as_ref().map(|_| i))
        .collect();
    if slots.len() < 2 {
        return;
    }

    let mut sorted = slots.clone();
    sorted.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    let mut permutation: Vec<usize> = (0..items.len()).collect();
    for (&slot, &source) in slots.iter().zip(&sorted) {
        permutation[slot] = source;
    }

    let mut taken: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(permutation.into_iter().filter_map(|src| taken[src].take()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Marker, PopupOptions};

    fn marker(id: u64, time: Option<&str>) -> Node<Marker> {
        let m = Marker::new(id);
        Node::leaf(match time {
            Some(t) => m.property("time", t),
            None => m,
        })
    }

    fn ids<I: TimedItem>(index: &MarkerIndex<I>) -> Vec<u64> {
        index.items().map(|i| i.item_id().get()).collect()
    }

    #[test]
    fn empty_index_has_max_value_minus_one() {
        let index = MarkerIndex::<Marker>::build(Vec::new(), IndexOptions::default());
        assert!(index.is_empty());
        assert_eq!(index.max_value(), -1);
        assert_eq!(index.last_position(), None);
        assert!(index.get(0).is_none());
    }

    #[test]
    fn max_value_is_len_minus_one() {
        let nodes = vec![marker(1, Some("2001")), marker(2, Some("2002"))];
        let index = MarkerIndex::build(nodes, IndexOptions::default());
        assert_eq!(index.max_value(), 1);
        assert_eq!(index.last_position(), Some(1));
    }

    #[test]
    fn sorts_ascending_by_instant() {
        let nodes = vec![
            marker(1, Some("2003")),
            marker(2, Some("2001")),
            marker(3, Some("2002")),
        ];
        let index = MarkerIndex::build(nodes, IndexOptions::default());
        assert_eq!(ids(&index), vec![2, 3, 1]);
    }

    #[test]
    fn unordered_keeps_input_order() {
        let nodes = vec![marker(1, Some("2003")), marker(2, Some("2001"))];
        let opts = IndexOptions {
            order: false,
            descending: true,
            ..IndexOptions::default()
        };
        let index = MarkerIndex::build(nodes, opts);
        assert_eq!(ids(&index), vec![1, 2]);
    }

    #[test]
    fn unknown_items_keep_their_slots() {
        // instants [unknown, 5, unknown, 3] -> [unknown, 3, unknown, 5]
        let nodes = vec![
            Node::leaf(Marker::new(1).property("time", "garbage")),
            Node::leaf(Marker::new(2).property("time", 5.0)),
            Node::leaf(Marker::new(3)),
            Node::leaf(Marker::new(4).property("time", 3.0)),
        ];
        let index = MarkerIndex::build(nodes, IndexOptions::default());
        assert_eq!(ids(&index), vec![1, 4, 3, 2]);
    }

    #[test]
    fn ties_are_stable_ascending() {
        let nodes = vec![
            marker(1, Some("2001")),
            marker(2, Some("2000")),
            marker(3, Some("2001")),
        ];
        let index = MarkerIndex::build(nodes, IndexOptions::default());
        assert_eq!(ids(&index), vec![2, 1, 3]);
    }

    #[test]
    fn descending_reverses_ascending_including_ties() {
        let nodes = vec![
            marker(1, Some("2001")),
            marker(2, Some("2000")),
            marker(3, Some("2001")),
        ];
        let opts = IndexOptions {
            descending: true,
            ..IndexOptions::default()
        };
        let index = MarkerIndex::build(nodes, opts);
        // Ascending is [2, 1, 3]; its reverse puts the tie 3 before 1.
        assert_eq!(ids(&index), vec![3, 1, 2]);
    }

    #[test]
    fn groups_are_flattened_before_sorting() {
        let nodes = vec![
            marker(1, Some("2004")),
            Node::group([marker(2, Some("2002")), marker(3, Some("2000"))]),
        ];
        let index = MarkerIndex::build(nodes, IndexOptions::default());
        assert_eq!(ids(&index), vec![3, 2, 1]);
        assert_eq!(index.position_of(ItemId::new(1)), Some(2));
    }

    #[test]
    fn caches_time_data_per_entry() {
        let nodes = vec![marker(1, Some("2001")), marker(2, None)];
        let index = MarkerIndex::build(nodes, IndexOptions::default());
        let first = index.entry(0).unwrap();
        assert_eq!(first.raw_time(), Some(&MetaValue::from("2001")));
        assert_eq!(first.instant(), Some(Instant::from_millis(978_307_200_000)));
        assert_eq!(first.equality_key(), "2001-01-01T00:00:00.000Z");
        let second = index.entry(1).unwrap();
        assert_eq!(second.raw_time(), None);
        assert_eq!(second.equality_key(), time::ABSENT_EQUALITY_KEY);
    }

    #[test]
    fn custom_time_field_and_epoch_flag() {
        let nodes = vec![
            Node::leaf(Marker::new(1).option("ts", 978_307_200.0)),
            Node::leaf(Marker::new(2).option("ts", 946_684_800.0)),
        ];
        let opts = IndexOptions {
            time_field: "ts".into(),
            is_epoch: true,
            ..IndexOptions::default()
        };
        let index = MarkerIndex::build(nodes, opts);
        assert_eq!(ids(&index), vec![2, 1]);
        assert_eq!(index.label_at(0, LabelFormat::YearOnly).as_deref(), Some("2000"));
        assert_eq!(index.entry(1).unwrap().equality_key(), "2001-01-01T00:00:00.000Z");
    }

    #[test]
    fn label_at_distinguishes_absent_from_unparseable() {
        let nodes = vec![marker(1, Some("whenever")), marker(2, None)];
        let opts = IndexOptions {
            order: false,
            ..IndexOptions::default()
        };
        let index = MarkerIndex::build(nodes, opts);
        assert_eq!(index.label_at(0, LabelFormat::YearOnly).as_deref(), Some(""));
        assert_eq!(index.label_at(1, LabelFormat::YearOnly), None);
        assert_eq!(index.label_at(9, LabelFormat::YearOnly), None);
    }

    #[test]
    fn stashes_pre_existing_popups() {
        let options = PopupOptions::default().with("maxWidth", "200");
        let popup = Popup::new("<b>Hi</b>").options(options);
        let nodes = vec![
            Node::leaf(Marker::new(1).property("time", "2001").popup(popup.clone())),
            Node::group([Node::leaf(Marker::new(2).property("time", "2000"))]),
        ];
        let index = MarkerIndex::build(nodes, IndexOptions::default());
        assert_eq!(index.stashed_popup(ItemId::new(1)), Some(&popup));
        assert_eq!(index.stashed_popup(ItemId::new(2)), None);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn build_emits_span_and_summary_event() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::layer::SubscriberExt;

        struct Names(Arc<Mutex<Vec<String>>>);

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Names {
            fn on_new_span(
                &self,
                attrs: &tracing::span::Attributes<'_>,
                _id: &tracing::span::Id,
                _ctx: tracing_subscriber::layer::Context<'_, S>,
            ) {
                self.0.lock().unwrap().push(attrs.metadata().name().to_owned());
            }

            fn on_event(
                &self,
                event: &tracing::Event<'_>,
                _ctx: tracing_subscriber::layer::Context<'_, S>,
            ) {
                struct Message<'a>(&'a mut Vec<String>);
                impl tracing::field::Visit for Message<'_> {
                    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                        if field.name() == "message" {
                            self.0.push(value.to_owned());
                        }
                    }
                    fn record_debug(
                        &mut self,
                        field: &tracing::field::Field,
                        value: &dyn std::fmt::Debug,
                    ) {
                        if field.name() == "message" {
                            self.0.push(format!("{value:?}"));
                        }
                    }
                }
                event.record(&mut Message(&mut self.0.lock().unwrap()));
            }
        }

        let names = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Names(Arc::clone(&names)));
        tracing::subscriber::with_default(subscriber, || {
            MarkerIndex::build(vec![marker(1, Some("2001"))], IndexOptions::default());
        });
        let names = names.lock().unwrap();
        assert!(names.iter().any(|n| n == "index.build"), "{names:?}");
        assert!(names.iter().any(|n| n == "index.built"), "{names:?}");
    }

    #[test]
    fn pinned_sort_handles_trivial_inputs() {
        let mut empty: Vec<Option<u8>> = Vec::new();
        stable_sort_pinned(&mut empty, |v| *v);
        assert!(empty.is_empty());

        let mut one = vec![None, Some(3), None];
        stable_sort_pinned(&mut one, |v| *v);
        assert_eq!(one, vec![None, Some(3), None]);
    }
}
