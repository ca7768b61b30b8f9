//! Property-based invariant tests for the marker index and selector.
//!
//! 1. max_value == N - 1 for any flattened input (−1 when empty).
//! 2. Pinned sort leaves unknown items in their input slots.
//! 3. Pinned sort orders known items non-decreasingly and stably.
//! 4. Pinned sort is a permutation (nothing lost, nothing duplicated).
//! 5. Descending is exactly the reverse of ascending.
//! 6. Selector output is strictly increasing and inside the bounds.
//! 7. Trailing windows never exceed k and always end at the current position.
//! 8. Same-instant output shares one equality key.
//! 9. Numeric epochs: t < 1e12 scales by 1000, otherwise passes through.
//! 10. Strings with four leading digits label as exactly those digits.

use proptest::prelude::*;
use timeslide_core::index::{IndexOptions, MarkerIndex, stable_sort_pinned};
use timeslide_core::item::{Marker, Node, TimedItem};
use timeslide_core::selector::{DisplayMode, Selection, SliderBounds, select_positions};
use timeslide_core::time::{self, Instant, LabelFormat};
use timeslide_core::value::MetaValue;

// ── Strategies ──────────────────────────────────────────────────────────

/// Optional small epoch-second values; `None` means "no time field".
fn times(max_len: usize) -> impl Strategy<Value = Vec<Option<u16>>> {
    proptest::collection::vec(proptest::option::weighted(0.8, 0u16..20), 0..=max_len)
}

fn build(times: &[Option<u16>], descending: bool) -> MarkerIndex<Marker> {
    let nodes = times.iter().enumerate().map(|(i, t)| {
        let m = Marker::new(i as u64);
        Node::leaf(match t {
            Some(t) => m.property("time", f64::from(*t)),
            None => m,
        })
    });
    MarkerIndex::build(
        nodes,
        IndexOptions {
            descending,
            ..IndexOptions::default()
        },
    )
}

fn ids(index: &MarkerIndex<Marker>) -> Vec<u64> {
    index.items().map(|m| m.item_id().get()).collect()
}

fn mode_strategy() -> impl Strategy<Value = DisplayMode> {
    prop_oneof![
        Just(DisplayMode::Cumulative),
        Just(DisplayMode::Range),
        Just(DisplayMode::SameInstant),
        (1usize..6).prop_map(|k| DisplayMode::trailing(k).unwrap_or_default()),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. max_value == N - 1
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn max_value_tracks_len(ts in times(40), split in 0usize..40) {
        // Nest part of the input in a group; flattening must keep the count.
        let split = split.min(ts.len());
        let leaves = |slice: &[Option<u16>], offset: usize| -> Vec<Node<Marker>> {
            slice
                .iter()
                .enumerate()
                .map(|(i, _)| Node::leaf(Marker::new((i + offset) as u64)))
                .collect()
        };
        let mut nodes = leaves(&ts[..split], 0);
        nodes.push(Node::group(leaves(&ts[split..], split)));
        let index = MarkerIndex::build(nodes, IndexOptions::default());
        prop_assert_eq!(index.max_value(), ts.len() as isize - 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2–4. pinned sort
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unknown_items_never_move(ts in times(40)) {
        let index = build(&ts, false);
        for (slot, t) in ts.iter().enumerate() {
            if t.is_none() {
                prop_assert_eq!(
                    index.get(slot).map(|m| m.item_id().get()),
                    Some(slot as u64),
                    "unknown item moved out of slot {}", slot
                );
            }
        }
    }

    #[test]
    fn known_items_sorted_and_stable(ts in times(40)) {
        let index = build(&ts, false);
        let known: Vec<(Instant, u64)> = index
            .iter()
            .filter_map(|e| e.instant().map(|i| (i, e.item().item_id().get())))
            .collect();
        for pair in known.windows(2) {
            prop_assert!(pair[0].0 <= pair[1].0, "not sorted: {:?}", pair);
            if pair[0].0 == pair[1].0 {
                prop_assert!(pair[0].1 < pair[1].1, "tie order broken: {:?}", pair);
            }
        }
    }

    #[test]
    fn pinned_sort_is_a_permutation(
        values in proptest::collection::vec(proptest::option::of(0u8..10), 0..60),
    ) {
        let mut sorted = values.clone();
        stable_sort_pinned(&mut sorted, |v| *v);
        let mut a = values.clone();
        let mut b = sorted.clone();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. descending == reverse(ascending)
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn descending_is_reversed_ascending(ts in times(40)) {
        let mut asc = ids(&build(&ts, false));
        asc.reverse();
        prop_assert_eq!(ids(&build(&ts, true)), asc);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6–8. selector
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn selector_output_is_ordered_and_bounded(
        ts in times(30),
        mode in mode_strategy(),
        a in 0usize..40,
        b in 0usize..40,
        min in 0usize..5,
        max in proptest::option::of(0usize..40),
    ) {
        let index = build(&ts, false);
        let selection = if mode.uses_range() {
            Selection::range(a, b)
        } else {
            Selection::Single(a)
        };
        let bounds = SliderBounds::new(min, max);
        let got = select_positions(&index, selection, mode, bounds);

        for pair in got.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        if let Some((lo, hi)) = bounds.effective(index.len()) {
            prop_assert!(got.iter().all(|&p| p >= lo && p <= hi));
        } else {
            prop_assert!(got.is_empty());
        }
    }

    #[test]
    fn trailing_window_is_short_and_ends_at_current(
        ts in times(30),
        k in 1usize..8,
        current in 0usize..30,
    ) {
        let index = build(&ts, false);
        let mode = DisplayMode::trailing(k).unwrap_or_default();
        let bounds = SliderBounds::for_len(index.len());
        let got = select_positions(&index, Selection::Single(current), mode, bounds);
        prop_assert!(got.len() <= k);
        if current < index.len() {
            prop_assert_eq!(got.last().copied(), Some(current));
        }
    }

    #[test]
    fn same_instant_shares_one_key(ts in times(30), current in 0usize..30) {
        let index = build(&ts, false);
        let bounds = SliderBounds::for_len(index.len());
        let got =
            select_positions(&index, Selection::Single(current), DisplayMode::SameInstant, bounds);
        if let Some(entry) = index.entry(current) {
            prop_assert!(got.contains(&current));
            for p in got {
                let key = index.entry(p).map(|e| e.equality_key());
                prop_assert_eq!(key, Some(entry.equality_key()));
            }
        } else {
            prop_assert!(got.is_empty());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9–10. normalizer
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn numeric_epoch_heuristic(t in 0i64..4_000_000_000_000) {
        let got = time::ordering_instant(&MetaValue::Number(t as f64));
        let expected = if (t as f64) < time::EPOCH_SECONDS_THRESHOLD { t * 1000 } else { t };
        prop_assert_eq!(got, Some(Instant::from_millis(expected)));
    }

    #[test]
    fn leading_digits_are_the_label(year in "[0-9]{4}", rest in "\\PC{0,16}") {
        let raw = MetaValue::Text(format!("{year}{rest}"));
        prop_assert_eq!(time::to_display_label(&raw, false, LabelFormat::YearOnly), year);
    }

    #[test]
    fn normalizer_is_total(s in "\\PC{0,40}") {
        let raw = MetaValue::Text(s);
        let _ = time::ordering_instant(&raw);
        let _ = time::to_display_label(&raw, true, LabelFormat::YearOnly);
        let _ = time::to_display_label(&raw, false, LabelFormat::substring_default());
        prop_assert!(!time::to_equality_key(&raw, false).is_empty() || raw.as_text() == Some(""));
    }
}
