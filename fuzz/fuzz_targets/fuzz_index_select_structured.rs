#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use timeslide_core::index::{IndexOptions, MarkerIndex};
use timeslide_core::item::{Marker, Node};
use timeslide_core::selector::{DisplayMode, Selection, SliderBounds, select_positions};

#[derive(Debug, Arbitrary)]
enum RawTime {
    Missing,
    Number(f64),
    Text(String),
}

#[derive(Debug, Arbitrary)]
struct Input {
    times: Vec<RawTime>,
    is_epoch: bool,
    order: bool,
    descending: bool,
    min: u8,
    max: Option<u8>,
    lo: u8,
    hi: u8,
    mode: u8,
}

fuzz_target!(|input: Input| {
    let nodes: Vec<Node<Marker>> = input
        .times
        .iter()
        .take(256)
        .enumerate()
        .map(|(i, t)| {
            let m = Marker::new(i as u64);
            Node::leaf(match t {
                RawTime::Missing => m,
                RawTime::Number(n) => m.property("time", *n),
                RawTime::Text(s) => m.property("time", s.as_str()),
            })
        })
        .collect();
    let count = nodes.len();

    let index = MarkerIndex::build(
        nodes,
        IndexOptions {
            is_epoch: input.is_epoch,
            order: input.order,
            descending: input.descending,
            ..IndexOptions::default()
        },
    );
    assert_eq!(index.len(), count);
    assert_eq!(index.max_value(), count as isize - 1);

    let mode = match input.mode % 4 {
        0 => DisplayMode::Cumulative,
        1 => DisplayMode::Range,
        2 => DisplayMode::SameInstant,
        k => {
            let width = usize::from(input.mode / 4) + usize::from(k);
            DisplayMode::trailing(width).unwrap_or_default()
        }
    };
    let bounds = SliderBounds::new(usize::from(input.min), input.max.map(usize::from));
    let selection = Selection::range(usize::from(input.lo), usize::from(input.hi));

    let positions = select_positions(&index, selection, mode, bounds);
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    match bounds.effective(index.len()) {
        Some((min, max)) => assert!(positions.iter().all(|&p| p >= min && p <= max)),
        None => assert!(positions.is_empty()),
    }
});
