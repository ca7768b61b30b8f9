#![forbid(unsafe_code)]

//! Reference item sources.
//!
//! Ids are assigned in input order starting at 0, so tests can talk about
//! "item 3" without caring how the index reorders things.

use timeslide_core::item::{Marker, Node, Popup};

/// `count` markers timed `"{first_year}"`, `"{first_year + 1}"`, ... placed
/// on a diagonal (`lat = i`, `lng = -i`).
pub fn yearly_markers(first_year: i32, count: usize) -> Vec<Node<Marker>> {
    (0..count)
        .map(|i| {
            Node::leaf(
                Marker::new(i as u64)
                    .at(i as f64, -(i as f64))
                    .property("time", format!("{}", first_year + i as i32)),
            )
        })
        .collect()
}

/// Markers carrying the given epoch numbers in the options bag under `field`.
pub fn epoch_markers(field: &str, epochs: &[f64]) -> Vec<Node<Marker>> {
    epochs
        .iter()
        .enumerate()
        .map(|(i, &t)| Node::leaf(Marker::new(i as u64).at(0.0, i as f64).option(field, t)))
        .collect()
}

/// Markers with free-form time strings; `None` leaves the time field out.
pub fn timed_markers(times: &[Option<&str>]) -> Vec<Node<Marker>> {
    times
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let m = Marker::new(i as u64).at(i as f64, i as f64);
            Node::leaf(match t {
                Some(t) => m.property("time", *t),
                None => m,
            })
        })
        .collect()
}

/// A nested source: `[item0, group[item1, group[item2]], item3]`, timed
/// 2003, 2001, 2000, 2002.
pub fn nested_markers() -> Vec<Node<Marker>> {
    let m = |id: u64, year: &str| {
        Node::leaf(Marker::new(id).at(id as f64, 0.0).property("time", year))
    };
    vec![
        m(0, "2003"),
        Node::group([m(1, "2001"), Node::group([m(2, "2000")])]),
        m(3, "2002"),
    ]
}

/// Yearly markers where every even id already carries a popup
/// `"popup {id}"`.
pub fn markers_with_popups(first_year: i32, count: usize) -> Vec<Node<Marker>> {
    (0..count)
        .map(|i| {
            let m = Marker::new(i as u64)
                .at(i as f64, 0.0)
                .property("time", format!("{}", first_year + i as i32));
            Node::leaf(if i % 2 == 0 {
                m.popup(Popup::new(format!("popup {i}")))
            } else {
                m
            })
        })
        .collect()
}
