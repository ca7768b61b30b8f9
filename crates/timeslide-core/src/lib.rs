#![forbid(unsafe_code)]

//! Core: time extraction, normalization, marker indexing, and visibility selection.
//!
//! # Role in timeslide
//! `timeslide-core` is the toolkit-independent half of the time slider. It
//! knows nothing about maps, popups, or slider widgets; it turns an
//! unordered collection of time-tagged items into a positional index and
//! answers "which items are visible for this slider position?".
//!
//! # Primary responsibilities
//! - **extract**: pull a raw time value out of an item's metadata bags.
//! - **time**: normalize raw values into [`time::Instant`]s, display labels,
//!   and equality keys.
//! - **index**: build the ordered, immutable [`index::MarkerIndex`].
//! - **selector**: compute the visible subset for a selection and display mode.
//! - **geo**: latitude/longitude bounds used for viewport fitting.
//!
//! # How it fits in the system
//! The control state machine in `timeslide-widgets` owns a `MarkerIndex`
//! and re-runs the selector on every slide event. Everything here is pure
//! and synchronous, so it can be exercised without any host toolkit.

pub mod extract;
pub mod geo;
pub mod index;
pub mod item;
pub mod logging;
pub mod selector;
pub mod time;
pub mod value;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
