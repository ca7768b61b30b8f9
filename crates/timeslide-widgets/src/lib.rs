#![forbid(unsafe_code)]

//! Time-slider map control for timeslide.
//!
//! [`control::SliderControl`] is an event-driven state machine. The host
//! toolkit owns the map, the slider widget, and popup rendering; it calls
//! into the control on attach, slide, pointer-release, and detach, and the
//! control calls back through the [`host::MapHost`] and [`host::PopupHost`]
//! traits to show and hide items.
//!
//! ```
//! use timeslide_core::item::{Marker, Node};
//! use timeslide_widgets::config::SliderConfig;
//! use timeslide_widgets::control::SliderControl;
//! use timeslide_widgets::event::SliderValue;
//! # use timeslide_core::geo::LatLngBounds;
//! # use timeslide_core::item::PopupOptions;
//! # use timeslide_widgets::host::{FitOptions, HostEvent, MapHost, PopupHost};
//! # #[derive(Default)]
//! # struct Map { shown: Vec<u64> }
//! # impl MapHost<Marker> for Map {
//! #     fn add_item(&mut self, item: &Marker) {
//! #         use timeslide_core::item::TimedItem;
//! #         self.shown.push(item.item_id().get());
//! #     }
//! #     fn remove_item(&mut self, item: &Marker) {
//! #         use timeslide_core::item::TimedItem;
//! #         self.shown.retain(|id| *id != item.item_id().get());
//! #     }
//! #     fn fit_bounds(&mut self, _: LatLngBounds, _: FitOptions) {}
//! #     fn subscribe(&mut self, _: HostEvent) {}
//! #     fn unsubscribe(&mut self, _: HostEvent) {}
//! # }
//! # impl PopupHost<Marker> for Map {
//! #     fn bind_popup(&mut self, _: &Marker, _: &str, _: &PopupOptions) {}
//! #     fn open_popup(&mut self, _: &Marker) {}
//! #     fn close_popup(&mut self, _: &Marker) {}
//! # }
//!
//! let markers = ["2000", "2001", "2002"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, t)| Node::leaf(Marker::new(i as u64).property("time", *t)));
//!
//! let mut map = Map::default();
//! let mut control = SliderControl::new(SliderConfig::default()).with_source(markers);
//! control.on_attach(&mut map).unwrap();
//! control.start(&mut map).unwrap();
//! assert_eq!(map.shown, vec![0]);
//!
//! control.on_slide(&mut map, SliderValue::Single(2)).unwrap();
//! assert_eq!(map.shown, vec![0, 1, 2]);
//! assert_eq!(control.label(), Some("2002"));
//! ```

pub mod config;
pub mod control;
pub mod event;
pub mod host;
