#![forbid(unsafe_code)]

//! A host that remembers everything the control asked of it.

use std::collections::{BTreeMap, BTreeSet};

use timeslide_core::geo::LatLngBounds;
use timeslide_core::item::{ItemId, PopupOptions, TimedItem};
use timeslide_widgets::config::Placement;
use timeslide_widgets::host::{FitOptions, HostEvent, MapHost, PopupHost};

/// One call made by the control on the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    PlaceControl(Placement),
    RemoveControl,
    Add(ItemId),
    Remove(ItemId),
    FitBounds {
        bounds: LatLngBounds,
        max_zoom: Option<f64>,
    },
    Subscribe(HostEvent),
    Unsubscribe(HostEvent),
    BindPopup {
        item: ItemId,
        content: String,
        options: PopupOptions,
    },
    OpenPopup(ItemId),
    ClosePopup(ItemId),
}

impl HostCall {
    /// Stable JSON rendering used by transcripts.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            Self::PlaceControl(p) => {
                json!({"call": "place_control", "placement": format!("{p:?}")})
            }
            Self::RemoveControl => json!({"call": "remove_control"}),
            Self::Add(id) => json!({"call": "add", "item": id.get()}),
            Self::Remove(id) => json!({"call": "remove", "item": id.get()}),
            Self::FitBounds { bounds, max_zoom } => json!({
                "call": "fit_bounds",
                "south_west": [bounds.south_west().lat, bounds.south_west().lng],
                "north_east": [bounds.north_east().lat, bounds.north_east().lng],
                "max_zoom": max_zoom,
            }),
            Self::Subscribe(e) => json!({"call": "subscribe", "event": format!("{e:?}")}),
            Self::Unsubscribe(e) => json!({"call": "unsubscribe", "event": format!("{e:?}")}),
            Self::BindPopup {
                item,
                content,
                options,
            } => json!({
                "call": "bind_popup",
                "item": item.get(),
                "content": content,
                "auto_close": options.auto_close,
                "extra": options.extra,
            }),
            Self::OpenPopup(id) => json!({"call": "open_popup", "item": id.get()}),
            Self::ClosePopup(id) => json!({"call": "close_popup", "item": id.get()}),
        }
    }
}

/// Recording [`MapHost`] + [`PopupHost`] for any [`TimedItem`].
///
/// Besides the raw call log it keeps the host-visible state: which items are
/// on the map, which popups are bound and open, whether the pointer-up
/// subscription is live, and where the control was placed.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    shown: BTreeSet<ItemId>,
    bound: BTreeMap<ItemId, (String, PopupOptions)>,
    open: BTreeSet<ItemId>,
    subscribed: BTreeSet<HostEvent>,
    placement: Option<Placement>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain the call log, keeping the tracked state.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Items currently on the map.
    pub fn shown(&self) -> Vec<u64> {
        self.shown.iter().map(|id| id.get()).collect()
    }

    pub fn is_shown(&self, id: u64) -> bool {
        self.shown.contains(&ItemId::new(id))
    }

    /// Items whose popup is open.
    pub fn open_popups(&self) -> Vec<u64> {
        self.open.iter().map(|id| id.get()).collect()
    }

    /// Content and options last bound to `id`.
    pub fn binding(&self, id: u64) -> Option<&(String, PopupOptions)> {
        self.bound.get(&ItemId::new(id))
    }

    pub fn is_subscribed(&self, event: HostEvent) -> bool {
        self.subscribed.contains(&event)
    }

    /// Where the control currently sits, `None` once removed.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Every `fit_bounds` call so far.
    pub fn fits(&self) -> Vec<(LatLngBounds, Option<f64>)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::FitBounds { bounds, max_zoom } => Some((*bounds, *max_zoom)),
                _ => None,
            })
            .collect()
    }
}

impl<I: TimedItem> MapHost<I> for RecordingHost {
    fn add_item(&mut self, item: &I) {
        let id = item.item_id();
        self.calls.push(HostCall::Add(id));
        self.shown.insert(id);
    }

    fn remove_item(&mut self, item: &I) {
        let id = item.item_id();
        self.calls.push(HostCall::Remove(id));
        self.shown.remove(&id);
        self.open.remove(&id);
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, options: FitOptions) {
        self.calls.push(HostCall::FitBounds {
            bounds,
            max_zoom: options.max_zoom,
        });
    }

    fn subscribe(&mut self, event: HostEvent) {
        self.calls.push(HostCall::Subscribe(event));
        self.subscribed.insert(event);
    }

    fn unsubscribe(&mut self, event: HostEvent) {
        self.calls.push(HostCall::Unsubscribe(event));
        self.subscribed.remove(&event);
    }

    fn place_control(&mut self, placement: Placement) {
        self.calls.push(HostCall::PlaceControl(placement));
        self.placement = Some(placement);
    }

    fn remove_control(&mut self) {
        self.calls.push(HostCall::RemoveControl);
        self.placement = None;
    }
}

impl<I: TimedItem> PopupHost<I> for RecordingHost {
    fn bind_popup(&mut self, item: &I, content: &str, options: &PopupOptions) {
        let id = item.item_id();
        self.calls.push(HostCall::BindPopup {
            item: id,
            content: content.to_owned(),
            options: options.clone(),
        });
        self.bound.insert(id, (content.to_owned(), options.clone()));
    }

    fn open_popup(&mut self, item: &I) {
        let id = item.item_id();
        self.calls.push(HostCall::OpenPopup(id));
        if self.bound.contains_key(&id) {
            self.open.insert(id);
        }
    }

    fn close_popup(&mut self, item: &I) {
        let id = item.item_id();
        self.calls.push(HostCall::ClosePopup(id));
        self.open.remove(&id);
    }
}
