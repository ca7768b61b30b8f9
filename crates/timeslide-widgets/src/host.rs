#![forbid(unsafe_code)]

//! Host collaborator traits.
//!
//! The control never renders anything itself. Everything visible goes
//! through these traits, implemented by whatever map toolkit embeds the
//! control.

use crate::config::Placement;
use timeslide_core::geo::LatLngBounds;
use timeslide_core::item::PopupOptions;

/// Map-level events the control listens to while attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostEvent {
    /// Pointer released anywhere on the map, outside slider interaction.
    /// The host should route it to
    /// [`SliderControl::on_pointer_up`](crate::control::SliderControl::on_pointer_up).
    PointerUp,
}

/// Options for [`MapHost::fit_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitOptions {
    /// Do not zoom in further than this level.
    pub max_zoom: Option<f64>,
}

/// The host map/viewport.
pub trait MapHost<I> {
    /// Show `item` on the map. Adding an item that is already shown must be
    /// harmless.
    fn add_item(&mut self, item: &I);

    /// Hide `item`. Removing an item that is not shown must be harmless.
    fn remove_item(&mut self, item: &I);

    /// Move the viewport so `bounds` is visible.
    fn fit_bounds(&mut self, bounds: LatLngBounds, options: FitOptions);

    /// Start delivering `event` to the control.
    fn subscribe(&mut self, event: HostEvent);

    /// Stop delivering `event` to the control.
    fn unsubscribe(&mut self, event: HostEvent);

    /// Create the control's container at `placement`.
    fn place_control(&mut self, placement: Placement) {
        let _ = placement;
    }

    /// Tear the control's container down.
    fn remove_control(&mut self) {}
}

/// The host popup mechanism.
pub trait PopupHost<I> {
    /// Attach `content` as `item`'s popup, replacing any previous binding.
    fn bind_popup(&mut self, item: &I, content: &str, options: &PopupOptions);

    /// Open `item`'s bound popup.
    fn open_popup(&mut self, item: &I);

    /// Close `item`'s popup if it is open.
    fn close_popup(&mut self, item: &I);
}
