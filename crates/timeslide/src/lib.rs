#![forbid(unsafe_code)]

//! timeslide public facade crate.
//!
//! Re-exports the types a host integration needs from `timeslide-core` and
//! `timeslide-widgets`, plus a prelude for day-to-day use:
//!
//! ```
//! use timeslide::prelude::*;
//!
//! let config = SliderConfig::default()
//!     .mode(DisplayMode::Range)
//!     .always_show_label(true);
//! let control: SliderControl<Marker> = SliderControl::new(config)
//!     .with_source([Node::leaf(Marker::new(0).property("time", "1999"))]);
//! assert_eq!(control.state(), ControlState::Detached);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use timeslide_core::geo::{LatLng, LatLngBounds};
pub use timeslide_core::index::{IndexEntry, IndexOptions, MarkerIndex};
pub use timeslide_core::item::{ItemId, Marker, Node, Popup, PopupOptions, TimedItem};
pub use timeslide_core::selector::{DisplayMode, Selection, SliderBounds};
pub use timeslide_core::time::{Instant, LabelFormat};
pub use timeslide_core::value::{MetaValue, Metadata};

// --- Widget re-exports -----------------------------------------------------

pub use timeslide_widgets::config::{Placement, SliderConfig, SliderConfigError};
pub use timeslide_widgets::control::{ControlError, ControlState, Diagnostic, SliderControl};
pub use timeslide_widgets::event::{ListenerId, RangeChanged, SliderSpec, SliderValue};
pub use timeslide_widgets::host::{FitOptions, HostEvent, MapHost, PopupHost};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for timeslide integrations.
#[derive(Debug)]
pub enum Error {
    /// Lifecycle misuse of a control.
    Control(ControlError),
    /// Configuration could not be loaded or failed validation.
    Config(SliderConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Control(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Control(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ControlError> for Error {
    fn from(err: ControlError) -> Self {
        Self::Control(err)
    }
}

impl From<SliderConfigError> for Error {
    fn from(err: SliderConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for timeslide APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ControlState, DisplayMode, Error, LabelFormat, MapHost, Marker, Node, Placement,
        PopupHost, PopupOptions, RangeChanged, Result, SliderConfig, SliderControl, SliderValue,
        TimedItem,
    };

    pub use crate::{core, widgets};
}

pub use timeslide_core as core;
pub use timeslide_widgets as widgets;
