#![forbid(unsafe_code)]

//! The slider control state machine.
//!
//! ```text
//!            on_attach            on_slide
//! Detached ────────────▶ Idle ─────────────▶ Sliding
//!     ▲                   ▲  ◀───────────────   │
//!     │                   │   clear_timestamp   │
//!     └───────────────────┴──── on_detach ──────┘
//! ```
//!
//! The control owns its [`MarkerIndex`] for as long as it is attached and
//! drives the host exclusively through [`MapHost`] and [`PopupHost`]. Every
//! slide hides all candidate items and then shows exactly the newly visible
//! set; there is no diffing against the previous selection.
//!
//! Lifecycle misuse (sliding a detached control, attaching twice) is a
//! [`ControlError`]. A missing item source is not an error: it is recorded
//! as a [`Diagnostic`] and the control runs with an empty index.

use std::fmt;

use timeslide_core::geo::LatLngBounds;
use timeslide_core::index::MarkerIndex;
use timeslide_core::item::{Node, TimedItem};
use timeslide_core::selector::{Selection, SliderBounds, select_positions};

use crate::config::{Placement, SliderConfig};
use crate::event::{ListenerId, Listeners, RangeChanged, SliderSpec, SliderValue};
use crate::host::{FitOptions, HostEvent, MapHost, PopupHost};

/// Lifecycle state of a [`SliderControl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlState {
    /// Not on a map.
    #[default]
    Detached,
    /// Attached, not being dragged.
    Idle,
    /// A slide is in progress; the label tracks the current position.
    Sliding,
}

/// Non-fatal problems found while running the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// The control was attached without an item source.
    MissingSource,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSource => {
                write!(f, "no item source was supplied; the slider has nothing to show")
            }
        }
    }
}

/// Lifecycle misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// The operation needs an attached control.
    NotAttached,
    /// `on_attach` was called on an attached control.
    AlreadyAttached,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAttached => write!(f, "slider control is not attached to a map"),
            Self::AlreadyAttached => write!(f, "slider control is already attached to a map"),
        }
    }
}

impl std::error::Error for ControlError {}

/// Mutable state that only exists while attached.
#[derive(Debug)]
struct RunState<I> {
    index: MarkerIndex<I>,
    bounds: SliderBounds,
    selection: Selection,
    /// Positions currently shown, ascending.
    visible: Vec<usize>,
    label: Option<String>,
    label_visible: bool,
}

impl<I> RunState<I> {
    /// Effective `[min, max]` over the index, `None` when nothing is selectable.
    fn span(&self) -> Option<(usize, usize)> {
        self.bounds.effective(self.index.len())
    }

    fn candidates(&self) -> impl Iterator<Item = &I> {
        self.span()
            .into_iter()
            .flat_map(|(min, max)| min..=max)
            .filter_map(|p| self.index.get(p))
    }
}

/// Time-slider control.
///
/// See the [module docs](self) for the lifecycle.
pub struct SliderControl<I> {
    config: SliderConfig,
    source: Option<Vec<Node<I>>>,
    state: ControlState,
    run: Option<RunState<I>>,
    diagnostics: Vec<Diagnostic>,
    listeners: Listeners<I>,
}

impl<I: fmt::Debug> fmt::Debug for SliderControl<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderControl")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("has_source", &self.source.is_some())
            .field("run", &self.run)
            .field("diagnostics", &self.diagnostics)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<I: TimedItem + Clone> SliderControl<I> {
    /// Detached control without an item source.
    #[must_use]
    pub fn new(config: SliderConfig) -> Self {
        Self {
            config,
            source: None,
            state: ControlState::Detached,
            run: None,
            diagnostics: Vec::new(),
            listeners: Listeners::default(),
        }
    }

    /// Supply the (possibly grouped) items to slide over.
    ///
    /// The source is indexed on every attach; replacing it only takes effect
    /// on the next one.
    #[must_use]
    pub fn with_source(mut self, nodes: impl IntoIterator<Item = Node<I>>) -> Self {
        self.source = Some(nodes.into_iter().collect());
        self
    }

    /// Attach to `host`: index the source and start listening for pointer
    /// releases.
    pub fn on_attach<H>(&mut self, host: &mut H) -> Result<(), ControlError>
    where
        H: MapHost<I> + ?Sized,
    {
        if self.run.is_some() {
            return Err(ControlError::AlreadyAttached);
        }
        self.diagnostics.clear();

        host.place_control(self.config.placement);

        let index = match &self.source {
            Some(nodes) => MarkerIndex::build(nodes.clone(), self.config.index_options()),
            None => {
                self.report(Diagnostic::MissingSource);
                MarkerIndex::default()
            }
        };
        let max = self.config.max_value.or_else(|| index.last_position());
        let bounds = SliderBounds::new(self.config.min_value, max);

        host.subscribe(HostEvent::PointerUp);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "control.attached",
            item_count = index.len(),
            min = bounds.min,
            max = bounds.max_value(),
            placement = ?self.config.placement
        );

        self.run = Some(RunState {
            index,
            bounds,
            selection: Selection::Single(bounds.min),
            visible: Vec::new(),
            label: None,
            label_visible: false,
        });
        self.state = ControlState::Idle;
        Ok(())
    }

    /// Show the initial selection and describe the slider widget the host
    /// should display.
    pub fn start<H>(&mut self, host: &mut H) -> Result<SliderSpec, ControlError>
    where
        H: MapHost<I> + PopupHost<I> + ?Sized,
    {
        let config = &self.config;
        let run = self.run.as_mut().ok_or(ControlError::NotAttached)?;
        let mode = config.mode;
        let min = run.bounds.min;

        let initial = match (config.show_all_on_start, run.bounds.max) {
            (true, Some(max)) if mode.uses_range() => SliderValue::Range(min, max),
            (true, Some(max)) => SliderValue::Single(max),
            _ if mode.uses_range() => SliderValue::Range(min, min),
            _ => SliderValue::Single(min),
        };
        run.selection = match run.span() {
            Some((lo, hi)) => initial.to_selection(mode).clamped(lo, hi),
            None => initial.to_selection(mode),
        };

        run.label = run.index.label_at(run.selection.current(), config.label_format);
        run.label_visible = config.always_show_label && run.label.is_some();

        run.visible = select_positions(&run.index, run.selection, mode, run.bounds);
        for item in run.visible.iter().filter_map(|&p| run.index.get(p)) {
            host.add_item(item);
        }
        open_popups(config, &run.index, &run.visible, host);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "control.started",
            selection = ?run.selection,
            visible_count = run.visible.len(),
            label = run.label.as_deref().unwrap_or("")
        );

        emit(&mut self.listeners, run);

        Ok(SliderSpec {
            min,
            max: run.bounds.max,
            step: 1,
            range: mode.uses_range(),
            initial,
        })
    }

    /// Apply a slider value reported by the host's widget.
    ///
    /// Values outside the slider bounds are clamped into them.
    pub fn on_slide<H>(&mut self, host: &mut H, value: SliderValue) -> Result<(), ControlError>
    where
        H: MapHost<I> + PopupHost<I> + ?Sized,
    {
        let config = &self.config;
        let run = self.run.as_mut().ok_or(ControlError::NotAttached)?;
        self.state = ControlState::Sliding;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("control.slide", value = ?value, mode = ?config.mode)
            .entered();

        let Some((min, max)) = run.span() else {
            run.selection = value.to_selection(config.mode);
            run.visible.clear();
            emit(&mut self.listeners, run);
            return Ok(());
        };
        run.selection = value.to_selection(config.mode).clamped(min, max);

        if let Some(label) = run.index.label_at(run.selection.current(), config.label_format) {
            run.label = Some(label);
            run.label_visible = true;
        }

        if config.show_popups {
            for item in run.visible.iter().filter_map(|&p| run.index.get(p)) {
                host.close_popup(item);
            }
        }
        for item in run.candidates() {
            host.remove_item(item);
        }

        run.visible = select_positions(&run.index, run.selection, config.mode, run.bounds);
        for item in run.visible.iter().filter_map(|&p| run.index.get(p)) {
            host.add_item(item);
        }
        open_popups(config, &run.index, &run.visible, host);

        emit(&mut self.listeners, run);

        if let Some(max_zoom) = config.rezoom_max_zoom {
            let bounds = LatLngBounds::union_all(
                run.visible
                    .iter()
                    .filter_map(|&p| run.index.get(p))
                    .filter_map(|item| item.bounds()),
            );
            if let Some(bounds) = bounds {
                host.fit_bounds(
                    bounds,
                    FitOptions {
                        max_zoom: Some(max_zoom),
                    },
                );
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "control.slid",
            selection = ?run.selection,
            visible_count = run.visible.len()
        );

        Ok(())
    }

    /// End of a slide: back to idle, hiding the label unless it is pinned.
    pub fn clear_timestamp(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        self.state = ControlState::Idle;
        if !self.config.always_show_label {
            run.label = None;
            run.label_visible = false;
        }
    }

    /// Host callback for [`HostEvent::PointerUp`].
    pub fn on_pointer_up(&mut self) {
        self.clear_timestamp();
    }

    /// Move the control to another corner.
    ///
    /// An attached control is detached, moved, re-attached, and restarted;
    /// the returned [`SliderSpec`] describes the restarted slider. A detached
    /// control just records the new placement.
    pub fn set_position<H>(
        &mut self,
        host: &mut H,
        placement: Placement,
    ) -> Result<Option<SliderSpec>, ControlError>
    where
        H: MapHost<I> + PopupHost<I> + ?Sized,
    {
        let attached = self.run.is_some();
        if attached {
            self.on_detach(host)?;
        }
        self.config = self.config.clone().placement(placement);
        if !attached {
            return Ok(None);
        }
        self.on_attach(host)?;
        self.start(host).map(Some)
    }

    /// Detach from `host`: hide every candidate item, stop listening, and
    /// drop the index.
    pub fn on_detach<H>(&mut self, host: &mut H) -> Result<(), ControlError>
    where
        H: MapHost<I> + ?Sized,
    {
        let run = self.run.take().ok_or(ControlError::NotAttached)?;
        for item in run.candidates() {
            host.remove_item(item);
        }
        host.unsubscribe(HostEvent::PointerUp);
        host.remove_control();
        self.state = ControlState::Detached;

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "control.detached", item_count = run.index.len());

        Ok(())
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        #[cfg(feature = "tracing")]
        tracing::warn!(message = "control.diagnostic", diagnostic = %diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

impl<I> SliderControl<I> {
    /// Register a `rangechanged` listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&RangeChanged<I>) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    #[inline]
    pub fn state(&self) -> ControlState {
        self.state
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.run.is_some()
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    /// Current timestamp label text, whether or not it is displayed.
    pub fn label(&self) -> Option<&str> {
        self.run.as_ref()?.label.as_deref()
    }

    /// Whether the timestamp label is displayed.
    pub fn label_visible(&self) -> bool {
        self.run.as_ref().is_some_and(|r| r.label_visible)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.run.as_ref().map(|r| r.selection)
    }

    pub fn bounds(&self) -> Option<SliderBounds> {
        self.run.as_ref().map(|r| r.bounds)
    }

    /// Positions currently shown, ascending.
    pub fn visible_positions(&self) -> &[usize] {
        self.run.as_ref().map_or(&[], |r| r.visible.as_slice())
    }

    /// Items currently shown, in index order.
    pub fn visible_items(&self) -> Vec<&I> {
        let Some(run) = self.run.as_ref() else {
            return Vec::new();
        };
        run.visible.iter().filter_map(|&p| run.index.get(p)).collect()
    }

    pub fn index(&self) -> Option<&MarkerIndex<I>> {
        self.run.as_ref().map(|r| &r.index)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn open_popups<I, H>(
    config: &SliderConfig,
    index: &MarkerIndex<I>,
    visible: &[usize],
    host: &mut H,
) where
    I: TimedItem,
    H: PopupHost<I> + ?Sized,
{
    if !config.show_popups {
        return;
    }
    for item in visible.iter().filter_map(|&p| index.get(p)) {
        let (content, options) = match index.stashed_popup(item.item_id()) {
            Some(popup) => (popup.content.as_str(), &popup.options),
            None => match &config.popup_content {
                Some(content) => (content.as_str(), &config.popup_options),
                None => continue,
            },
        };
        let options = if config.show_all_popups {
            options.clone().auto_close(false)
        } else {
            options.clone()
        };
        host.bind_popup(item, content, &options);
        host.open_popup(item);
    }
}

fn emit<I: Clone>(listeners: &mut Listeners<I>, run: &RunState<I>) {
    if listeners.is_empty() {
        return;
    }
    let event = RangeChanged {
        positions: run.visible.clone(),
        items: run
            .visible
            .iter()
            .filter_map(|&p| run.index.get(p))
            .cloned()
            .collect(),
    };
    listeners.emit(&event);
}
