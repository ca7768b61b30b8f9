#![forbid(unsafe_code)]

//! Slider configuration.
//!
//! [`SliderConfig`] is an immutable value handed to the control at
//! construction. Live state (selection, label, shown items) is kept apart
//! from it inside the control.
//!
//! With the `config-files` feature the whole configuration can be loaded
//! from TOML or JSON:
//!
//! ```toml
//! placement = "bottomleft"
//! time_field = "year"
//! show_all_on_start = true
//! mode = { trailing_window = 3 }
//! rezoom_max_zoom = 12.0
//!
//! [popup_options]
//! auto_close = false
//! ```
//!
//! ```rust,ignore
//! let config = SliderConfig::from_toml_file("slider.toml")?;
//! ```
//!
//! Every field has a default, so partial files are fine. Loaded
//! configurations are validated before they are returned.

#[cfg(feature = "config-files")]
use std::path::Path;

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};

use timeslide_core::extract::DEFAULT_TIME_FIELD;
use timeslide_core::index::IndexOptions;
use timeslide_core::item::PopupOptions;
use timeslide_core::selector::DisplayMode;
use timeslide_core::time::LabelFormat;

/// Corner of the map the control sits in. Passed through to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(rename_all = "lowercase"))]
pub enum Placement {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Configuration of a [`SliderControl`](crate::control::SliderControl).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct SliderConfig {
    /// Where the host should put the control.
    pub placement: Placement,
    /// Metadata field holding each item's time.
    pub time_field: String,
    /// Numeric times are epochs (seconds or milliseconds) rather than plain
    /// milliseconds when labelling and grouping.
    pub is_epoch: bool,
    /// Lowest slider position.
    pub min_value: usize,
    /// Highest slider position. `None` uses the last index position.
    pub max_value: Option<usize>,
    /// Start with the whole span selected instead of just `min_value`.
    pub show_all_on_start: bool,
    /// Which items are visible for a selection.
    pub mode: DisplayMode,
    /// Keep the timestamp label visible after the pointer is released.
    pub always_show_label: bool,
    /// Fit the viewport to the visible items after each slide, zooming in
    /// no further than this level. `None` disables refitting.
    pub rezoom_max_zoom: Option<f64>,
    /// Sort items by time before indexing.
    pub order_items: bool,
    /// Reverse the sorted order.
    pub order_descending: bool,
    /// Options for popups bound from `popup_content`.
    pub popup_options: PopupOptions,
    /// Popup content for items that had no popup of their own.
    pub popup_content: Option<String>,
    /// Keep every visible item's popup open at once.
    pub show_all_popups: bool,
    /// Open popups for visible items.
    pub show_popups: bool,
    /// How the timestamp label is derived.
    pub label_format: LabelFormat,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            time_field: DEFAULT_TIME_FIELD.to_owned(),
            is_epoch: false,
            min_value: 0,
            max_value: None,
            show_all_on_start: false,
            mode: DisplayMode::default(),
            always_show_label: false,
            rezoom_max_zoom: None,
            order_items: true,
            order_descending: false,
            popup_options: PopupOptions::default(),
            popup_content: None,
            show_all_popups: true,
            show_popups: true,
            label_format: LabelFormat::default(),
        }
    }
}

impl SliderConfig {
    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn time_field(mut self, field: impl Into<String>) -> Self {
        self.time_field = field.into();
        self
    }

    #[must_use]
    pub fn epoch(mut self, is_epoch: bool) -> Self {
        self.is_epoch = is_epoch;
        self
    }

    #[must_use]
    pub fn min_value(mut self, min: usize) -> Self {
        self.min_value = min;
        self
    }

    #[must_use]
    pub fn max_value(mut self, max: Option<usize>) -> Self {
        self.max_value = max;
        self
    }

    #[must_use]
    pub fn show_all_on_start(mut self, show_all: bool) -> Self {
        self.show_all_on_start = show_all;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn always_show_label(mut self, always: bool) -> Self {
        self.always_show_label = always;
        self
    }

    #[must_use]
    pub fn rezoom(mut self, max_zoom: Option<f64>) -> Self {
        self.rezoom_max_zoom = max_zoom;
        self
    }

    #[must_use]
    pub fn order_items(mut self, order: bool) -> Self {
        self.order_items = order;
        self
    }

    #[must_use]
    pub fn order_descending(mut self, descending: bool) -> Self {
        self.order_descending = descending;
        self
    }

    #[must_use]
    pub fn popup_options(mut self, options: PopupOptions) -> Self {
        self.popup_options = options;
        self
    }

    #[must_use]
    pub fn popup_content(mut self, content: impl Into<String>) -> Self {
        self.popup_content = Some(content.into());
        self
    }

    #[must_use]
    pub fn show_all_popups(mut self, show_all: bool) -> Self {
        self.show_all_popups = show_all;
        self
    }

    #[must_use]
    pub fn show_popups(mut self, show: bool) -> Self {
        self.show_popups = show;
        self
    }

    #[must_use]
    pub fn label_format(mut self, format: LabelFormat) -> Self {
        self.label_format = format;
        self
    }

    /// Options for building the marker index.
    #[must_use]
    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            time_field: self.time_field.clone(),
            is_epoch: self.is_epoch,
            order: self.order_items,
            descending: self.order_descending,
        }
    }

    /// Check every parameter is usable.
    ///
    /// Returns a list of problems; an empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.time_field.trim().is_empty() {
            errors.push("time_field must not be empty".into());
        }

        if let Some(max) = self.max_value
            && max < self.min_value
        {
            errors.push(format!(
                "max_value ({max}) must be >= min_value ({})",
                self.min_value
            ));
        }

        if let Some(zoom) = self.rezoom_max_zoom
            && (!zoom.is_finite() || zoom < 0.0)
        {
            errors.push(format!(
                "rezoom_max_zoom must be a finite, non-negative zoom level, got {zoom}"
            ));
        }

        if let LabelFormat::Substring { length: 0, .. } = self.label_format {
            errors.push("label_format.length must be > 0".into());
        }

        errors
    }

    /// `Ok(self)` if [`validate`](Self::validate) finds nothing.
    pub fn into_validated(self) -> Result<Self, SliderConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SliderConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, SliderConfigError> {
        toml::from_str::<Self>(s)
            .map_err(SliderConfigError::Toml)?
            .into_validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SliderConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SliderConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, SliderConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(SliderConfigError::Json)?
            .into_validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SliderConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SliderConfigError::Io)?;
        Self::from_json_str(&content)
    }
}

/// Errors from loading or validating a [`SliderConfig`].
#[derive(Debug)]
pub enum SliderConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for SliderConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SliderConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = SliderConfig::default();
        assert_eq!(c.placement, Placement::TopRight);
        assert_eq!(c.time_field, "time");
        assert!(!c.is_epoch);
        assert_eq!(c.min_value, 0);
        assert_eq!(c.max_value, None);
        assert!(!c.show_all_on_start);
        assert_eq!(c.mode, DisplayMode::Cumulative);
        assert!(!c.always_show_label);
        assert_eq!(c.rezoom_max_zoom, None);
        assert!(c.order_items);
        assert!(!c.order_descending);
        assert_eq!(c.popup_content, None);
        assert!(c.show_all_popups);
        assert!(c.show_popups);
        assert_eq!(c.label_format, LabelFormat::YearOnly);
        assert!(c.validate().is_empty());
    }

    #[test]
    fn index_options_follow_config() {
        let opts = SliderConfig::default()
            .time_field("year")
            .epoch(true)
            .order_items(false)
            .order_descending(true)
            .index_options();
        assert_eq!(opts.time_field, "year");
        assert!(opts.is_epoch);
        assert!(!opts.order);
        assert!(opts.descending);
    }

    #[test]
    fn validate_reports_every_problem() {
        let c = SliderConfig::default()
            .time_field("  ")
            .min_value(5)
            .max_value(Some(2))
            .rezoom(Some(f64::NAN))
            .label_format(LabelFormat::Substring { start: 0, length: 0 });
        let errors = c.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors[1].contains("max_value (2)"));
    }

    #[test]
    fn into_validated_wraps_errors() {
        let err = SliderConfig::default()
            .rezoom(Some(-1.0))
            .into_validated()
            .unwrap_err();
        assert!(matches!(err, SliderConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().starts_with("validation errors: rezoom_max_zoom"));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn toml_partial_file_uses_defaults() {
        let c = SliderConfig::from_toml_str(
            r#"
            placement = "bottomleft"
            time_field = "year"
            mode = { trailing_window = 3 }
            rezoom_max_zoom = 12.0

            [popup_options]
            auto_close = false
            "#,
        )
        .unwrap();
        assert_eq!(c.placement, Placement::BottomLeft);
        assert_eq!(c.time_field, "year");
        assert_eq!(c.mode, DisplayMode::trailing(3).unwrap());
        assert_eq!(c.rezoom_max_zoom, Some(12.0));
        assert!(!c.popup_options.auto_close);
        assert!(c.show_popups);
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn json_round_trip_through_file() {
        let config = SliderConfig::default()
            .mode(DisplayMode::SameInstant)
            .label_format(LabelFormat::substring_default())
            .popup_content("<b>here</b>");
        let json = serde_json::to_string(&config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slider.json");
        std::fs::write(&path, json).unwrap();
        assert_eq!(SliderConfig::from_json_file(&path).unwrap(), config);
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn invalid_file_is_rejected() {
        let err = SliderConfig::from_toml_str("min_value = 3\nmax_value = 1").unwrap_err();
        assert!(matches!(err, SliderConfigError::Validation(_)));
        let err = SliderConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SliderConfigError::Json(_)));
        let err = SliderConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SliderConfigError::Io(_)));
    }
}
