#![forbid(unsafe_code)]

//! Item model: the host's map elements as the core sees them.
//!
//! The host owns its items. The core only needs a stable identity, the two
//! metadata bags a time value may live in, an optional pre-existing popup,
//! and (for viewport fitting) optional geographic bounds. [`TimedItem`] is
//! that seam; [`Marker`] is a plain owned implementation for hosts that
//! have nothing better and for tests.

use crate::geo::{LatLng, LatLngBounds};
use crate::value::{MetaValue, Metadata};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

/// Stable identity of a host item.
///
/// Used as the key of side tables (stashed popups) so the core never has
/// to write into host objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(u64);

impl ItemId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Options passed through to the host's popup mechanism.
///
/// Only `auto_close` is interpreted by the control (it is forced off when
/// several popups should stay open at once); everything else is carried
/// untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopupOptions {
    /// Close this popup when another one opens.
    pub auto_close: bool,
    /// Host-specific options, passed through verbatim.
    pub extra: BTreeMap<String, String>,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            auto_close: true,
            extra: BTreeMap::new(),
        }
    }
}

impl PopupOptions {
    /// Set an arbitrary pass-through option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Copy of these options with `auto_close` replaced.
    #[must_use]
    pub fn auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = auto_close;
        self
    }
}

/// A popup already attached to an item before it was indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub content: String,
    pub options: PopupOptions,
}

impl Popup {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            options: PopupOptions::default(),
        }
    }

    #[must_use]
    pub fn options(mut self, options: PopupOptions) -> Self {
        self.options = options;
        self
    }
}

/// A host item that may carry a time value.
pub trait TimedItem {
    /// Stable identity of this item.
    fn item_id(&self) -> ItemId;

    /// Feature-style properties bag, searched first.
    fn properties(&self) -> Option<&Metadata> {
        None
    }

    /// Options/attributes bag, searched when the properties bag has no value.
    fn options(&self) -> Option<&Metadata> {
        None
    }

    /// Popup attached before indexing, if any.
    fn popup(&self) -> Option<&Popup> {
        None
    }

    /// Geographic extent, if the item has one.
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }
}

impl<T: TimedItem + ?Sized> TimedItem for &T {
    fn item_id(&self) -> ItemId {
        (**self).item_id()
    }
    fn properties(&self) -> Option<&Metadata> {
        (**self).properties()
    }
    fn options(&self) -> Option<&Metadata> {
        (**self).options()
    }
    fn popup(&self) -> Option<&Popup> {
        (**self).popup()
    }
    fn bounds(&self) -> Option<LatLngBounds> {
        (**self).bounds()
    }
}

impl<T: TimedItem + ?Sized> TimedItem for Rc<T> {
    fn item_id(&self) -> ItemId {
        (**self).item_id()
    }
    fn properties(&self) -> Option<&Metadata> {
        (**self).properties()
    }
    fn options(&self) -> Option<&Metadata> {
        (**self).options()
    }
    fn popup(&self) -> Option<&Popup> {
        (**self).popup()
    }
    fn bounds(&self) -> Option<LatLngBounds> {
        (**self).bounds()
    }
}

impl<T: TimedItem + ?Sized> TimedItem for Arc<T> {
    fn item_id(&self) -> ItemId {
        (**self).item_id()
    }
    fn properties(&self) -> Option<&Metadata> {
        (**self).properties()
    }
    fn options(&self) -> Option<&Metadata> {
        (**self).options()
    }
    fn popup(&self) -> Option<&Popup> {
        (**self).popup()
    }
    fn bounds(&self) -> Option<LatLngBounds> {
        (**self).bounds()
    }
}

/// An item or a group of items as supplied by the host.
///
/// Groups are expanded in place (depth-first, order preserved) when the
/// index is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<I> {
    Leaf(I),
    Group(Vec<Node<I>>),
}

impl<I> Node<I> {
    #[must_use]
    pub fn leaf(item: I) -> Self {
        Self::Leaf(item)
    }

    #[must_use]
    pub fn group(children: impl IntoIterator<Item = Node<I>>) -> Self {
        Self::Group(children.into_iter().collect())
    }

    /// Number of leaves under this node.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Group(children) => children.iter().map(Node::leaf_count).sum(),
        }
    }

    /// Append all leaves, depth-first, to `out`.
    pub fn flatten_into(self, out: &mut Vec<I>) {
        match self {
            Self::Leaf(item) => out.push(item),
            Self::Group(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

/// Expand a forest of nodes into one linear sequence of items.
#[must_use]
pub fn flatten<I>(nodes: impl IntoIterator<Item = Node<I>>) -> Vec<I> {
    let nodes: Vec<Node<I>> = nodes.into_iter().collect();
    let mut out = Vec::with_capacity(nodes.iter().map(Node::leaf_count).sum());
    for node in nodes {
        node.flatten_into(&mut out);
    }
    out
}

/// Plain owned item: a point marker with metadata bags and an optional popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: ItemId,
    position: Option<LatLng>,
    properties: Option<Metadata>,
    options: Metadata,
    popup: Option<Popup>,
}

impl Marker {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id: ItemId::new(id),
            position: None,
            properties: None,
            options: Metadata::default(),
            popup: None,
        }
    }

    /// Place the marker on the map.
    #[must_use]
    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.position = Some(LatLng::new(lat, lng));
        self
    }

    /// Set a value in the feature properties bag (creating the bag if needed).
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.properties
            .get_or_insert_with(Metadata::default)
            .insert(key.into(), value.into());
        self
    }

    /// Set a value in the options bag.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Attach a pre-existing popup.
    #[must_use]
    pub fn popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    #[must_use]
    pub fn position(&self) -> Option<LatLng> {
        self.position
    }
}

impl TimedItem for Marker {
    fn item_id(&self) -> ItemId {
        self.id
    }

    fn properties(&self) -> Option<&Metadata> {
        self.properties.as_ref()
    }

    fn options(&self) -> Option<&Metadata> {
        Some(&self.options)
    }

    fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.position.map(LatLngBounds::point)
    }
}
