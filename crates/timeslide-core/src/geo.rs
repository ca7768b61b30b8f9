#![forbid(unsafe_code)]

//! Geographic primitives.

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An axis-aligned latitude/longitude box.
///
/// Does not model antimeridian wrapping: a box spanning 179°E..179°W is
/// stored as the 358° box between them, which is what a host's
/// fit-to-bounds call expects.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLngBounds {
    south_west: LatLng,
    north_east: LatLng,
}

impl LatLngBounds {
    /// Box spanning two corners given in any order.
    pub fn new(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// Degenerate box around a single point.
    #[inline]
    pub const fn point(p: LatLng) -> Self {
        Self {
            south_west: p,
            north_east: p,
        }
    }

    #[inline]
    pub const fn south_west(&self) -> LatLng {
        self.south_west
    }

    #[inline]
    pub const fn north_east(&self) -> LatLng {
        self.north_east
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &LatLngBounds) -> LatLngBounds {
        LatLngBounds {
            south_west: LatLng::new(
                self.south_west.lat.min(other.south_west.lat),
                self.south_west.lng.min(other.south_west.lng),
            ),
            north_east: LatLng::new(
                self.north_east.lat.max(other.north_east.lat),
                self.north_east.lng.max(other.north_east.lng),
            ),
        }
    }

    /// Union of every box yielded, or `None` if there are none.
    pub fn union_all(bounds: impl IntoIterator<Item = LatLngBounds>) -> Option<LatLngBounds> {
        bounds.into_iter().reduce(|acc, b| acc.union(&b))
    }
}
