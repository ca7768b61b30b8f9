#![forbid(unsafe_code)]

//! Visibility selection.
//!
//! Given a [`MarkerIndex`], the current [`Selection`], and a [`DisplayMode`],
//! computes which positions should be visible. The answer is always in index
//! order and always clipped to the slider bounds and the index length;
//! out-of-range requests shrink the result, they never fail.
//!
//! | mode | visible positions |
//! |---|---|
//! | `Cumulative` | `min ..= current` |
//! | `Range` | `lo ..= hi` |
//! | `TrailingWindow(k)` | `current-k+1 ..= current` |
//! | `SameInstant` | every position whose equality key matches `current`'s |
//!
//! `current` is the single position, or the upper handle of a range.

use crate::index::MarkerIndex;
use std::num::NonZeroUsize;

/// Policy deciding which positions are visible for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DisplayMode {
    /// Everything from the first position up to the current one.
    #[default]
    Cumulative,
    /// Everything between the two range handles.
    Range,
    /// The `k` positions ending at the current one.
    TrailingWindow(NonZeroUsize),
    /// Every item sharing the current item's moment.
    SameInstant,
}

impl DisplayMode {
    /// Trailing window of `k` items; `None` when `k == 0`.
    #[must_use]
    pub fn trailing(k: usize) -> Option<Self> {
        NonZeroUsize::new(k).map(Self::TrailingWindow)
    }

    /// Whether this mode is driven by a two-handle range selection.
    #[inline]
    #[must_use]
    pub const fn uses_range(self) -> bool {
        matches!(self, Self::Range)
    }
}

/// Current scrub position or range, in index positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    Single(usize),
    /// Inclusive bounds, `lo <= hi`.
    Range { lo: usize, hi: usize },
}

impl Selection {
    /// Range selection from two handles given in any order.
    #[must_use]
    pub fn range(a: usize, b: usize) -> Self {
        Self::Range {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    /// The trailing position: the single value, or the upper range handle.
    #[inline]
    #[must_use]
    pub const fn current(self) -> usize {
        match self {
            Self::Single(p) => p,
            Self::Range { hi, .. } => hi,
        }
    }

    /// Inclusive span; a single position spans itself.
    #[inline]
    #[must_use]
    pub const fn span(self) -> (usize, usize) {
        match self {
            Self::Single(p) => (p, p),
            Self::Range { lo, hi } => (lo, hi),
        }
    }

    /// Same shape, each position clamped into `[min, max]`.
    #[must_use]
    pub fn clamped(self, min: usize, max: usize) -> Self {
        let clamp = |p: usize| p.max(min).min(max);
        match self {
            Self::Single(p) => Self::Single(clamp(p)),
            Self::Range { lo, hi } => Self::range(clamp(lo), clamp(hi)),
        }
    }
}

/// Slider value range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliderBounds {
    pub min: usize,
    /// `None` means unset: nothing is selectable.
    pub max: Option<usize>,
}

impl SliderBounds {
    #[inline]
    #[must_use]
    pub const fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Bounds covering a whole index of `len` items.
    #[must_use]
    pub const fn for_len(len: usize) -> Self {
        Self {
            min: 0,
            max: len.checked_sub(1),
        }
    }

    /// `max` as a signed value, `-1` when unset.
    #[must_use]
    pub fn max_value(&self) -> isize {
        self.max.map_or(-1, |m| m as isize)
    }

    /// Effective inclusive range for an index of `len` items, or `None` when
    /// it is empty.
    #[must_use]
    pub fn effective(&self, len: usize) -> Option<(usize, usize)> {
        let max = self.max?.min(len.checked_sub(1)?);
        (self.min <= max).then_some((self.min, max))
    }
}

/// Visible positions for `selection` under `mode`, in index order.
pub fn select_positions<I>(
    index: &MarkerIndex<I>,
    selection: Selection,
    mode: DisplayMode,
    bounds: SliderBounds,
) -> Vec<usize> {
    let Some((min, max)) = bounds.effective(index.len()) else {
        return Vec::new();
    };
    let current = selection.current();

    let (lo, hi) = match mode {
        DisplayMode::Cumulative => (min, current),
        DisplayMode::Range => selection.span(),
        DisplayMode::TrailingWindow(k) => (current.saturating_sub(k.get() - 1), current),
        DisplayMode::SameInstant => {
            let Some(key) = index.entry(current).map(|e| e.equality_key()) else {
                return Vec::new();
            };
            return (min..=max)
                .filter(|&p| index.entry(p).is_some_and(|e| e.equality_key() == key))
                .collect();
        }
    };

    let lo = lo.max(min);
    let hi = hi.min(max);
    if lo > hi {
        return Vec::new();
    }
    (lo..=hi).filter(|&p| index.get(p).is_some()).collect()
}

/// Visible items for `selection` under `mode`, in index order.
pub fn select_visible<I>(
    index: &MarkerIndex<I>,
    selection: Selection,
    mode: DisplayMode,
    bounds: SliderBounds,
) -> Vec<&I> {
    select_positions(index, selection, mode, bounds)
        .into_iter()
        .filter_map(|p| index.get(p))
        .collect()
}
